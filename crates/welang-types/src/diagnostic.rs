use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity.
///
/// Skipped lines are warnings; everything the executor refuses to do is
/// an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Diagnostic category, determined by error code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Scope,
    Type,
    Host,
}

/// Numeric diagnostic code (E100–E499).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ErrorCode(pub u16);

impl ErrorCode {
    // ── Syntax (E100–E199) ──
    pub const UNRECOGNIZED_INSTRUCTION: Self = Self(100);
    pub const INTEGER_LITERAL_OUT_OF_RANGE: Self = Self(101);

    // ── Scope (E200–E299) ──
    pub const UNDECLARED_VARIABLE: Self = Self(200);
    pub const VARIABLE_NOT_FOUND: Self = Self(201);

    // ── Type (E300–E399) ──
    pub const TYPE_MISMATCH: Self = Self(300);
    pub const INTEGER_OVERFLOW: Self = Self(301);

    // ── Host channel (E400–E499) ──
    pub const INPUT_UNAVAILABLE: Self = Self(400);

    /// Get the category for this code.
    pub fn category(self) -> ErrorCategory {
        match self.0 {
            100..=199 => ErrorCategory::Syntax,
            200..=299 => ErrorCategory::Scope,
            300..=399 => ErrorCategory::Type,
            400..=499 => ErrorCategory::Host,
            _ => ErrorCategory::Syntax, // fallback
        }
    }

    /// Syntax skips are reported as warnings, the rest as errors.
    pub fn default_severity(self) -> Severity {
        match self.category() {
            ErrorCategory::Syntax => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax"),
            Self::Scope => write!(f, "scope"),
            Self::Type => write!(f, "type"),
            Self::Host => write!(f, "host"),
        }
    }
}

/// A structured interpreter diagnostic.
///
/// Hosts render `message` on their output channel; the remaining fields
/// let tooling locate the offending line without parsing free-form text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Program file name.
    pub file: String,
    /// Diagnostic code (e.g., E200).
    pub code: ErrorCode,
    pub severity: Severity,
    /// Category (derived from code).
    pub category: ErrorCategory,
    /// Human-readable message, exactly as shown on the output channel.
    pub message: String,
    /// 1-based line of the instruction that raised it.
    pub line: u32,
    /// The exact source line for context.
    pub source_line: String,
}

impl Diagnostic {
    /// Create a new diagnostic; severity and category follow the code.
    pub fn new(
        file: impl Into<String>,
        code: ErrorCode,
        message: impl Into<String>,
        line: u32,
        source_line: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            code,
            severity: code.default_severity(),
            category: code.category(),
            message: message.into(),
            line,
            source_line: source_line.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} [{}] {}",
            self.line, self.code, self.category, self.message
        )
    }
}
