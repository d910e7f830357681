//! Error types for the WeLang executor.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use welang_decoder::{Unrecognized, UnrecognizedReason};
use welang_types::{Diagnostic, ErrorCode};

/// Failure of the host input channel during `input`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "message", rename_all = "snake_case")]
pub enum InputError {
    /// The channel reached end of input.
    #[error("input channel closed")]
    Closed,
    /// The host cancelled a pending read.
    #[error("input cancelled")]
    Cancelled,
    #[error("input error: {0}")]
    Io(String),
}

impl From<std::io::Error> for InputError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Why one instruction had no effect.
///
/// The `Display` text is the line shown on the output channel. Only
/// [`ExecError::InputUnavailable`] ends the run; every other variant
/// skips the instruction and execution continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// `var.set`, `add` or `input` on a name that was never declared.
    #[error("Error: Variable '{name}' not declared.")]
    UndeclaredVariable { name: String },
    /// `!cr` on a name that is not in the store.
    #[error("Variable '{name}' not found.")]
    VariableNotFound { name: String },
    /// `add` on a text-valued variable.
    #[error("Error: Cannot add to '{name}': expected integer, found {found}.")]
    TypeMismatch { name: String, found: &'static str },
    #[error("Error: Integer overflow adding {value} to '{name}'.")]
    IntegerOverflow { name: String, value: i64 },
    #[error("Error: Input unavailable for '{name}': {error}")]
    InputUnavailable { name: String, error: InputError },
    /// A skipped line, reported only when the config asks for it.
    #[error("Warning: {0}")]
    Unrecognized(Unrecognized),
}

impl ExecError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UndeclaredVariable { .. } => ErrorCode::UNDECLARED_VARIABLE,
            Self::VariableNotFound { .. } => ErrorCode::VARIABLE_NOT_FOUND,
            Self::TypeMismatch { .. } => ErrorCode::TYPE_MISMATCH,
            Self::IntegerOverflow { .. } => ErrorCode::INTEGER_OVERFLOW,
            Self::InputUnavailable { .. } => ErrorCode::INPUT_UNAVAILABLE,
            Self::Unrecognized(u) => match u.reason {
                UnrecognizedReason::IntegerOutOfRange => ErrorCode::INTEGER_LITERAL_OUT_OF_RANGE,
                UnrecognizedReason::UnknownKeyword | UnrecognizedReason::MalformedOperands => {
                    ErrorCode::UNRECOGNIZED_INSTRUCTION
                }
            },
        }
    }

    /// Attach source location and convert to a [`Diagnostic`].
    pub fn to_diagnostic(&self, file: &str, line: u32, source_line: &str) -> Diagnostic {
        Diagnostic::new(file, self.code(), self.to_string(), line, source_line)
    }
}

/// Result alias for executor operations.
pub type ExecResult<T> = Result<T, ExecError>;

#[cfg(test)]
mod tests {
    use super::*;
    use welang_decoder::Keyword;
    use welang_types::Severity;

    #[test]
    fn messages_match_channel_text() {
        let e = ExecError::UndeclaredVariable { name: "y".into() };
        assert_eq!(e.to_string(), "Error: Variable 'y' not declared.");
        let e = ExecError::VariableNotFound { name: "z".into() };
        assert_eq!(e.to_string(), "Variable 'z' not found.");
        let e = ExecError::TypeMismatch {
            name: "s".into(),
            found: "text",
        };
        assert_eq!(
            e.to_string(),
            "Error: Cannot add to 's': expected integer, found text."
        );
        let e = ExecError::InputUnavailable {
            name: "n".into(),
            error: InputError::Closed,
        };
        assert_eq!(
            e.to_string(),
            "Error: Input unavailable for 'n': input channel closed"
        );
    }

    #[test]
    fn unrecognized_codes() {
        let skip = ExecError::Unrecognized(Unrecognized {
            line: "mov x, 99999999999999999999".into(),
            keyword: Some(Keyword::Mov),
            reason: UnrecognizedReason::IntegerOutOfRange,
        });
        assert_eq!(skip.code(), ErrorCode::INTEGER_LITERAL_OUT_OF_RANGE);
        let d = skip.to_diagnostic("t.wel", 4, "mov x, 99999999999999999999");
        assert_eq!(d.severity, Severity::Warning);
        assert_eq!(d.line, 4);
        assert!(d.message.starts_with("Warning: integer literal out of range"));
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe gone");
        let err: InputError = io.into();
        assert_eq!(err, InputError::Io("pipe gone".into()));
    }
}
