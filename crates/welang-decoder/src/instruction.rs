//! Instruction types for the WeLang decoder.
//!
//! Defines [`Keyword`] (the eight instruction prefixes), [`Instruction`]
//! (one variant per instruction form) and [`Decoded`], the result of
//! classifying a single source line.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Lines whose trimmed text starts with this are comments.
pub const COMMENT_PREFIX: char = ';';

/// The one `mod` token that switches debug tracing off.
pub const DEBUG_OFF_TOKEN: &str = "x023x";

/// Every keyword in dispatch order.
pub const ALL_KEYWORDS: &[Keyword] = &[
    Keyword::VarCreate,
    Keyword::VarSet,
    Keyword::SetCommand,
    Keyword::Mov,
    Keyword::Add,
    Keyword::Mod,
    Keyword::Cr,
    Keyword::Input,
];

// ─────────────────────────────────────────────────────────────────────
// Keyword
// ─────────────────────────────────────────────────────────────────────

/// An instruction keyword. Keywords are case-sensitive and must be
/// followed by a single space to count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    /// `var.create`
    VarCreate,
    /// `var.set`
    VarSet,
    /// `!set command =`
    SetCommand,
    /// `mov`
    Mov,
    /// `add`
    Add,
    /// `mod`
    Mod,
    /// `!cr`
    Cr,
    /// `input`
    Input,
}

impl Keyword {
    /// Source spelling of the keyword, without the separating space.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VarCreate => "var.create",
            Self::VarSet => "var.set",
            Self::SetCommand => "!set command =",
            Self::Mov => "mov",
            Self::Add => "add",
            Self::Mod => "mod",
            Self::Cr => "!cr",
            Self::Input => "input",
        }
    }

    /// Find the keyword whose `"<keyword> "` prefix starts `line`.
    pub fn match_prefix(line: &str) -> Option<Keyword> {
        ALL_KEYWORDS.iter().copied().find(|kw| {
            line.strip_prefix(kw.as_str())
                .is_some_and(|rest| rest.starts_with(' '))
        })
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─────────────────────────────────────────────────────────────────────
// Instruction
// ─────────────────────────────────────────────────────────────────────

/// A decoded WeLang instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Instruction {
    /// `var.create <name>`
    DeclareVariable { name: String },
    /// `var.set <name> = '<value>'`
    AssignText { name: String, value: String },
    /// `mov <name>, <int>`
    SetInteger { name: String, value: i64 },
    /// `add <name>, <int>`
    AddInteger { name: String, value: i64 },
    /// `mod <token>`
    SetDebugMode { token: String },
    /// `!set command = '<alias>'`
    BindCommand { alias: String },
    /// `!cr <name>`
    InvokeCommand { name: String },
    /// `input <name>`
    ReadInput { name: String },
}

impl Instruction {
    pub fn keyword(&self) -> Keyword {
        match self {
            Self::DeclareVariable { .. } => Keyword::VarCreate,
            Self::AssignText { .. } => Keyword::VarSet,
            Self::SetInteger { .. } => Keyword::Mov,
            Self::AddInteger { .. } => Keyword::Add,
            Self::SetDebugMode { .. } => Keyword::Mod,
            Self::BindCommand { .. } => Keyword::SetCommand,
            Self::InvokeCommand { .. } => Keyword::Cr,
            Self::ReadInput { .. } => Keyword::Input,
        }
    }
}

/// Canonical source text; decoding it yields the same instruction.
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kw = self.keyword();
        match self {
            Self::DeclareVariable { name }
            | Self::InvokeCommand { name }
            | Self::ReadInput { name } => write!(f, "{kw} {name}"),
            Self::AssignText { name, value } => write!(f, "{kw} {name} = '{value}'"),
            Self::SetInteger { name, value } | Self::AddInteger { name, value } => {
                write!(f, "{kw} {name}, {value}")
            }
            Self::SetDebugMode { token } => write!(f, "{kw} {token}"),
            Self::BindCommand { alias } => write!(f, "{kw} '{alias}'"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────
// Decoded
// ─────────────────────────────────────────────────────────────────────

/// Why a line did not decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnrecognizedReason {
    #[error("unknown instruction")]
    UnknownKeyword,
    #[error("malformed operands")]
    MalformedOperands,
    #[error("integer literal out of range")]
    IntegerOutOfRange,
}

/// A line that is neither an instruction nor a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unrecognized {
    /// The trimmed line.
    pub line: String,
    /// The keyword whose operand grammar failed, `None` for unknown keywords.
    pub keyword: Option<Keyword>,
    pub reason: UnrecognizedReason,
}

impl fmt::Display for Unrecognized {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.keyword {
            Some(kw) => write!(f, "{} for '{kw}': {}", self.reason, self.line),
            None => write!(f, "{}: {}", self.reason, self.line),
        }
    }
}

/// Result of decoding one source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decoded", rename_all = "snake_case")]
pub enum Decoded {
    /// Blank line or `;` comment.
    Ignore,
    Instruction(Instruction),
    Unrecognized(Unrecognized),
}

impl Decoded {
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Instruction(inst) => Some(inst),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_prefix_requires_space() {
        assert_eq!(Keyword::match_prefix("mov x, 1"), Some(Keyword::Mov));
        assert_eq!(Keyword::match_prefix("mov"), None);
        assert_eq!(Keyword::match_prefix("movx, 1"), None);
        assert_eq!(
            Keyword::match_prefix("!set command = 'a'"),
            Some(Keyword::SetCommand)
        );
        assert_eq!(Keyword::match_prefix("!set commands = 'a'"), None);
    }

    #[test]
    fn test_keywords_are_case_sensitive() {
        assert_eq!(Keyword::match_prefix("MOV x, 1"), None);
        assert_eq!(Keyword::match_prefix("Var.create x"), None);
    }

    #[test]
    fn test_instruction_keyword() {
        let inst = Instruction::BindCommand {
            alias: "go".into(),
        };
        assert_eq!(inst.keyword(), Keyword::SetCommand);
        let inst = Instruction::AddInteger {
            name: "x".into(),
            value: 3,
        };
        assert_eq!(inst.keyword(), Keyword::Add);
    }

    #[test]
    fn test_instruction_display() {
        let inst = Instruction::AssignText {
            name: "y".into(),
            value: "hi".into(),
        };
        assert_eq!(inst.to_string(), "var.set y = 'hi'");
        let inst = Instruction::BindCommand {
            alias: "alias1".into(),
        };
        assert_eq!(inst.to_string(), "!set command = 'alias1'");
        let inst = Instruction::SetInteger {
            name: "x".into(),
            value: 5,
        };
        assert_eq!(inst.to_string(), "mov x, 5");
    }

    #[test]
    fn test_unrecognized_display() {
        let u = Unrecognized {
            line: "mov x, abc".into(),
            keyword: Some(Keyword::Mov),
            reason: UnrecognizedReason::MalformedOperands,
        };
        assert_eq!(u.to_string(), "malformed operands for 'mov': mov x, abc");
    }

    #[test]
    fn test_decoded_json_shape() {
        let d = Decoded::Instruction(Instruction::InvokeCommand { name: "x".into() });
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, r#"{"decoded":"instruction","kind":"invoke_command","name":"x"}"#);
        let json = serde_json::to_string(&Decoded::Ignore).unwrap();
        assert_eq!(json, r#"{"decoded":"ignore"}"#);
    }
}
