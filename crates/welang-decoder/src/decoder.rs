//! Line decoder: converts one source line into a [`Decoded`] value.
//!
//! Matching rules:
//! - The line is whitespace-trimmed first; blank lines and `;` comments are ignored
//! - A keyword must prefix the trimmed line, followed by a single space
//! - Operands are matched from the start of the remainder; a final
//!   identifier or integer must end at the line end or at whitespace, and
//!   text after that whitespace is ignored
//! - Identifiers are `[A-Za-z0-9_]+`, integers are unsigned ASCII digits
//! - Quoted operands run to the last `'` on the line and must be non-empty
//! - A line that names a keyword but breaks its operand grammar is
//!   unrecognized as a whole, never partially decoded

use serde::{Deserialize, Serialize};
use welang_types::Program;

use crate::instruction::{Decoded, Instruction, Keyword, Unrecognized, UnrecognizedReason};
use crate::instruction::COMMENT_PREFIX;

/// An unrecognized line found by [`check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineIssue {
    /// 1-based line number.
    pub line: u32,
    pub unrecognized: Unrecognized,
}

/// Decode a single raw source line.
pub fn decode(raw: &str) -> Decoded {
    let line = raw.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Decoded::Ignore;
    }

    let Some(keyword) = Keyword::match_prefix(line) else {
        return unrecognized(line, None, UnrecognizedReason::UnknownKeyword);
    };

    // Skip the keyword and its separating space.
    let mut cursor = Cursor::new(&line[keyword.as_str().len() + 1..]);
    match decode_operands(keyword, &mut cursor) {
        Ok(inst) => Decoded::Instruction(inst),
        Err(reason) => unrecognized(line, Some(keyword), reason),
    }
}

/// Decode every line of a program and collect the ones that would be
/// skipped at run time.
pub fn check(program: &Program) -> Vec<LineIssue> {
    program
        .lines()
        .enumerate()
        .filter_map(|(idx, raw)| match decode(raw) {
            Decoded::Unrecognized(unrecognized) => Some(LineIssue {
                line: idx as u32 + 1,
                unrecognized,
            }),
            Decoded::Ignore | Decoded::Instruction(_) => None,
        })
        .collect()
}

fn unrecognized(line: &str, keyword: Option<Keyword>, reason: UnrecognizedReason) -> Decoded {
    Decoded::Unrecognized(Unrecognized {
        line: line.to_string(),
        keyword,
        reason,
    })
}

fn decode_operands(
    keyword: Keyword,
    cursor: &mut Cursor<'_>,
) -> Result<Instruction, UnrecognizedReason> {
    use UnrecognizedReason::MalformedOperands;

    let inst = match keyword {
        Keyword::VarCreate => Instruction::DeclareVariable {
            name: cursor.last_identifier().ok_or(MalformedOperands)?.to_string(),
        },
        Keyword::VarSet => {
            let name = cursor.identifier().ok_or(MalformedOperands)?.to_string();
            if !cursor.eat(" = ") {
                return Err(MalformedOperands);
            }
            let value = cursor.quoted().ok_or(MalformedOperands)?.to_string();
            Instruction::AssignText { name, value }
        }
        Keyword::Mov | Keyword::Add => {
            let name = cursor.identifier().ok_or(MalformedOperands)?.to_string();
            if !cursor.eat(", ") {
                return Err(MalformedOperands);
            }
            let value = cursor
                .last_digits()
                .ok_or(MalformedOperands)?
                .parse::<i64>()
                .map_err(|_| UnrecognizedReason::IntegerOutOfRange)?;
            if keyword == Keyword::Mov {
                Instruction::SetInteger { name, value }
            } else {
                Instruction::AddInteger { name, value }
            }
        }
        Keyword::Mod => Instruction::SetDebugMode {
            token: cursor.remainder().ok_or(MalformedOperands)?.to_string(),
        },
        Keyword::SetCommand => Instruction::BindCommand {
            alias: cursor.quoted().ok_or(MalformedOperands)?.to_string(),
        },
        Keyword::Cr => Instruction::InvokeCommand {
            name: cursor.last_identifier().ok_or(MalformedOperands)?.to_string(),
        },
        Keyword::Input => Instruction::ReadInput {
            name: cursor.last_identifier().ok_or(MalformedOperands)?.to_string(),
        },
    };
    Ok(inst)
}

// ─────────────────────────────────────────────────────────────
// Operand cursor
// ─────────────────────────────────────────────────────────────

/// Forward-only cursor over the operand text of one line.
struct Cursor<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    fn new(source: &'src str) -> Self {
        Self { source, pos: 0 }
    }

    fn rest(&self) -> &'src str {
        &self.source[self.pos..]
    }

    /// Consume `literal` if the remaining text starts with it.
    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    /// Consume the longest non-empty run of bytes matching `pred`.
    fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> Option<&'src str> {
        let len = self.rest().bytes().take_while(|&b| pred(b)).count();
        if len == 0 {
            return None;
        }
        let taken = &self.rest()[..len];
        self.pos += len;
        Some(taken)
    }

    /// `[A-Za-z0-9_]+`
    fn identifier(&mut self) -> Option<&'src str> {
        self.take_while(|b| b.is_ascii_alphanumeric() || b == b'_')
    }

    /// `[0-9]+`
    fn digits(&mut self) -> Option<&'src str> {
        self.take_while(|b| b.is_ascii_digit())
    }

    /// True at the end of the text or before whitespace.
    fn at_boundary(&self) -> bool {
        self.rest().chars().next().map_or(true, char::is_whitespace)
    }

    /// An identifier that ends the operand list.
    fn last_identifier(&mut self) -> Option<&'src str> {
        let name = self.identifier()?;
        self.at_boundary().then_some(name)
    }

    /// An integer that ends the operand list.
    fn last_digits(&mut self) -> Option<&'src str> {
        let digits = self.digits()?;
        self.at_boundary().then_some(digits)
    }

    /// `'(.+)'`: text between the opening quote and the last quote on the
    /// line. Consumes through that last quote.
    fn quoted(&mut self) -> Option<&'src str> {
        let rest = self.rest();
        if !rest.starts_with('\'') {
            return None;
        }
        let close = rest.rfind('\'')?;
        // At least one character between the quotes.
        if close < 2 {
            return None;
        }
        self.pos += close + 1;
        Some(&rest[1..close])
    }

    /// `(.+)`: everything that is left, non-empty.
    fn remainder(&mut self) -> Option<&'src str> {
        let rest = self.rest();
        if rest.is_empty() {
            return None;
        }
        self.pos = self.source.len();
        Some(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_identifier_stops_at_punctuation() {
        let mut c = Cursor::new("abc_1, 5");
        assert_eq!(c.identifier(), Some("abc_1"));
        assert!(c.eat(", "));
        assert_eq!(c.digits(), Some("5"));
        assert_eq!(c.rest(), "");
    }

    #[test]
    fn test_cursor_identifier_empty() {
        let mut c = Cursor::new(", 5");
        assert_eq!(c.identifier(), None);
        assert_eq!(c.rest(), ", 5");
    }

    #[test]
    fn test_cursor_quoted_runs_to_last_quote() {
        let mut c = Cursor::new("'a' and 'b' tail");
        assert_eq!(c.quoted(), Some("a' and 'b"));
        assert_eq!(c.rest(), " tail");
    }

    #[test]
    fn test_cursor_quoted_rejects_empty() {
        assert_eq!(Cursor::new("''").quoted(), None);
        assert_eq!(Cursor::new("'").quoted(), None);
        assert_eq!(Cursor::new("'''").quoted(), Some("'"));
    }

    #[test]
    fn test_check_reports_line_numbers() {
        let program = Program::new("t.wel", "; ok\nmov x, 1\nmov x, one\n\nwhat");
        let issues = check(&program);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].line, 3);
        assert_eq!(issues[0].unrecognized.keyword, Some(Keyword::Mov));
        assert_eq!(issues[1].line, 5);
        assert_eq!(issues[1].unrecognized.reason, UnrecognizedReason::UnknownKeyword);
    }

    #[test]
    fn test_check_clean_program() {
        assert!(check(&Program::new("t.wel", "var.create a\n!cr a")).is_empty());
    }

    #[test]
    fn test_cursor_final_operand_needs_boundary() {
        assert_eq!(Cursor::new("12").last_digits(), Some("12"));
        assert_eq!(Cursor::new("12 ; note").last_digits(), Some("12"));
        assert_eq!(Cursor::new("12abc").last_digits(), None);
        assert_eq!(Cursor::new("3.7").last_digits(), None);
        assert_eq!(Cursor::new("a\tb").last_identifier(), Some("a"));
        assert_eq!(Cursor::new("héllo").last_identifier(), None);
    }

    #[test]
    fn test_cursor_remainder() {
        let mut c = Cursor::new(" spaced ");
        assert_eq!(c.remainder(), Some(" spaced "));
        assert_eq!(c.remainder(), None);
    }
}
