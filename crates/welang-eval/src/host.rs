//! Host channel: where output goes and where `input` reads from.
//!
//! The executor never touches files, clocks or the environment; it only
//! talks to an [`Output`] (and, for blocking runs, a [`Host`]).

use serde::Serialize;
use std::collections::VecDeque;
use std::io::{BufRead, Write};
use tracing::warn;
use welang_types::{Diagnostic, Value};

use crate::error::InputError;

/// A pending `input` instruction waiting for a line from the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputRequest {
    /// Variable that will receive the text.
    pub variable: String,
    /// 1-based source line of the `input` instruction.
    pub line: u32,
}

impl InputRequest {
    /// Prompt shown before reading.
    pub fn prompt(&self) -> String {
        format!("Enter value for {}: ", self.variable)
    }
}

/// Append-only output channel.
///
/// Only `display` is required; the other methods let a host tell value
/// output, debug traces and diagnostics apart.
pub trait Output {
    /// Show one line of text.
    fn display(&mut self, line: &str);

    /// Output of `!cr`.
    fn emit(&mut self, value: &Value) {
        self.display(&value.to_string());
    }

    /// Debug-mode trace line.
    fn trace(&mut self, line: &str) {
        self.display(line);
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.display(&diagnostic.message);
    }
}

/// An output channel that can also block for a line of input.
pub trait Host: Output {
    fn read_input(&mut self, request: &InputRequest) -> Result<String, InputError>;
}

// ══════════════════════════════════════════════════════════════════════════════
// BufferedHost
// ══════════════════════════════════════════════════════════════════════════════

/// One recorded line of channel output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "channel", rename_all = "lowercase")]
pub enum OutputLine {
    Display { text: String },
    Value { value: Value },
    Trace { text: String },
    Diagnostic { diagnostic: Diagnostic },
    /// Prompt shown for an `input`, followed by the text supplied.
    Prompt { text: String, input: Option<String> },
}

impl OutputLine {
    /// The text a console host would have shown.
    pub fn text(&self) -> String {
        match self {
            Self::Display { text } | Self::Trace { text } => text.clone(),
            Self::Value { value } => value.to_string(),
            Self::Diagnostic { diagnostic } => diagnostic.message.clone(),
            Self::Prompt { text, input } => {
                format!("{text}{}", input.as_deref().unwrap_or_default())
            }
        }
    }
}

/// In-memory host with a scripted input queue.
///
/// Running out of scripted input is reported as [`InputError::Closed`].
#[derive(Debug, Clone, Default)]
pub struct BufferedHost {
    inputs: VecDeque<String>,
    lines: Vec<OutputLine>,
}

impl BufferedHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[OutputLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<OutputLine> {
        self.lines
    }

    /// Every recorded line as console text.
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(OutputLine::text).collect()
    }

    /// Values emitted by `!cr`, in order.
    pub fn values(&self) -> Vec<&Value> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                OutputLine::Value { value } => Some(value),
                _ => None,
            })
            .collect()
    }

    pub fn traces(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                OutputLine::Trace { text } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn diagnostics(&self) -> Vec<&Diagnostic> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                OutputLine::Diagnostic { diagnostic } => Some(diagnostic),
                _ => None,
            })
            .collect()
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Output for BufferedHost {
    fn display(&mut self, line: &str) {
        self.lines.push(OutputLine::Display {
            text: line.to_string(),
        });
    }

    fn emit(&mut self, value: &Value) {
        self.lines.push(OutputLine::Value {
            value: value.clone(),
        });
    }

    fn trace(&mut self, line: &str) {
        self.lines.push(OutputLine::Trace {
            text: line.to_string(),
        });
    }

    fn report(&mut self, diagnostic: &Diagnostic) {
        self.lines.push(OutputLine::Diagnostic {
            diagnostic: diagnostic.clone(),
        });
    }
}

impl Host for BufferedHost {
    fn read_input(&mut self, request: &InputRequest) -> Result<String, InputError> {
        let input = self.inputs.pop_front();
        self.lines.push(OutputLine::Prompt {
            text: request.prompt(),
            input: input.clone(),
        });
        input.ok_or(InputError::Closed)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// StreamHost
// ══════════════════════════════════════════════════════════════════════════════

/// Console-style host over a reader and a writer (stdin/stdout in the CLI).
///
/// `read_input` writes the prompt without a newline, then blocks for one
/// line; end of input is [`InputError::Closed`].
pub struct StreamHost<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> StreamHost<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: BufRead, W: Write> Output for StreamHost<R, W> {
    fn display(&mut self, line: &str) {
        if let Err(e) = writeln!(self.writer, "{line}") {
            warn!(error = %e, "failed to write program output");
        }
    }
}

impl<R: BufRead, W: Write> Host for StreamHost<R, W> {
    fn read_input(&mut self, request: &InputRequest) -> Result<String, InputError> {
        write!(self.writer, "{}", request.prompt())?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(InputError::Closed);
        }
        // Strip the line terminator only.
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn request(name: &str) -> InputRequest {
        InputRequest {
            variable: name.into(),
            line: 1,
        }
    }

    #[test]
    fn prompt_text() {
        assert_eq!(request("age").prompt(), "Enter value for age: ");
    }

    #[test]
    fn buffered_host_classifies_lines() {
        let mut host = BufferedHost::new();
        host.display("plain");
        host.emit(&Value::Integer(8));
        host.trace("Set: x = 8");
        assert_eq!(host.texts(), vec!["plain", "8", "Set: x = 8"]);
        assert_eq!(host.values(), vec![&Value::Integer(8)]);
        assert_eq!(host.traces(), vec!["Set: x = 8"]);
        assert!(host.diagnostics().is_empty());
    }

    #[test]
    fn buffered_host_scripted_inputs() {
        let mut host = BufferedHost::with_inputs(["first"]);
        assert_eq!(host.read_input(&request("a")), Ok("first".to_string()));
        assert_eq!(host.read_input(&request("b")), Err(InputError::Closed));
        assert_eq!(
            host.texts(),
            vec!["Enter value for a: first", "Enter value for b: "]
        );
    }

    #[test]
    fn stream_host_reads_one_line() {
        let mut host = StreamHost::new(Cursor::new("alice\r\nbob\n"), Vec::new());
        assert_eq!(host.read_input(&request("n")), Ok("alice".to_string()));
        assert_eq!(host.read_input(&request("n")), Ok("bob".to_string()));
        assert_eq!(host.read_input(&request("n")), Err(InputError::Closed));
        let (_, written) = host.into_parts();
        assert_eq!(
            String::from_utf8(written).unwrap(),
            "Enter value for n: Enter value for n: Enter value for n: "
        );
    }

    #[test]
    fn stream_host_keeps_inner_whitespace() {
        let mut host = StreamHost::new(Cursor::new("  spaced out  \n"), Vec::new());
        assert_eq!(
            host.read_input(&request("s")),
            Ok("  spaced out  ".to_string())
        );
    }

    #[test]
    fn stream_host_last_line_without_newline() {
        let mut host = StreamHost::new(Cursor::new("tail"), Vec::new());
        assert_eq!(host.read_input(&request("s")), Ok("tail".to_string()));
    }

    #[test]
    fn stream_host_display_appends_newline() {
        let mut host = StreamHost::new(Cursor::new(""), Vec::new());
        host.display("one");
        host.emit(&Value::from("two"));
        let (_, written) = host.into_parts();
        assert_eq!(String::from_utf8(written).unwrap(), "one\ntwo\n");
    }
}
