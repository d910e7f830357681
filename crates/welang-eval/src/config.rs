//! Interpreter configuration.
//!
//! Hosts load this from JSON (every field optional) or build it in code.

use serde::{Deserialize, Serialize};

/// Default program name used in diagnostics.
pub const DEFAULT_FILE_NAME: &str = "main.wel";

/// Per-run interpreter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Debug mode at the start of every run.
    pub debug_default: bool,
    /// Emit a warning diagnostic for every unrecognized line instead of
    /// skipping it silently.
    pub report_unrecognized: bool,
    /// Program name attached to diagnostics.
    pub file_name: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            debug_default: true,
            report_unrecognized: false,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

impl InterpreterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_debug_default(mut self, enabled: bool) -> Self {
        self.debug_default = enabled;
        self
    }

    pub fn with_report_unrecognized(mut self, enabled: bool) -> Self {
        self.report_unrecognized = enabled;
        self
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = name.into();
        self
    }
}
