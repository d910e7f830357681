//! Per-run interpreter state.

use serde::Serialize;

use crate::store::{CommandTable, VariableStore};

/// Lifecycle of a [`crate::Machine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No program loaded.
    Idle,
    Running,
    /// Terminal for the current run; `start` begins a new one.
    Halted,
}

/// Everything one run mutates.
///
/// Created fresh by every `start`; handed back to the caller when the
/// run halts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterpreterState {
    pub variables: VariableStore,
    pub commands: CommandTable,
    pub debug_mode: bool,
    /// 0-based index of the next line to fetch.
    pub ip: usize,
}

impl InterpreterState {
    pub fn new(debug_mode: bool) -> Self {
        Self {
            variables: VariableStore::new(),
            commands: CommandTable::new(),
            debug_mode,
            ip: 0,
        }
    }
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new(true)
    }
}
