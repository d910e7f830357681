//! WeLang executor.
//!
//! Runs a program line by line: fetch the line at the instruction
//! pointer, advance the pointer, decode, apply. All interpreter state is
//! owned by a [`Machine`] for the duration of one run and handed back to
//! the caller in the [`RunOutcome`].

pub mod config;
pub mod error;
pub mod host;
pub mod machine;
pub mod report;
pub mod state;
pub mod store;

pub use config::InterpreterConfig;
pub use error::{ExecError, ExecResult, InputError};
pub use host::{BufferedHost, Host, InputRequest, Output, OutputLine, StreamHost};
pub use machine::{run, run_with_config, HaltReason, Machine, RunOutcome, Step};
pub use report::{run_buffered, RunReport};
pub use state::{InterpreterState, Phase};
pub use store::{CommandTable, VariableStore};
pub use welang_types::Value;
