//! Shared types for the WeLang interpreter.
//!
//! This crate defines the runtime value type, the line-indexed program
//! text, and the structured diagnostics shared by the decoder, the
//! executor and every host.

mod diagnostic;
mod program;
mod value;

pub use diagnostic::{Diagnostic, ErrorCategory, ErrorCode, Severity};
pub use program::Program;
pub use value::Value;
