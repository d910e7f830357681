//! WeLang decoder: classifies one source line as an instruction, a
//! comment/blank line, or an unrecognized line.

pub mod decoder;
pub mod instruction;
pub mod reference;

pub use decoder::{check, decode, LineIssue};
pub use instruction::{
    Decoded, Instruction, Keyword, Unrecognized, UnrecognizedReason, ALL_KEYWORDS,
    COMMENT_PREFIX, DEBUG_OFF_TOKEN,
};
