//! Generated WeLang command reference.
//!
//! Produces two artifacts from the same [`INSTRUCTION_DOCS`] table:
//! 1. **Plain-text reference** shown by editor hosts as built-in documentation
//! 2. **Instruction table** (JSON) for tooling and syntax highlighting

use serde_json::json;

use crate::instruction::{Keyword, ALL_KEYWORDS, COMMENT_PREFIX, DEBUG_OFF_TOKEN};

/// Documentation for one instruction form.
#[derive(Debug, Clone, Copy)]
pub struct InstructionDoc {
    pub keyword: Keyword,
    /// Usage pattern with placeholder operands.
    pub syntax: &'static str,
    pub description: &'static str,
    /// A concrete line that decodes to this instruction.
    pub example: &'static str,
}

/// One entry per keyword, in dispatch order.
pub const INSTRUCTION_DOCS: &[InstructionDoc] = &[
    InstructionDoc {
        keyword: Keyword::VarCreate,
        syntax: "var.create var_name",
        description: "Creates a new variable",
        example: "var.create counter",
    },
    InstructionDoc {
        keyword: Keyword::VarSet,
        syntax: "var.set var_name = 'value'",
        description: "Assigns a value to a variable",
        example: "var.set greeting = 'hello'",
    },
    InstructionDoc {
        keyword: Keyword::SetCommand,
        syntax: "!set command = 'command'",
        description: "Maps a command to a variable",
        example: "!set command = 'show'",
    },
    InstructionDoc {
        keyword: Keyword::Mov,
        syntax: "mov var_name, value",
        description: "Sets an integer value to a variable",
        example: "mov counter, 5",
    },
    InstructionDoc {
        keyword: Keyword::Add,
        syntax: "add var_name, value",
        description: "Adds a value to a variable",
        example: "add counter, 3",
    },
    InstructionDoc {
        keyword: Keyword::Mod,
        syntax: "mod value",
        description: "Modifies the debug mode",
        example: "mod x023x",
    },
    InstructionDoc {
        keyword: Keyword::Cr,
        syntax: "!cr var_name",
        description: "Executes a command, printing the variable value",
        example: "!cr counter",
    },
    InstructionDoc {
        keyword: Keyword::Input,
        syntax: "input var_name",
        description: "Reads an input from the console into a variable",
        example: "input greeting",
    },
];

/// Look up the documentation entry for a keyword.
pub fn doc_for(keyword: Keyword) -> Option<&'static InstructionDoc> {
    INSTRUCTION_DOCS.iter().find(|d| d.keyword == keyword)
}

/// Generate the plain-text command reference.
pub fn generate_reference() -> String {
    let mut out = String::from("WeLang commands:\n");
    for kw in ALL_KEYWORDS {
        if let Some(doc) = doc_for(*kw) {
            out.push_str(&format!("{} - {}\n", doc.syntax, doc.description));
        }
    }
    out.push('\n');
    out.push_str(&format!(
        "Lines starting with '{COMMENT_PREFIX}' are comments. \
         'mod {DEBUG_OFF_TOKEN}' turns debug output off; any other value turns it on.\n"
    ));
    out
}

/// Generate the instruction table as pretty-printed JSON.
pub fn generate_instruction_table() -> String {
    let instructions: Vec<_> = INSTRUCTION_DOCS
        .iter()
        .map(|doc| {
            json!({
                "keyword": doc.keyword.as_str(),
                "syntax": doc.syntax,
                "description": doc.description,
                "example": doc.example,
            })
        })
        .collect();
    let table = json!({
        "comment_prefix": COMMENT_PREFIX.to_string(),
        "debug_off_token": DEBUG_OFF_TOKEN,
        "instructions": instructions,
    });
    serde_json::to_string_pretty(&table).unwrap_or_default()
}
