//! WeLang interpreter as a WASM module for browser environments.
//!
//! This crate exposes the decoder and executor via `wasm-bindgen`. A
//! browser cannot block on `input`, so every call takes the program's
//! input lines up front as a JSON array of strings.
//!
//! # Usage (JavaScript)
//!
//! ```js
//! import init, { run, check } from 'welang-wasm';
//!
//! await init();
//!
//! const report = JSON.parse(run("var.create a\ninput a\n!cr a", "hello.wel", '["hi"]'));
//! // { file: "hello.wel", halt: { reason: "completed" }, output: [...], variables: {...}, ... }
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;
use welang_decoder::{decode, LineIssue};
use welang_eval::{run_buffered, InterpreterConfig};
use welang_types::Program;

/// Run a program and return its `RunReport` as JSON.
///
/// `inputs_json` is a JSON array of strings consumed in order by `input`.
/// An empty string means no inputs. When the inputs run out the run halts
/// with `halt.reason == "input_unavailable"`.
///
/// Malformed `inputs_json` returns `{"error": "..."}` without running.
#[wasm_bindgen]
pub fn run(source: &str, filename: &str, inputs_json: &str) -> String {
    let config = InterpreterConfig::default().with_file_name(filename);
    run_report(source, &config, inputs_json)
}

/// Like [`run`], with an `InterpreterConfig` given as JSON.
///
/// Every config field is optional:
/// ```json
/// { "debug_default": true, "report_unrecognized": false, "file_name": "main.wel" }
/// ```
#[wasm_bindgen]
pub fn run_with_config(source: &str, config_json: &str, inputs_json: &str) -> String {
    match InterpreterConfig::from_json(config_json) {
        Ok(config) => run_report(source, &config, inputs_json),
        Err(e) => error_json(&format!("Invalid config: {e}")),
    }
}

/// Decode a single line and return the `Decoded` value as JSON.
///
/// Useful for live syntax feedback in an editor.
#[wasm_bindgen]
pub fn decode_line(line: &str) -> String {
    to_json(&decode(line))
}

/// Decode every line of `source` and return the unrecognized ones.
///
/// ```json
/// { "issues": [ { "line": 3, "unrecognized": { ... } } ], "total": 1 }
/// ```
#[wasm_bindgen]
pub fn check(source: &str) -> String {
    #[derive(Serialize)]
    struct CheckResult {
        issues: Vec<LineIssue>,
        total: usize,
    }

    let issues = welang_decoder::check(&Program::new("", source));
    to_json(&CheckResult {
        total: issues.len(),
        issues,
    })
}

/// Return the interpreter version string.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Return the plain-text instruction reference.
#[wasm_bindgen]
pub fn get_reference() -> String {
    welang_decoder::reference::generate_reference()
}

/// Return a structured JSON instruction table for tooling and documentation.
#[wasm_bindgen]
pub fn get_instruction_table() -> String {
    welang_decoder::reference::generate_instruction_table()
}

fn run_report(source: &str, config: &InterpreterConfig, inputs_json: &str) -> String {
    let inputs: Vec<String> = if inputs_json.trim().is_empty() {
        Vec::new()
    } else {
        match serde_json::from_str(inputs_json) {
            Ok(inputs) => inputs,
            Err(e) => return error_json(&format!("Invalid inputs: {e}")),
        }
    };
    to_json(&run_buffered(source, config, inputs))
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|e| error_json(&format!("Serialization error: {e}")))
}

fn error_json(message: &str) -> String {
    serde_json::json!({ "error": message }).to_string()
}
