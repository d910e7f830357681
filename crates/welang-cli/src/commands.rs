//! Subcommand implementations. Each one writes to the given writer and
//! returns the process exit status.

use std::fs;
use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use welang_decoder::reference::{generate_instruction_table, generate_reference};
use welang_eval::{run_buffered, run_with_config, HaltReason, InterpreterConfig, StreamHost};
use welang_types::Program;

/// Exit status when the decoder finds unrecognized lines.
pub const EXIT_ISSUES: u8 = 1;
/// Exit status when a run halts because input was unavailable.
pub const EXIT_INPUT_UNAVAILABLE: u8 = 2;

const KNOWN_EXTENSIONS: &[&str] = &["wel", "wla"];

pub fn has_known_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| KNOWN_EXTENSIONS.contains(&ext))
}

/// Read a program file. Unknown extensions are accepted with a warning.
pub fn read_program(path: &Path) -> Result<String> {
    if !has_known_extension(path) {
        warn!(path = %path.display(), "file does not have a .wel or .wla extension");
    }
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Build the run configuration: config file first, then flags.
pub fn load_config(
    config_path: Option<&Path>,
    file: &Path,
    quiet: bool,
    report_unrecognized: bool,
) -> Result<InterpreterConfig> {
    let mut config = match config_path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            InterpreterConfig::from_json(&text)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => InterpreterConfig::default(),
    };
    config.file_name = file.display().to_string();
    if quiet {
        config.debug_default = false;
    }
    if report_unrecognized {
        config.report_unrecognized = true;
    }
    debug!(?config, "resolved interpreter config");
    Ok(config)
}

/// Run a program.
///
/// With no scripted inputs and no `json`, `input` reads from `stdin`;
/// otherwise inputs come from `inputs` in order.
pub fn run_program<R: BufRead, W: Write>(
    source: &str,
    config: &InterpreterConfig,
    inputs: Vec<String>,
    json: bool,
    stdin: R,
    out: &mut W,
) -> Result<u8> {
    let halt = if json || !inputs.is_empty() {
        let report = run_buffered(source, config, inputs);
        if json {
            writeln!(out, "{}", report.to_json()?)?;
        } else {
            for line in &report.output {
                writeln!(out, "{}", line.text())?;
            }
        }
        report.halt
    } else {
        let mut host = StreamHost::new(stdin, &mut *out);
        run_with_config(source, config, &mut host).halt
    };

    Ok(match halt {
        HaltReason::Completed => 0,
        HaltReason::InputUnavailable { variable, error } => {
            warn!(%variable, %error, "run halted waiting for input");
            EXIT_INPUT_UNAVAILABLE
        }
    })
}

/// Report every unrecognized line.
pub fn check_program<W: Write>(name: &str, source: &str, json: bool, out: &mut W) -> Result<u8> {
    let program = Program::new(name, source);
    let issues = welang_decoder::check(&program);

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&issues)?)?;
    } else {
        for issue in &issues {
            writeln!(out, "{}:{}: {}", program.name, issue.line, issue.unrecognized)?;
        }
        writeln!(
            out,
            "{}: {} line(s), {} unrecognized",
            program.name,
            program.line_count(),
            issues.len()
        )?;
    }

    Ok(if issues.is_empty() { 0 } else { EXIT_ISSUES })
}

pub fn print_reference<W: Write>(json: bool, out: &mut W) -> Result<()> {
    if json {
        writeln!(out, "{}", generate_instruction_table())?;
    } else {
        write!(out, "{}", generate_reference())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run_to_string(
        source: &str,
        config: &InterpreterConfig,
        inputs: &[&str],
        stdin: &str,
    ) -> (u8, String) {
        let mut out = Vec::new();
        let inputs = inputs.iter().map(|s| s.to_string()).collect();
        let code =
            run_program(source, config, inputs, false, Cursor::new(stdin), &mut out).unwrap();
        (code, String::from_utf8(out).unwrap())
    }

    #[test]
    fn extension_check() {
        assert!(has_known_extension(Path::new("hello.wel")));
        assert!(has_known_extension(Path::new("dir/legacy.wla")));
        assert!(!has_known_extension(Path::new("hello.txt")));
        assert!(!has_known_extension(Path::new("hello")));
    }

    #[test]
    fn flags_override_defaults() {
        let config = load_config(None, Path::new("a.wel"), true, true).unwrap();
        assert!(!config.debug_default);
        assert!(config.report_unrecognized);
        assert_eq!(config.file_name, "a.wel");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = load_config(
            Some(Path::new("/nonexistent/welang.json")),
            Path::new("a.wel"),
            false,
            false,
        )
        .unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }

    #[test]
    fn run_reads_stdin() {
        let config = InterpreterConfig::default().with_debug_default(false);
        let (code, out) =
            run_to_string("var.create who\ninput who\n!cr who", &config, &[], "Ada\n");
        assert_eq!(code, 0);
        assert_eq!(out, "Enter value for who: Ada\n");
    }

    #[test]
    fn run_with_scripted_inputs() {
        let config = InterpreterConfig::default();
        let (code, out) =
            run_to_string("var.create n\ninput n\n!cr n", &config, &["7"], "ignored\n");
        assert_eq!(code, 0);
        assert_eq!(
            out,
            "Variable n declared.\nEnter value for n: 7\nVariable n set to '7'\n7\n"
        );
    }

    #[test]
    fn run_exit_code_on_closed_stdin() {
        let config = InterpreterConfig::default();
        let (code, _) = run_to_string("var.create n\ninput n", &config, &[], "");
        assert_eq!(code, EXIT_INPUT_UNAVAILABLE);
    }

    #[test]
    fn run_json_report() {
        let mut out = Vec::new();
        let config = InterpreterConfig::default();
        let code = run_program(
            "mov x, 3\n!cr x",
            &config,
            Vec::new(),
            true,
            Cursor::new(""),
            &mut out,
        )
        .unwrap();
        assert_eq!(code, 0);
        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["variables"]["x"]["value"], 3);
    }

    #[test]
    fn check_lists_issues() {
        let mut out = Vec::new();
        let code =
            check_program("t.wel", "mov x, 1\nmov x, one\nhello", false, &mut out).unwrap();
        assert_eq!(code, EXIT_ISSUES);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("t.wel:2: malformed operands for 'mov': mov x, one"));
        assert!(text.contains("t.wel:3: unknown instruction: hello"));
        assert!(text.ends_with("t.wel: 3 line(s), 2 unrecognized\n"));
    }

    #[test]
    fn check_clean_program() {
        let mut out = Vec::new();
        let code = check_program("t.wel", "; fine\nvar.create a", true, &mut out).unwrap();
        assert_eq!(code, 0);
        assert_eq!(String::from_utf8(out).unwrap().trim(), "[]");
    }

    #[test]
    fn reference_text() {
        let mut out = Vec::new();
        print_reference(false, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("WeLang commands:\n"));
    }
}
