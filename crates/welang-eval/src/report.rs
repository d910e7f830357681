//! Serializable run reports for non-console hosts.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::config::InterpreterConfig;
use crate::host::{BufferedHost, OutputLine};
use crate::machine::{run_with_config, HaltReason, RunOutcome};
use crate::store::{CommandTable, VariableStore};

/// Everything a host needs to render one finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub file: String,
    /// SHA-256 of the program text, lowercase hex.
    pub source_hash: String,
    pub halt: HaltReason,
    pub output: Vec<OutputLine>,
    pub variables: VariableStore,
    pub commands: CommandTable,
    pub debug_mode: bool,
    pub steps: usize,
}

impl RunReport {
    pub fn new(
        file: impl Into<String>,
        source: &str,
        outcome: RunOutcome,
        host: BufferedHost,
    ) -> Self {
        Self {
            file: file.into(),
            source_hash: source_hash(source),
            halt: outcome.halt,
            output: host.into_lines(),
            variables: outcome.state.variables,
            commands: outcome.state.commands,
            debug_mode: outcome.state.debug_mode,
            steps: outcome.steps,
        }
    }

    pub fn completed(&self) -> bool {
        self.halt.is_completed()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Lowercase hex SHA-256 of `source`.
pub fn source_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

/// Run with scripted inputs and collect a [`RunReport`].
pub fn run_buffered<I, S>(source: &str, config: &InterpreterConfig, inputs: I) -> RunReport
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut host = BufferedHost::with_inputs(inputs);
    let outcome = run_with_config(source, config, &mut host);
    RunReport::new(config.file_name.clone(), source, outcome, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sha256_hex() {
        assert_eq!(
            source_hash(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn report_json_fields() {
        let report = run_buffered(
            "var.create x\nmov x, 2\n!cr x",
            &InterpreterConfig::default(),
            Vec::<String>::new(),
        );
        assert!(report.completed());
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["file"], "main.wel");
        assert_eq!(json["halt"]["reason"], "completed");
        assert_eq!(json["variables"]["x"]["value"], 2);
        assert_eq!(json["steps"], 3);
        let output = json["output"].as_array().unwrap();
        assert_eq!(output.last().unwrap()["channel"], "value");
    }

    #[test]
    fn identical_runs_identical_reports() {
        let src = "var.create a\nvar.set a = 'q'\n!set command = 'c'\n!cr a\nfrobnicate";
        let cfg = InterpreterConfig::default().with_report_unrecognized(true);
        let first = run_buffered(src, &cfg, Vec::<String>::new());
        for i in 0..100 {
            let again = run_buffered(src, &cfg, Vec::<String>::new());
            assert_eq!(first, again, "Determinism failure at iteration {i}");
        }
    }
}
