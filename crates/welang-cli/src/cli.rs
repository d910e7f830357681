use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "welang")]
#[command(about = "WeLang - a line-oriented toy scripting language", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a program
    Run {
        /// Program file (.wel or .wla)
        file: PathBuf,

        /// Start with debug traces off
        #[arg(short = 'q', long)]
        quiet: bool,

        /// Warn about every unrecognized line
        #[arg(long)]
        report_unrecognized: bool,

        /// Interpreter config file (JSON); flags override it
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print a JSON run report; inputs come from --input only
        #[arg(long)]
        json: bool,

        /// Scripted input line (repeatable); disables reading stdin
        #[arg(short = 'i', long = "input")]
        inputs: Vec<String>,
    },

    /// List lines the decoder does not recognize
    Check {
        /// Program file
        file: PathBuf,

        /// Print issues as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the instruction reference
    Reference {
        /// Print the structured JSON table
        #[arg(long)]
        json: bool,
    },
}
