//! `welang`: run and check WeLang programs from the command line.

mod cli;
mod commands;

use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut stdout = io::stdout().lock();

    let code = match cli.command {
        Commands::Run {
            file,
            quiet,
            report_unrecognized,
            config,
            json,
            inputs,
        } => {
            let source = commands::read_program(&file)?;
            let config =
                commands::load_config(config.as_deref(), &file, quiet, report_unrecognized)?;
            commands::run_program(
                &source,
                &config,
                inputs,
                json,
                io::stdin().lock(),
                &mut stdout,
            )?
        }
        Commands::Check { file, json } => {
            let source = commands::read_program(&file)?;
            commands::check_program(&file.display().to_string(), &source, json, &mut stdout)?
        }
        Commands::Reference { json } => {
            commands::print_reference(json, &mut stdout)?;
            0
        }
    };

    Ok(ExitCode::from(code))
}
