//! # hf CLI entry point
//!
//! Parses command-line arguments, loads configuration, sets up tracing and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use hf_cli::config::{FoundryConfig, LogFormat};
use hf_cli::logging::init_tracing;
use hf_cli::schemas::{run_schemas, SchemasArgs};
use hf_cli::validate::{run_validate, ValidateArgs};
use hf_cli::{build_registry, EXIT_ERROR};
use hf_schema::Validator;

/// The Hero Foundry toolchain.
///
/// Validates character sheets, rulesets and homebrew content against the
/// built-in schemas or your own.
#[derive(Parser, Debug)]
#[command(name = "hf", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Additional directory of *.schema.{json,yaml,yml} files. Repeatable.
    #[arg(long = "schema-dir", global = true)]
    schema_dirs: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate documents against a registered schema.
    Validate(ValidateArgs),

    /// List, export, import and check schemas.
    Schemas(SchemasArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match FoundryConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_schema_dirs(cli.schema_dirs.iter().cloned()),
        Err(e) => {
            init_tracing(cli.verbose, LogFormat::Text);
            tracing::error!("{e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };
    init_tracing(cli.verbose, config.log_format);
    tracing::debug!(?config, "hf starting");

    match run(&cli.command, &config) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

fn run(command: &Commands, config: &FoundryConfig) -> Result<u8> {
    let registry = build_registry(config)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Validate(args) => {
            let validator = Validator::new(registry);
            run_validate(args, &validator, config, &mut out)
        }
        Commands::Schemas(args) => run_schemas(args, &registry, config, &mut out),
    }
}
