//! # Schemas Subcommand
//!
//! ```bash
//! hf schemas list
//! hf schemas export --output schemas.json
//! hf schemas import extra-schemas.yaml
//! hf schemas check schemas/*.schema.json
//! ```
//!
//! The registry lives for one process, so `import` shows the effect of an
//! import on top of the built-ins and configured schema directories.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use hf_schema::{
    check_schema_document, lint_schema, load_document, SchemaDefinition, SchemaMap,
    SchemaRegistry,
};

use crate::config::FoundryConfig;
use crate::{register_all, EXIT_INVALID, EXIT_OK};

/// Schemas subcommand arguments.
#[derive(Args, Debug)]
pub struct SchemasArgs {
    #[command(subcommand)]
    pub command: SchemasCommand,
}

/// Available schemas subcommands.
#[derive(Subcommand, Debug)]
pub enum SchemasCommand {
    /// Print registered schema names.
    List,

    /// Write every registered schema as one JSON mapping.
    Export {
        /// Destination file. Defaults to stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a JSON or YAML mapping of name to schema.
    Import {
        /// Mapping file.
        file: PathBuf,
    },

    /// Run the meta-schema check and lint over schema files.
    Check {
        /// Schema files (JSON or YAML).
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Execute the schemas subcommand.
pub fn run_schemas(
    args: &SchemasArgs,
    registry: &SchemaRegistry,
    config: &FoundryConfig,
    out: &mut dyn Write,
) -> Result<u8> {
    match &args.command {
        SchemasCommand::List => run_list(registry, out),
        SchemasCommand::Export { output } => run_export(registry, output.as_deref(), out),
        SchemasCommand::Import { file } => run_import(registry, file, config.strict_schemas, out),
        SchemasCommand::Check { files } => run_check(files, out),
    }
}

fn run_list(registry: &SchemaRegistry, out: &mut dyn Write) -> Result<u8> {
    for name in registry.list_schemas() {
        writeln!(out, "{name}")?;
    }
    Ok(EXIT_OK)
}

fn run_export(registry: &SchemaRegistry, output: Option<&Path>, out: &mut dyn Write) -> Result<u8> {
    let rendered = serde_json::to_string_pretty(&registry.export_schemas())?;
    match output {
        Some(path) => {
            std::fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), schemas = registry.len(), "exported schemas");
        }
        None => writeln!(out, "{rendered}")?,
    }
    Ok(EXIT_OK)
}

fn run_import(
    registry: &SchemaRegistry,
    file: &Path,
    strict: bool,
    out: &mut dyn Write,
) -> Result<u8> {
    let value = load_document(file).with_context(|| format!("reading {}", file.display()))?;
    let count = if strict {
        let schemas: SchemaMap = serde_json::from_value(value)
            .with_context(|| format!("{} is not a mapping of schemas", file.display()))?;
        register_all(registry, schemas, true)?
    } else {
        registry.import_schemas_json(value)?
    };
    writeln!(out, "imported {count} schema(s) from {}", file.display())?;
    run_list(registry, out)
}

fn run_check(files: &[PathBuf], out: &mut dyn Write) -> Result<u8> {
    let mut failed = 0usize;
    for path in files {
        let value = load_document(path).with_context(|| format!("reading {}", path.display()))?;
        let mut problems = Vec::new();
        let mut notes = Vec::new();

        for issue in check_schema_document(&value)? {
            problems.push(format!("meta: {issue}"));
        }
        match serde_json::from_value::<SchemaDefinition>(value) {
            Ok(schema) => {
                for issue in lint_schema(&schema) {
                    if issue.kind.is_fatal() {
                        problems.push(format!("lint: {issue}"));
                    } else {
                        notes.push(format!("note: {issue}"));
                    }
                }
            }
            Err(e) if problems.is_empty() => problems.push(format!("parse: {e}")),
            Err(_) => {}
        }

        let status = if problems.is_empty() { "OK  " } else { "FAIL" };
        writeln!(out, "{status} {}", path.display())?;
        for line in problems.iter().chain(&notes) {
            writeln!(out, "  {line}")?;
        }
        if !problems.is_empty() {
            failed += 1;
        }
    }
    writeln!(out, "{}/{} schema file(s) well-formed", files.len() - failed, files.len())?;
    Ok(if failed == 0 { EXIT_OK } else { EXIT_INVALID })
}
