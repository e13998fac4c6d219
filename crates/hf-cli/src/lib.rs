//! # hf-cli — The Hero Foundry Command-Line Interface
//!
//! Validates character, ruleset and homebrew documents from disk and
//! manages the schema registry they are checked against.
//!
//! ## Subcommands
//!
//! - `validate` — batch-validate documents against a named schema
//! - `schemas` — list, export, import and check schemas
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers take parsed args and a
//!   writer and return an exit code.
//! - Handlers delegate to `hf-schema`; no validation logic here.

use anyhow::{Context, Result};

use hf_schema::{load_schema_dir, SchemaMap, SchemaRegistry};

pub mod config;
pub mod logging;
pub mod schemas;
pub mod validate;

use config::FoundryConfig;

/// Every document valid.
pub const EXIT_OK: u8 = 0;
/// At least one document invalid (or warned, under `fail_on_warnings`).
pub const EXIT_INVALID: u8 = 1;
/// The command could not run.
pub const EXIT_ERROR: u8 = 2;

/// Built-in schemas plus everything under the configured schema
/// directories, later directories overriding earlier ones.
pub fn build_registry(config: &FoundryConfig) -> Result<SchemaRegistry> {
    let registry = SchemaRegistry::with_builtins();
    for dir in &config.schema_dirs {
        let loaded = load_schema_dir(dir)
            .with_context(|| format!("loading schemas from {}", dir.display()))?;
        register_all(&registry, loaded.into_iter().collect(), config.strict_schemas)?;
    }
    tracing::debug!(schemas = registry.len(), "schema registry ready");
    Ok(registry)
}

/// Register `schemas`. When `strict` is set every schema is linted first
/// and one ill-formed entry rejects the whole set.
pub fn register_all(registry: &SchemaRegistry, schemas: SchemaMap, strict: bool) -> Result<usize> {
    if strict {
        return Ok(registry.import_schemas_checked(schemas)?);
    }
    let count = schemas.len();
    registry.import_schemas(schemas);
    Ok(count)
}
