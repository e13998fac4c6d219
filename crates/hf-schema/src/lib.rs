//! # hf-schema — Schema Validation Engine
//!
//! Checks character sheets, rulesets and homebrew content against
//! declarative schemas and reports every problem with a dotted path to the
//! offending field (`abilityScores.strength`, `skills.0.name`).
//!
//! ## Modules
//!
//! - [`definition`]: [`SchemaDefinition`] and the ordered [`SchemaMap`].
//! - [`registry`]: [`SchemaRegistry`], the named schema store.
//! - [`validate`]: [`Validator`], the recursive engine.
//! - [`diagnostics`]: [`ValidationResult`], [`Diagnostic`] and
//!   [`validation_summary`] for batches.
//! - [`builtin`]: the `character`, `ruleset` and `homebrew` schemas.
//! - [`loader`]: JSON/YAML documents and `*.schema.*` files from disk.
//! - [`meta`] and [`lint`]: optional well-formedness checks for schemas.
//!
//! ## Usage
//!
//! ```
//! use hf_schema::{SchemaRegistry, Validator, ErrorCode};
//! use serde_json::json;
//!
//! let validator = Validator::new(SchemaRegistry::with_builtins());
//! let result = validator.validate(&json!({"id": "r1", "name": "Core"}), "ruleset");
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].code, ErrorCode::RequiredPropertyMissing);
//! assert_eq!(result.errors()[0].path, "version");
//! ```
//!
//! ## Crate Policy
//!
//! - Depends only on `hf-core` internally.
//! - [`Validator::validate`] never panics on document or schema content and
//!   always returns a [`ValidationResult`].
//! - Registration does not check schemas unless asked to
//!   ([`SchemaRegistry::register_schema_checked`]).

pub mod builtin;
pub mod definition;
pub mod diagnostics;
pub mod lint;
pub mod loader;
pub mod meta;
pub mod registry;
pub mod validate;

pub use builtin::builtin_schemas;
pub use definition::{SchemaDefinition, SchemaMap, SchemaType};
pub use diagnostics::{
    validation_summary, Diagnostic, ErrorCode, ValidationError, ValidationResult,
    ValidationSummary, ValidationWarning,
};
pub use lint::{lint_schema, LintIssue, LintKind};
pub use loader::{load_document, load_schema_dir, load_schema_file, LoadError};
pub use meta::{check_schema_document, MetaIssue, MetaSchemaError};
pub use registry::{RegistryError, SchemaRegistry};
pub use validate::{EngineError, Validator, PATTERN_CACHE_CAPACITY};
