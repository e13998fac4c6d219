//! # Schema Registry
//!
//! Named store of [`SchemaDefinition`]s. A [`SchemaRegistry`] is a cheap
//! handle: clones share the same underlying map, so the validator, loaders
//! and administrative callers all observe the same registrations.
//!
//! Registration is last-write-wins. Re-registering a name replaces the
//! schema wholesale (no merge) and keeps the name's original position in
//! [`SchemaRegistry::list_schemas`].
//!
//! [`SchemaRegistry::register_schema`] performs no well-formedness check;
//! a broken schema shows up later as a `VALIDATION_ERROR` result. Use
//! [`SchemaRegistry::register_schema_checked`] to lint first.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde_json::Value;
use thiserror::Error;

use hf_core::json_type_of;

use crate::builtin::builtin_schemas;
use crate::definition::{SchemaDefinition, SchemaMap};
use crate::lint::{lint_schema, LintIssue};

/// Errors from administrative registry operations.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// An import argument was not a name → schema mapping.
    #[error("expected a mapping of schema names to schemas, found {found}")]
    NotAMapping {
        /// JSON type of the rejected argument.
        found: String,
    },

    /// A schema could not be read as a [`SchemaDefinition`].
    #[error("schema '{name}' is malformed: {reason}")]
    MalformedSchema {
        /// Registry name of the schema.
        name: String,
        /// Deserialization failure.
        reason: String,
    },

    /// A schema failed lint under checked registration.
    #[error("schema '{name}' is ill-formed:\n{}", render_issues(.issues))]
    IllFormedSchema {
        /// Registry name of the schema.
        name: String,
        /// Fatal lint findings.
        issues: Vec<LintIssue>,
    },
}

fn render_issues(issues: &[LintIssue]) -> String {
    issues
        .iter()
        .map(|i| format!("  {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Default)]
struct Entries {
    order: Vec<String>,
    schemas: HashMap<String, Arc<SchemaDefinition>>,
}

impl Entries {
    fn insert(&mut self, name: String, schema: Arc<SchemaDefinition>) -> bool {
        let replaced = self.schemas.insert(name.clone(), schema).is_some();
        if !replaced {
            self.order.push(name);
        }
        replaced
    }
}

/// Shared, internally synchronized schema store.
#[derive(Clone, Default)]
pub struct SchemaRegistry {
    inner: Arc<RwLock<Entries>>,
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("schemas", &self.inner.read().order)
            .finish()
    }
}

static GLOBAL: Lazy<SchemaRegistry> = Lazy::new(SchemaRegistry::with_builtins);

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry seeded with `character`, `ruleset` and `homebrew`.
    pub fn with_builtins() -> Self {
        let registry = Self::new();
        registry.import_schemas(builtin_schemas());
        registry
    }

    /// The process-wide default registry, seeded with the built-ins on first
    /// use. Prefer passing an explicit registry where one is available.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    /// Insert or replace `name`. Returns `true` when an existing schema was
    /// replaced.
    pub fn register_schema(&self, name: impl Into<String>, schema: SchemaDefinition) -> bool {
        let name = name.into();
        let replaced = self.inner.write().insert(name.clone(), Arc::new(schema));
        tracing::debug!(schema = %name, replaced, "registered schema");
        replaced
    }

    /// Like [`register_schema`](Self::register_schema), but rejects schemas
    /// with fatal lint findings. Informational findings are allowed.
    pub fn register_schema_checked(
        &self,
        name: impl Into<String>,
        schema: SchemaDefinition,
    ) -> Result<bool, RegistryError> {
        let name = name.into();
        reject_ill_formed(&name, &schema)?;
        Ok(self.register_schema(name, schema))
    }

    /// Register a schema given as raw JSON.
    ///
    /// # Errors
    ///
    /// [`RegistryError::MalformedSchema`] when `schema` is not an object or
    /// does not deserialize.
    pub fn register_schema_json(
        &self,
        name: impl Into<String>,
        schema: Value,
    ) -> Result<bool, RegistryError> {
        let name = name.into();
        let definition = parse_definition(&name, schema)?;
        Ok(self.register_schema(name, definition))
    }

    /// Register every entry of `schemas` in iteration order.
    pub fn import_schemas(&self, schemas: SchemaMap) {
        let count = schemas.len();
        {
            let mut entries = self.inner.write();
            for (name, schema) in schemas {
                let replaced = entries.insert(name.clone(), Arc::new(schema));
                tracing::debug!(schema = %name, replaced, "registered schema");
            }
        }
        tracing::debug!(count, "imported schemas");
    }

    /// Lint every entry of `schemas`, then register them all. The first
    /// schema with fatal findings is reported and nothing is registered.
    pub fn import_schemas_checked(&self, schemas: SchemaMap) -> Result<usize, RegistryError> {
        for (name, schema) in schemas.iter() {
            reject_ill_formed(name, schema)?;
        }
        let count = schemas.len();
        self.import_schemas(schemas);
        Ok(count)
    }

    /// Import a raw JSON `{ name: schema, ... }` mapping.
    ///
    /// Every entry is parsed before anything is registered, so a malformed
    /// entry leaves the registry untouched.
    pub fn import_schemas_json(&self, schemas: Value) -> Result<usize, RegistryError> {
        let Value::Object(entries) = schemas else {
            return Err(RegistryError::NotAMapping {
                found: json_type_of(&schemas).to_string(),
            });
        };
        let mut parsed = SchemaMap::new();
        for (name, schema) in entries {
            let definition = parse_definition(&name, schema)?;
            parsed.insert(name, definition);
        }
        let count = parsed.len();
        self.import_schemas(parsed);
        Ok(count)
    }

    /// Owned snapshot of every schema in registration order.
    pub fn export_schemas(&self) -> SchemaMap {
        let entries = self.inner.read();
        entries
            .order
            .iter()
            .filter_map(|name| {
                entries
                    .schemas
                    .get(name)
                    .map(|s| (name.clone(), SchemaDefinition::clone(s)))
            })
            .collect()
    }

    /// Registered names in registration order.
    pub fn list_schemas(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// The schema registered under `name`.
    pub fn get_schema(&self, name: &str) -> Option<Arc<SchemaDefinition>> {
        self.inner.read().schemas.get(name).cloned()
    }

    /// Whether `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().schemas.contains_key(name)
    }

    /// Number of registered schemas.
    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn reject_ill_formed(name: &str, schema: &SchemaDefinition) -> Result<(), RegistryError> {
    let issues: Vec<LintIssue> = lint_schema(schema)
        .into_iter()
        .filter(|i| i.kind.is_fatal())
        .collect();
    if issues.is_empty() {
        return Ok(());
    }
    tracing::warn!(schema = %name, issues = issues.len(), "rejected ill-formed schema");
    Err(RegistryError::IllFormedSchema {
        name: name.to_string(),
        issues,
    })
}

fn parse_definition(name: &str, schema: Value) -> Result<SchemaDefinition, RegistryError> {
    if !schema.is_object() {
        return Err(RegistryError::MalformedSchema {
            name: name.to_string(),
            reason: format!("expected an object, found {}", json_type_of(&schema)),
        });
    }
    serde_json::from_value(schema).map_err(|e| RegistryError::MalformedSchema {
        name: name.to_string(),
        reason: e.to_string(),
    })
}
