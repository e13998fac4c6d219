//! # Meta-Schema Check
//!
//! Validates the raw JSON form of a schema against a Draft 2020-12
//! description of the vocabulary [`SchemaDefinition`](crate::SchemaDefinition)
//! understands. This catches problems that deserialization would report
//! less precisely (a string where `required` expects an array, a negative
//! `minLength`) and pinpoints them with a JSON Pointer.
//!
//! Unknown keywords are allowed, as is any string for `type`.

use std::fmt;

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

/// The meta-schema itself could not be compiled.
#[derive(Error, Debug, Clone)]
pub enum MetaSchemaError {
    /// Compilation failed.
    #[error("meta-schema failed to compile: {0}")]
    Compile(String),
}

/// One meta-schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetaIssue {
    /// JSON Pointer into the checked document.
    pub path: String,
    /// Violation message.
    pub message: String,
}

impl fmt::Display for MetaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// The meta-schema as a JSON value.
pub fn meta_schema() -> Value {
    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$ref": "#/$defs/schema",
        "$defs": {
            "count": { "type": "integer", "minimum": 0 },
            "names": {
                "type": "array",
                "items": { "type": "string" },
                "uniqueItems": true
            },
            "schema": {
                "type": "object",
                "properties": {
                    "id": { "type": "string", "minLength": 1 },
                    "type": { "type": "string", "minLength": 1 },
                    "description": { "type": "string" },
                    "properties": {
                        "type": "object",
                        "additionalProperties": { "$ref": "#/$defs/schema" }
                    },
                    "required": { "$ref": "#/$defs/names" },
                    "recommended": { "$ref": "#/$defs/names" },
                    "additionalProperties": { "type": "boolean" },
                    "items": { "$ref": "#/$defs/schema" },
                    "minLength": { "$ref": "#/$defs/count" },
                    "maxLength": { "$ref": "#/$defs/count" },
                    "pattern": { "type": "string" },
                    "enum": { "type": "array" },
                    "minimum": { "type": "number" },
                    "maximum": { "type": "number" },
                    "minItems": { "$ref": "#/$defs/count" },
                    "maxItems": { "$ref": "#/$defs/count" }
                }
            }
        }
    })
}

static META_VALIDATOR: Lazy<Result<Validator, MetaSchemaError>> = Lazy::new(|| {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.build(&meta_schema())
        .map_err(|e| MetaSchemaError::Compile(e.to_string()))
});

/// Check a raw schema document. An empty list means it conforms.
///
/// # Errors
///
/// Returns [`MetaSchemaError::Compile`] if the built-in meta-schema cannot
/// be compiled.
pub fn check_schema_document(schema: &Value) -> Result<Vec<MetaIssue>, MetaSchemaError> {
    let validator = META_VALIDATOR.as_ref().map_err(Clone::clone)?;
    Ok(validator
        .iter_errors(schema)
        .map(|e| MetaIssue {
            path: e.instance_path.to_string(),
            message: e.to_string(),
        })
        .collect())
}
