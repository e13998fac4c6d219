//! # Schema Lint
//!
//! Semantic checks on a [`SchemaDefinition`] that serde cannot express.
//! Registration never runs these implicitly: a malformed schema registered
//! through [`SchemaRegistry::register_schema`](crate::SchemaRegistry::register_schema)
//! surfaces as a `VALIDATION_ERROR` at validation time. Callers that want
//! the stricter behavior use
//! [`SchemaRegistry::register_schema_checked`](crate::SchemaRegistry::register_schema_checked).
//!
//! Paths are JSON Pointers into the schema document (`/properties/name`).

use std::fmt;

use regex::Regex;
use serde::Serialize;
use serde_json::Number;

use hf_core::JsonType;

use crate::definition::SchemaDefinition;

/// Category of a lint finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LintKind {
    /// `pattern` is not a valid regular expression.
    InvalidPattern,
    /// A lower bound exceeds its upper bound.
    InvertedRange,
    /// A constraint keyword that the declared type ignores.
    InapplicableConstraint,
    /// A `required` name is undeclared while additional properties are
    /// rejected. Informational; the name is still accepted by the sweep.
    RequiredNotDeclared,
    /// A `type` outside the seven JSON types. Informational.
    UnknownType,
}

impl LintKind {
    /// Whether the finding makes the schema unusable or self-contradictory.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnknownType | Self::RequiredNotDeclared)
    }
}

/// One lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintIssue {
    /// JSON Pointer to the offending schema node.
    pub path: String,
    /// Category.
    pub kind: LintKind,
    /// Human-readable explanation.
    pub message: String,
}

impl fmt::Display for LintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

/// Collect every lint finding in `schema`, depth-first in declaration order.
pub fn lint_schema(schema: &SchemaDefinition) -> Vec<LintIssue> {
    let mut issues = Vec::new();
    lint_node(schema, "", &mut issues);
    issues
}

fn lint_node(schema: &SchemaDefinition, path: &str, issues: &mut Vec<LintIssue>) {
    let mut push = |kind: LintKind, message: String| {
        issues.push(LintIssue {
            path: path.to_string(),
            kind,
            message,
        });
    };

    let declared = schema.schema_type.as_ref().and_then(|t| t.json_type());
    if let Some(t) = &schema.schema_type {
        if declared.is_none() {
            push(
                LintKind::UnknownType,
                format!("type '{t}' is not a JSON type; values are accepted without checks"),
            );
        }
    }

    if let Some(pattern) = &schema.pattern {
        if let Err(e) = Regex::new(pattern) {
            push(
                LintKind::InvalidPattern,
                format!("pattern '{pattern}' does not compile: {e}"),
            );
        }
    }

    if let (Some(min), Some(max)) = (schema.min_length, schema.max_length) {
        if min > max {
            push(
                LintKind::InvertedRange,
                format!("minLength {min} exceeds maxLength {max}"),
            );
        }
    }
    if let (Some(min), Some(max)) = (schema.min_items, schema.max_items) {
        if min > max {
            push(
                LintKind::InvertedRange,
                format!("minItems {min} exceeds maxItems {max}"),
            );
        }
    }
    if let (Some(min), Some(max)) = (&schema.minimum, &schema.maximum) {
        if number_gt(min, max) {
            push(
                LintKind::InvertedRange,
                format!("minimum {min} exceeds maximum {max}"),
            );
        }
    }

    if let Some(t) = declared {
        for keyword in inapplicable_keywords(schema, t) {
            push(
                LintKind::InapplicableConstraint,
                format!("'{keyword}' has no effect on type '{t}'"),
            );
        }
    }

    if schema.rejects_additional_properties() {
        for name in &schema.required {
            if !schema.properties.contains_key(name) {
                push(
                    LintKind::RequiredNotDeclared,
                    format!(
                        "required property '{name}' is not declared in properties while additionalProperties is false"
                    ),
                );
            }
        }
    }

    for (name, child) in schema.properties.iter() {
        lint_node(child, &format!("{path}/properties/{}", escape_pointer(name)), issues);
    }
    if let Some(items) = &schema.items {
        lint_node(items, &format!("{path}/items"), issues);
    }
}

fn inapplicable_keywords(schema: &SchemaDefinition, t: JsonType) -> Vec<&'static str> {
    let mut found = Vec::new();
    let string_like = t == JsonType::String;
    let numeric = matches!(t, JsonType::Integer | JsonType::Number);
    let object = t == JsonType::Object;
    let array = t == JsonType::Array;

    if !string_like {
        if schema.min_length.is_some() {
            found.push("minLength");
        }
        if schema.max_length.is_some() {
            found.push("maxLength");
        }
        if schema.pattern.is_some() {
            found.push("pattern");
        }
        if schema.enum_values.is_some() {
            found.push("enum");
        }
    }
    if !numeric {
        if schema.minimum.is_some() {
            found.push("minimum");
        }
        if schema.maximum.is_some() {
            found.push("maximum");
        }
    }
    if !array {
        if schema.items.is_some() {
            found.push("items");
        }
        if schema.min_items.is_some() {
            found.push("minItems");
        }
        if schema.max_items.is_some() {
            found.push("maxItems");
        }
    }
    if !object {
        if !schema.properties.is_empty() {
            found.push("properties");
        }
        if !schema.required.is_empty() {
            found.push("required");
        }
        if !schema.recommended.is_empty() {
            found.push("recommended");
        }
        if schema.additional_properties.is_some() {
            found.push("additionalProperties");
        }
    }
    found
}

fn number_gt(a: &Number, b: &Number) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(a), Some(b)) => a > b,
        _ => false,
    }
}

/// RFC 6901 escaping for a single pointer token.
fn escape_pointer(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}
