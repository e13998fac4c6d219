//! # Recursive Validator
//!
//! Checks a `serde_json::Value` against a [`SchemaDefinition`] and collects
//! every problem found, not just the first.
//!
//! ## Algorithm
//!
//! Each schema node is checked against the value at that position with paths
//! relative to the node. The parent then splices the child's diagnostics in
//! under the property name or array index ([`prefix_path`]), which yields
//! fully qualified paths such as `skills.0.name` at any depth.
//!
//! For objects the order of checks is fixed and observable in the error
//! list: `required` (declaration order), then `recommended`, then declared
//! properties (declaration order), then the `additionalProperties` sweep
//! (document order).
//!
//! ## Failure Boundary
//!
//! The recursion returns `Result<_, EngineError>` and uses `?` freely.
//! [`Validator::validate`] is the only place an [`EngineError`] is turned
//! into a result: a single root-level `VALIDATION_ERROR`. Callers always get
//! a [`ValidationResult`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use serde_json::{Map, Number, Value};
use thiserror::Error;

use hf_core::{index_segment, json_type_of, prefix_path, JsonType};

use crate::definition::SchemaDefinition;
use crate::diagnostics::{Diagnostic, ErrorCode, ValidationResult};
use crate::registry::SchemaRegistry;

/// A schema the engine cannot apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `pattern` does not compile.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written in the schema.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

/// Diagnostics gathered for one schema node, paths relative to that node.
#[derive(Debug, Default)]
struct Outcome {
    errors: Vec<Diagnostic>,
    warnings: Vec<Diagnostic>,
}

impl Outcome {
    fn error(&mut self, path: impl Into<String>, code: ErrorCode, message: String) {
        self.errors.push(Diagnostic::new(path, code, message));
    }

    fn error_with_value(
        &mut self,
        path: impl Into<String>,
        code: ErrorCode,
        message: String,
        value: &Value,
    ) {
        self.errors
            .push(Diagnostic::new(path, code, message).with_value(value.clone()));
    }

    fn warning(&mut self, path: impl Into<String>, code: ErrorCode, message: String) {
        self.warnings.push(Diagnostic::new(path, code, message));
    }

    /// Move `child`'s diagnostics into `self` under `segment`.
    fn splice(&mut self, segment: &str, child: Outcome) {
        let rebase = |mut d: Diagnostic| {
            d.path = prefix_path(segment, &d.path);
            d
        };
        self.errors.extend(child.errors.into_iter().map(rebase));
        self.warnings.extend(child.warnings.into_iter().map(rebase));
    }
}

/// Compiled patterns kept per validator. A full cache is cleared before the
/// next insert, so patterns from replaced schemas do not accumulate.
pub const PATTERN_CACHE_CAPACITY: usize = 256;

static GLOBAL: Lazy<Validator> = Lazy::new(|| Validator::new(SchemaRegistry::global().clone()));

/// Validates documents against schemas held in a [`SchemaRegistry`].
///
/// Compiled `pattern` expressions are cached per validator, up to
/// [`PATTERN_CACHE_CAPACITY`] entries, so reuse one instance for batches.
#[derive(Debug)]
pub struct Validator {
    registry: SchemaRegistry,
    patterns: Mutex<HashMap<String, Regex>>,
}

impl Validator {
    /// A validator reading schemas from `registry`.
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            patterns: Mutex::new(HashMap::new()),
        }
    }

    /// Validator over [`SchemaRegistry::global`].
    pub fn global() -> &'static Validator {
        &GLOBAL
    }

    /// The registry this validator reads from.
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Validate `document` against the schema registered as `schema_name`.
    ///
    /// An unregistered name yields exactly one `SCHEMA_NOT_FOUND` error and
    /// nothing else.
    pub fn validate(&self, document: &Value, schema_name: &str) -> ValidationResult {
        let Some(schema) = self.registry.get_schema(schema_name) else {
            tracing::warn!(schema = schema_name, "schema not found");
            return ValidationResult::single_error(
                ErrorCode::SchemaNotFound,
                format!("Schema '{schema_name}' not found"),
            );
        };
        let result = self.validate_schema(document, &schema);
        tracing::info!(
            schema = schema_name,
            is_valid = result.is_valid(),
            errors = result.errors().len(),
            warnings = result.warnings().len(),
            "validated document"
        );
        result
    }

    /// Validate against an unregistered definition.
    pub fn validate_schema(&self, document: &Value, schema: &SchemaDefinition) -> ValidationResult {
        match self.check(document, schema) {
            Ok(outcome) => ValidationResult::from_parts(outcome.errors, outcome.warnings),
            Err(e) => {
                tracing::error!(error = %e, schema = ?schema.id, "validation aborted");
                ValidationResult::single_error(
                    ErrorCode::ValidationError,
                    format!("Validation failed: {e}"),
                )
            }
        }
    }

    /// Validate each document independently, in input order.
    pub fn validate_multiple(&self, documents: &[Value], schema_name: &str) -> Vec<ValidationResult> {
        documents
            .iter()
            .map(|document| self.validate(document, schema_name))
            .collect()
    }

    fn check(&self, value: &Value, schema: &SchemaDefinition) -> Result<Outcome, EngineError> {
        let mut out = Outcome::default();
        // Absent or unrecognized types accept anything.
        let Some(expected) = schema.schema_type.as_ref().and_then(|t| t.json_type()) else {
            return Ok(out);
        };

        if !expected.matches(value) {
            out.error_with_value(
                "",
                ErrorCode::TypeMismatch,
                format!("Expected {expected}, got {}", json_type_of(value)),
                value,
            );
            return Ok(out);
        }

        match (expected, value) {
            (JsonType::Object, Value::Object(map)) => self.check_object(map, schema, &mut out)?,
            (JsonType::Array, Value::Array(items)) => self.check_array(value, items, schema, &mut out)?,
            (JsonType::String, Value::String(s)) => self.check_string(value, s, schema, &mut out)?,
            (JsonType::Integer | JsonType::Number, Value::Number(n)) => {
                check_number(value, n, schema, &mut out)
            }
            _ => {}
        }
        Ok(out)
    }

    fn check_object(
        &self,
        map: &Map<String, Value>,
        schema: &SchemaDefinition,
        out: &mut Outcome,
    ) -> Result<(), EngineError> {
        for name in &schema.required {
            if !map.contains_key(name) {
                out.error(
                    name.as_str(),
                    ErrorCode::RequiredPropertyMissing,
                    format!("Required property '{name}' is missing"),
                );
            }
        }

        for name in &schema.recommended {
            if !map.contains_key(name) {
                out.warning(
                    name.as_str(),
                    ErrorCode::RecommendedPropertyMissing,
                    format!("Recommended property '{name}' is missing"),
                );
            }
        }

        for (name, child_schema) in schema.properties.iter() {
            if let Some(child) = map.get(name) {
                let child_outcome = self.check(child, child_schema)?;
                out.splice(name, child_outcome);
            }
        }

        if schema.rejects_additional_properties() {
            for (key, v) in map {
                if !schema.properties.contains_key(key) && !schema.required.contains(key) {
                    out.error_with_value(
                        key.as_str(),
                        ErrorCode::AdditionalPropertyNotAllowed,
                        format!("Additional property '{key}' is not allowed"),
                        v,
                    );
                }
            }
        }
        Ok(())
    }

    fn check_array(
        &self,
        value: &Value,
        items: &[Value],
        schema: &SchemaDefinition,
        out: &mut Outcome,
    ) -> Result<(), EngineError> {
        if let Some(item_schema) = &schema.items {
            for (i, item) in items.iter().enumerate() {
                let child_outcome = self.check(item, item_schema)?;
                out.splice(&index_segment(i), child_outcome);
            }
        }

        let len = items.len() as u64;
        if let Some(min) = schema.min_items {
            if len < min {
                out.error_with_value(
                    "",
                    ErrorCode::ArrayTooShort,
                    format!("Array must have at least {min} items"),
                    value,
                );
            }
        }
        if let Some(max) = schema.max_items {
            if len > max {
                out.error_with_value(
                    "",
                    ErrorCode::ArrayTooLong,
                    format!("Array must have at most {max} items"),
                    value,
                );
            }
        }
        Ok(())
    }

    fn check_string(
        &self,
        value: &Value,
        s: &str,
        schema: &SchemaDefinition,
        out: &mut Outcome,
    ) -> Result<(), EngineError> {
        let len = s.chars().count() as u64;
        if let Some(min) = schema.min_length {
            if len < min {
                out.error_with_value(
                    "",
                    ErrorCode::StringTooShort,
                    format!("String must be at least {min} characters long"),
                    value,
                );
            }
        }
        if let Some(max) = schema.max_length {
            if len > max {
                out.error_with_value(
                    "",
                    ErrorCode::StringTooLong,
                    format!("String must be at most {max} characters long"),
                    value,
                );
            }
        }
        if let Some(pattern) = &schema.pattern {
            if !self.compiled(pattern)?.is_match(s) {
                out.error_with_value(
                    "",
                    ErrorCode::PatternMismatch,
                    format!("String does not match pattern: {pattern}"),
                    value,
                );
            }
        }
        if let Some(allowed) = &schema.enum_values {
            if !allowed.contains(value) {
                out.error_with_value(
                    "",
                    ErrorCode::EnumMismatch,
                    format!("Value must be one of: {}", render_allowed(allowed)),
                    value,
                );
            }
        }
        Ok(())
    }

    fn compiled(&self, pattern: &str) -> Result<Regex, EngineError> {
        let mut cache = self.patterns.lock();
        if let Some(re) = cache.get(pattern) {
            return Ok(re.clone());
        }
        let re = Regex::new(pattern).map_err(|e| EngineError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if cache.len() >= PATTERN_CACHE_CAPACITY {
            tracing::debug!(evicted = cache.len(), "pattern cache full, clearing");
            cache.clear();
        }
        cache.insert(pattern.to_string(), re.clone());
        Ok(re)
    }
}

fn check_number(value: &Value, n: &Number, schema: &SchemaDefinition, out: &mut Outcome) {
    let actual = as_f64(n);
    if let Some(min) = &schema.minimum {
        if actual < as_f64(min) {
            out.error_with_value(
                "",
                ErrorCode::ValueTooSmall,
                format!("Value must be at least {min}"),
                value,
            );
        }
    }
    if let Some(max) = &schema.maximum {
        if actual > as_f64(max) {
            out.error_with_value(
                "",
                ErrorCode::ValueTooLarge,
                format!("Value must be at most {max}"),
                value,
            );
        }
    }
}

/// `None` only under `arbitrary_precision`; NaN then fails every comparison.
fn as_f64(n: &Number) -> f64 {
    n.as_f64().unwrap_or(f64::NAN)
}

fn render_allowed(allowed: &[Value]) -> String {
    allowed
        .iter()
        .map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator_with(name: &str, schema: SchemaDefinition) -> Validator {
        let registry = SchemaRegistry::new();
        registry.register_schema(name, schema);
        Validator::new(registry)
    }

    fn codes_and_paths(result: &ValidationResult) -> Vec<(ErrorCode, &str)> {
        result
            .errors()
            .iter()
            .map(|e| (e.code, e.path.as_str()))
            .collect()
    }

    #[test]
    fn type_mismatch_stops_descent() {
        let schema = SchemaDefinition::object()
            .with_property("name", SchemaDefinition::string())
            .with_required(["name"]);
        let v = validator_with("s", schema);
        let result = v.validate(&json!("not an object"), "s");
        assert_eq!(codes_and_paths(&result), vec![(ErrorCode::TypeMismatch, "")]);
        assert_eq!(result.errors()[0].message, "Expected object, got string");
        assert_eq!(result.errors()[0].value, Some(json!("not an object")));
    }

    #[test]
    fn object_check_order_is_required_then_properties_then_additional() {
        let schema = SchemaDefinition::object()
            .with_property("b", SchemaDefinition::integer())
            .with_property("a", SchemaDefinition::string())
            .with_required(["z", "a"])
            .closed();
        let v = validator_with("s", schema);
        let result = v.validate(&json!({"extra": 1, "b": "x", "z": true}), "s");
        assert_eq!(
            codes_and_paths(&result),
            vec![
                (ErrorCode::RequiredPropertyMissing, "a"),
                (ErrorCode::TypeMismatch, "b"),
                (ErrorCode::AdditionalPropertyNotAllowed, "extra"),
            ]
        );
    }

    #[test]
    fn required_names_are_exempt_from_additional_sweep() {
        let schema = SchemaDefinition::object().with_required(["id"]).closed();
        let v = validator_with("s", schema);
        assert!(v.validate(&json!({"id": 1}), "s").is_valid());
    }

    #[test]
    fn integer_accepts_whole_floats_only() {
        let v = validator_with("i", SchemaDefinition::integer());
        assert!(v.validate(&json!(5.0), "i").is_valid());
        let result = v.validate(&json!(5.5), "i");
        assert_eq!(result.errors()[0].message, "Expected integer, got number");
    }

    #[test]
    fn number_bounds_are_inclusive() {
        let v = validator_with("n", SchemaDefinition::number().with_minimum(0).with_maximum(1));
        assert!(v.validate(&json!(0), "n").is_valid());
        assert!(v.validate(&json!(1.0), "n").is_valid());
        assert_eq!(
            v.validate(&json!(-0.5), "n").error_codes(),
            vec![ErrorCode::ValueTooSmall]
        );
        let result = v.validate(&json!(1.5), "n");
        assert_eq!(result.errors()[0].message, "Value must be at most 1");
    }

    #[test]
    fn string_length_counts_characters() {
        let v = validator_with("s", SchemaDefinition::string().with_max_length(3));
        assert!(v.validate(&json!("äöü"), "s").is_valid());
        assert_eq!(
            v.validate(&json!("äöüß"), "s").error_codes(),
            vec![ErrorCode::StringTooLong]
        );
    }

    #[test]
    fn pattern_is_an_unanchored_search() {
        let v = validator_with("s", SchemaDefinition::string().with_pattern("[0-9]+"));
        assert!(v.validate(&json!("abc123def"), "s").is_valid());
        let result = v.validate(&json!("abc"), "s");
        assert_eq!(result.errors()[0].message, "String does not match pattern: [0-9]+");
    }

    #[test]
    fn enum_message_lists_allowed_values() {
        let v = validator_with("s", SchemaDefinition::string().with_enum(["draft", "active"]));
        let result = v.validate(&json!("gone"), "s");
        assert_eq!(result.errors()[0].code, ErrorCode::EnumMismatch);
        assert_eq!(result.errors()[0].message, "Value must be one of: draft, active");
    }

    #[test]
    fn array_bounds_echo_the_array() {
        let v = validator_with(
            "a",
            SchemaDefinition::array_of(SchemaDefinition::string()).with_min_items(2),
        );
        let result = v.validate(&json!(["x"]), "a");
        assert_eq!(codes_and_paths(&result), vec![(ErrorCode::ArrayTooShort, "")]);
        assert_eq!(result.errors()[0].value, Some(json!(["x"])));
    }

    #[test]
    fn array_items_are_checked_before_size() {
        let v = validator_with(
            "a",
            SchemaDefinition::array_of(SchemaDefinition::integer()).with_max_items(1),
        );
        let result = v.validate(&json!([1, "two"]), "a");
        assert_eq!(
            codes_and_paths(&result),
            vec![(ErrorCode::TypeMismatch, "1"), (ErrorCode::ArrayTooLong, "")]
        );
    }

    #[test]
    fn boolean_and_null_are_exact() {
        let v = validator_with("b", SchemaDefinition::boolean());
        assert!(v.validate(&json!(false), "b").is_valid());
        assert!(!v.validate(&json!(0), "b").is_valid());
        let v = validator_with("z", SchemaDefinition::null());
        assert!(v.validate(&json!(null), "z").is_valid());
        assert!(!v.validate(&json!({}), "z").is_valid());
    }

    #[test]
    fn missing_or_unknown_type_is_permissive() {
        let v = validator_with("any", SchemaDefinition::default().with_min_length(100));
        assert!(v.validate(&json!("x"), "any").is_valid());
        let unknown: SchemaDefinition =
            serde_json::from_value(json!({"type": "date", "minLength": 100})).unwrap();
        let v = validator_with("d", unknown);
        assert!(v.validate(&json!(42), "d").is_valid());
    }

    #[test]
    fn invalid_pattern_becomes_single_validation_error() {
        let schema = SchemaDefinition::object()
            .with_property("a", SchemaDefinition::integer())
            .with_property("code", SchemaDefinition::string().with_pattern("(["));
        let v = validator_with("s", schema);
        let result = v.validate(&json!({"a": "wrong", "code": "x"}), "s");
        assert_eq!(codes_and_paths(&result), vec![(ErrorCode::ValidationError, "")]);
        assert!(result.errors()[0].message.starts_with("Validation failed: invalid pattern"));
    }

    #[test]
    fn recommended_properties_warn_without_failing() {
        let schema = SchemaDefinition::object()
            .with_property("description", SchemaDefinition::string())
            .with_recommended(["description"]);
        let v = validator_with("h", schema);
        let result = v.validate(&json!({}), "h");
        assert!(result.is_valid());
        assert_eq!(result.warnings().len(), 1);
        assert_eq!(result.warnings()[0].code, ErrorCode::RecommendedPropertyMissing);
        assert_eq!(result.warnings()[0].path, "description");
    }

    #[test]
    fn nested_warnings_are_spliced() {
        let inner = SchemaDefinition::object().with_recommended(["note"]);
        let schema = SchemaDefinition::object()
            .with_property("items", SchemaDefinition::array_of(inner));
        let v = validator_with("s", schema);
        let result = v.validate(&json!({"items": [{"note": "x"}, {}]}), "s");
        assert_eq!(result.warnings()[0].path, "items.1.note");
    }

    #[test]
    fn pattern_cache_is_reused() {
        let v = validator_with("s", SchemaDefinition::string().with_pattern("^a"));
        v.validate(&json!("abc"), "s");
        v.validate(&json!("bcd"), "s");
        assert_eq!(v.patterns.lock().len(), 1);
    }

    #[test]
    fn pattern_cache_stays_bounded() {
        let v = Validator::new(SchemaRegistry::new());
        for i in 0..PATTERN_CACHE_CAPACITY + 10 {
            let schema = SchemaDefinition::string().with_pattern(format!("^p{i}$"));
            let result = v.validate_schema(&json!(format!("p{i}")), &schema);
            assert!(result.is_valid());
        }
        let cached = v.patterns.lock().len();
        assert!(cached <= PATTERN_CACHE_CAPACITY);
        assert_eq!(cached, 10);
    }

    #[test]
    fn global_validator_knows_builtins() {
        let result = Validator::global().validate(&json!({}), "ruleset");
        assert_eq!(
            codes_and_paths(&result),
            vec![
                (ErrorCode::RequiredPropertyMissing, "id"),
                (ErrorCode::RequiredPropertyMissing, "name"),
                (ErrorCode::RequiredPropertyMissing, "version"),
            ]
        );
    }
}
