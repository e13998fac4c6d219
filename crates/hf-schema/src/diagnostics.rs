//! # Validation Diagnostics
//!
//! The records returned by the validator: one [`Diagnostic`] per problem,
//! collected into a [`ValidationResult`] per document, and rolled up across
//! documents by [`validation_summary`].
//!
//! Errors and warnings share the [`Diagnostic`] shape. Only errors affect
//! [`ValidationResult::is_valid`].

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Stable machine-readable diagnostic category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// A `required` property is absent.
    RequiredPropertyMissing,
    /// The value's runtime type differs from the declared type.
    TypeMismatch,
    /// String shorter than `minLength`.
    StringTooShort,
    /// String longer than `maxLength`.
    StringTooLong,
    /// String does not match `pattern`.
    PatternMismatch,
    /// Value not in `enum`.
    EnumMismatch,
    /// Number below `minimum`.
    ValueTooSmall,
    /// Number above `maximum`.
    ValueTooLarge,
    /// Undeclared property under `additionalProperties: false`.
    AdditionalPropertyNotAllowed,
    /// Array shorter than `minItems`.
    ArrayTooShort,
    /// Array longer than `maxItems`.
    ArrayTooLong,
    /// The requested schema name is not registered.
    SchemaNotFound,
    /// The engine could not complete validation.
    ValidationError,
    /// A `recommended` property is absent. Warning only.
    RecommendedPropertyMissing,
}

impl ErrorCode {
    /// The serialized form, e.g. `TYPE_MISMATCH`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredPropertyMissing => "REQUIRED_PROPERTY_MISSING",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::StringTooShort => "STRING_TOO_SHORT",
            Self::StringTooLong => "STRING_TOO_LONG",
            Self::PatternMismatch => "PATTERN_MISMATCH",
            Self::EnumMismatch => "ENUM_MISMATCH",
            Self::ValueTooSmall => "VALUE_TOO_SMALL",
            Self::ValueTooLarge => "VALUE_TOO_LARGE",
            Self::AdditionalPropertyNotAllowed => "ADDITIONAL_PROPERTY_NOT_ALLOWED",
            Self::ArrayTooShort => "ARRAY_TOO_SHORT",
            Self::ArrayTooLong => "ARRAY_TOO_LONG",
            Self::SchemaNotFound => "SCHEMA_NOT_FOUND",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::RecommendedPropertyMissing => "RECOMMENDED_PROPERTY_MISSING",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validation problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Dotted/indexed location relative to the document root. Empty at root.
    pub path: String,
    /// Human-readable explanation.
    pub message: String,
    /// Machine-readable category.
    pub code: ErrorCode,
    /// Echo of the offending value, where it helps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// A diagnostic that fails validation.
pub type ValidationError = Diagnostic;

/// A diagnostic that does not affect the outcome.
pub type ValidationWarning = Diagnostic;

impl Diagnostic {
    /// A diagnostic without a value echo.
    pub fn new(path: impl Into<String>, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
            code,
            value: None,
        }
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "(root): {} [{}]", self.message, self.code)
        } else {
            write!(f, "{}: {} [{}]", self.path, self.message, self.code)
        }
    }
}

/// Outcome of validating one document.
///
/// Built only by the validator, so `is_valid` always equals
/// `errors().is_empty()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    is_valid: bool,
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub(crate) fn from_parts(errors: Vec<ValidationError>, warnings: Vec<ValidationWarning>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    /// A failed result carrying exactly one root-level error.
    pub(crate) fn single_error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::from_parts(vec![Diagnostic::new("", code, message)], Vec::new())
    }

    /// True iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    /// Errors in discovery order.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Warnings in discovery order.
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Errors located exactly at `path`, for attaching to a form field.
    pub fn errors_at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.path == path)
    }

    /// Error codes in discovery order.
    pub fn error_codes(&self) -> Vec<ErrorCode> {
        self.errors.iter().map(|e| e.code).collect()
    }
}

/// Roll-up over a batch of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Number of documents.
    pub total: usize,
    /// Documents with no errors.
    pub valid: usize,
    /// Documents with at least one error.
    pub invalid: usize,
    /// Errors across all documents.
    pub total_errors: usize,
    /// Warnings across all documents.
    pub total_warnings: usize,
}

impl fmt::Display for ValidationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} valid ({} invalid), {} error(s), {} warning(s)",
            self.valid, self.total, self.invalid, self.total_errors, self.total_warnings
        )
    }
}

/// Aggregate a batch of results. Pure; no side effects.
pub fn validation_summary(results: &[ValidationResult]) -> ValidationSummary {
    results.iter().fold(ValidationSummary::default(), |mut acc, r| {
        acc.total += 1;
        if r.is_valid() {
            acc.valid += 1;
        } else {
            acc.invalid += 1;
        }
        acc.total_errors += r.errors().len();
        acc.total_warnings += r.warnings().len();
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn failing(n: usize) -> ValidationResult {
        let errors = (0..n)
            .map(|i| Diagnostic::new(format!("f{i}"), ErrorCode::TypeMismatch, "bad"))
            .collect();
        ValidationResult::from_parts(errors, Vec::new())
    }

    #[test]
    fn is_valid_tracks_errors_only() {
        let warned = ValidationResult::from_parts(
            Vec::new(),
            vec![Diagnostic::new("description", ErrorCode::RecommendedPropertyMissing, "x")],
        );
        assert!(warned.is_valid());
        assert!(!failing(1).is_valid());
    }

    #[test]
    fn result_serializes_camel_case() {
        let r = ValidationResult::single_error(ErrorCode::SchemaNotFound, "Schema 'x' not found");
        assert_eq!(
            serde_json::to_value(&r).unwrap(),
            json!({
                "isValid": false,
                "errors": [{"path": "", "message": "Schema 'x' not found", "code": "SCHEMA_NOT_FOUND"}],
                "warnings": []
            })
        );
    }

    #[test]
    fn error_code_serde_matches_as_str() {
        let codes = [
            ErrorCode::RequiredPropertyMissing,
            ErrorCode::AdditionalPropertyNotAllowed,
            ErrorCode::RecommendedPropertyMissing,
            ErrorCode::ValidationError,
        ];
        for code in codes {
            assert_eq!(serde_json::to_value(code).unwrap(), json!(code.as_str()));
        }
    }

    #[test]
    fn errors_at_filters_by_exact_path() {
        let r = ValidationResult::from_parts(
            vec![
                Diagnostic::new("name", ErrorCode::StringTooShort, "short"),
                Diagnostic::new("name.first", ErrorCode::TypeMismatch, "nested"),
                Diagnostic::new("name", ErrorCode::PatternMismatch, "pattern"),
            ],
            Vec::new(),
        );
        let codes: Vec<ErrorCode> = r.errors_at("name").map(|e| e.code).collect();
        assert_eq!(codes, vec![ErrorCode::StringTooShort, ErrorCode::PatternMismatch]);
    }

    #[test]
    fn summary_counts_documents_and_diagnostics() {
        let ok = ValidationResult::from_parts(
            Vec::new(),
            vec![Diagnostic::new("d", ErrorCode::RecommendedPropertyMissing, "w")],
        );
        let summary = validation_summary(&[ok, failing(2), failing(3)]);
        assert_eq!(
            summary,
            ValidationSummary {
                total: 3,
                valid: 1,
                invalid: 2,
                total_errors: 5,
                total_warnings: 1,
            }
        );
        assert_eq!(summary.to_string(), "1/3 valid (2 invalid), 5 error(s), 1 warning(s)");
    }

    #[test]
    fn summary_of_nothing_is_zero() {
        assert_eq!(validation_summary(&[]), ValidationSummary::default());
    }

    #[test]
    fn diagnostic_display_marks_root() {
        let d = Diagnostic::new("", ErrorCode::TypeMismatch, "Expected object, got string");
        assert_eq!(d.to_string(), "(root): Expected object, got string [TYPE_MISMATCH]");
    }
}
