//! Property tests: the validator is deterministic and total over arbitrary
//! documents and arbitrary (possibly nonsensical) schemas.

use hf_schema::{ErrorCode, SchemaDefinition, SchemaRegistry, Validator};
use proptest::prelude::*;
use serde_json::Value;

fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9_ ]{0,20}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..6)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn type_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("object".to_string()),
        Just("array".to_string()),
        Just("string".to_string()),
        Just("integer".to_string()),
        Just("number".to_string()),
        Just("boolean".to_string()),
        Just("null".to_string()),
        "[a-z]{1,8}",
    ]
}

/// Schemas with arbitrary constraint combinations, including patterns that
/// may not compile and ranges that may be inverted.
fn schema() -> impl Strategy<Value = SchemaDefinition> {
    let leaf = (
        prop::option::of(type_name()),
        prop::option::of(0u64..10),
        prop::option::of(0u64..10),
        prop::option::of(prop_oneof![Just("^[a-z]+$".to_string()), Just("([".to_string()), "[a-z]{1,3}"]),
        prop::option::of(-100i64..100),
        prop::option::of(-100i64..100),
    )
        .prop_map(|(t, min_len, max_items, pattern, min, max)| {
            let mut s = SchemaDefinition::default();
            s.schema_type = t.map(Into::into);
            s.min_length = min_len;
            s.max_items = max_items;
            s.pattern = pattern;
            s.minimum = min.map(Into::into);
            s.maximum = max.map(Into::into);
            s
        });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            prop::collection::vec(("[a-z]{1,6}", inner.clone()), 0..4),
            prop::collection::vec("[a-z]{1,6}", 0..3),
            prop::option::of(any::<bool>()),
            prop::option::of(inner),
        )
            .prop_map(|(props, required, additional, items)| {
                let mut s = SchemaDefinition::object();
                for (name, child) in props {
                    s.properties.insert(name, child);
                }
                s.required = required;
                s.additional_properties = additional;
                s.items = items.map(Box::new);
                s
            })
    })
}

proptest! {
    /// Validation of any document against any schema yields the same result twice.
    #[test]
    fn validation_is_deterministic(doc in json_value(), s in schema()) {
        let registry = SchemaRegistry::new();
        registry.register_schema("s", s);
        let validator = Validator::new(registry);
        prop_assert_eq!(validator.validate(&doc, "s"), validator.validate(&doc, "s"));
    }

    /// Validation never panics and `is_valid` always agrees with the error list.
    #[test]
    fn validation_is_total(doc in json_value(), s in schema()) {
        let registry = SchemaRegistry::new();
        registry.register_schema("s", s);
        let result = Validator::new(registry).validate(&doc, "s");
        prop_assert_eq!(result.is_valid(), result.errors().is_empty());
    }

    /// An engine failure is reported as exactly one root error.
    #[test]
    fn engine_failure_is_single(doc in json_value(), s in schema()) {
        let registry = SchemaRegistry::new();
        registry.register_schema("s", s);
        let result = Validator::new(registry).validate(&doc, "s");
        if result.error_codes().contains(&ErrorCode::ValidationError) {
            prop_assert_eq!(result.errors().len(), 1);
            prop_assert_eq!(result.errors()[0].path.as_str(), "");
        }
    }

    /// Built-in schemas handle arbitrary documents.
    #[test]
    fn builtins_are_total(doc in json_value()) {
        let validator = Validator::new(SchemaRegistry::with_builtins());
        for name in ["character", "ruleset", "homebrew"] {
            let result = validator.validate(&doc, name);
            prop_assert!(!result.error_codes().contains(&ErrorCode::ValidationError));
        }
    }
}
