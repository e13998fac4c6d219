//! # Built-in Schemas
//!
//! The three schemas every registry created with
//! [`SchemaRegistry::with_builtins`](crate::SchemaRegistry::with_builtins)
//! starts with. They are ordinary [`SchemaDefinition`]s; the engine has no
//! special cases for them.

use crate::definition::{SchemaDefinition, SchemaMap};

/// Registry name of the character sheet schema.
pub const CHARACTER: &str = "character";
/// Registry name of the ruleset descriptor schema.
pub const RULESET: &str = "ruleset";
/// Registry name of the homebrew content schema.
pub const HOMEBREW: &str = "homebrew";

/// `2025-01-01T00:00:00Z`, optional fractional seconds and numeric offset.
pub const ISO_8601_PATTERN: &str =
    r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$";

/// `MAJOR.MINOR.PATCH` with optional pre-release and build metadata.
pub const SEMVER_PATTERN: &str = r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?(\+[0-9A-Za-z.-]+)?$";

const ABILITIES: [&str; 6] = [
    "strength",
    "dexterity",
    "constitution",
    "intelligence",
    "wisdom",
    "charisma",
];

const RULESET_TYPES: [&str; 7] = [
    "dnd_5e",
    "dnd_2024",
    "dnd_3_5",
    "pathfinder_1e",
    "pathfinder_2e",
    "homebrew",
    "custom",
];

const RULESET_STATUSES: [&str; 4] = ["draft", "active", "deprecated", "archived"];

const HOMEBREW_TYPES: [&str; 6] = ["race", "class", "spell", "item", "background", "feat"];

/// All built-ins, in seeding order.
pub fn builtin_schemas() -> SchemaMap {
    [
        (CHARACTER.to_string(), character_schema()),
        (RULESET.to_string(), ruleset_schema()),
        (HOMEBREW.to_string(), homebrew_schema()),
    ]
    .into_iter()
    .collect()
}

fn identifier() -> SchemaDefinition {
    SchemaDefinition::string().with_min_length(1)
}

fn named_entry() -> SchemaDefinition {
    SchemaDefinition::object()
        .with_property("name", SchemaDefinition::string().with_min_length(1))
        .with_required(["name"])
}

fn timestamp() -> SchemaDefinition {
    SchemaDefinition::string().with_pattern(ISO_8601_PATTERN)
}

/// A player character sheet.
pub fn character_schema() -> SchemaDefinition {
    let ability_scores = ABILITIES
        .iter()
        .fold(SchemaDefinition::object(), |schema, ability| {
            schema.with_property(
                *ability,
                SchemaDefinition::integer().with_minimum(1).with_maximum(30),
            )
        })
        .with_required(ABILITIES)
        .closed();

    let hit_points = SchemaDefinition::object()
        .with_property("current", SchemaDefinition::integer())
        .with_property("maximum", SchemaDefinition::integer().with_minimum(1))
        .with_property("temporary", SchemaDefinition::integer().with_minimum(0))
        .with_required(["current", "maximum"]);

    SchemaDefinition::object()
        .with_id(CHARACTER)
        .with_description("A player character")
        .with_property("id", identifier())
        .with_property(
            "name",
            SchemaDefinition::string().with_min_length(1).with_max_length(100),
        )
        .with_property(
            "level",
            SchemaDefinition::integer().with_minimum(1).with_maximum(20),
        )
        .with_property("experience", SchemaDefinition::integer().with_minimum(0))
        .with_property("class", SchemaDefinition::string().with_min_length(1))
        .with_property("race", SchemaDefinition::string().with_min_length(1))
        .with_property("background", SchemaDefinition::string())
        .with_property("alignment", SchemaDefinition::string())
        .with_property("abilityScores", ability_scores)
        .with_property("hitPoints", hit_points)
        .with_property("skills", SchemaDefinition::array_of(named_entry()))
        .with_property("equipment", SchemaDefinition::array_of(named_entry()))
        .with_property("spells", SchemaDefinition::array_of(named_entry()))
        .with_property("created", timestamp())
        .with_property("modified", timestamp())
        .with_required([
            "id",
            "name",
            "level",
            "class",
            "race",
            "abilityScores",
            "hitPoints",
        ])
}

/// A game system ruleset descriptor.
pub fn ruleset_schema() -> SchemaDefinition {
    let limits = SchemaDefinition::object()
        .with_property("maxLevel", SchemaDefinition::integer().with_minimum(1))
        .with_property("minAbilityScore", SchemaDefinition::integer().with_minimum(1))
        .with_property("maxAbilityScore", SchemaDefinition::integer().with_minimum(1))
        .with_property("maxHomebrewItems", SchemaDefinition::integer().with_minimum(0));

    SchemaDefinition::object()
        .with_id(RULESET)
        .with_description("A game system ruleset")
        .with_property("id", identifier())
        .with_property("name", SchemaDefinition::string().with_min_length(1))
        .with_property("version", SchemaDefinition::string().with_pattern(SEMVER_PATTERN))
        .with_property("type", SchemaDefinition::string().with_enum(RULESET_TYPES))
        .with_property("status", SchemaDefinition::string().with_enum(RULESET_STATUSES))
        .with_property("description", SchemaDefinition::string())
        .with_property("features", SchemaDefinition::array_of(SchemaDefinition::string()))
        .with_property("rules", SchemaDefinition::object())
        .with_property("validation", limits)
        .with_required(["id", "name", "version"])
}

/// A piece of user-authored content bound to a ruleset.
pub fn homebrew_schema() -> SchemaDefinition {
    let balance = SchemaDefinition::object()
        .with_property(
            "score",
            SchemaDefinition::number().with_minimum(0).with_maximum(1),
        )
        .with_property("powerBudget", SchemaDefinition::object())
        .with_property("reviewed", SchemaDefinition::boolean());

    let content = SchemaDefinition::object()
        .with_property("name", SchemaDefinition::string().with_min_length(1))
        .with_property("description", SchemaDefinition::string())
        .with_required(["name"])
        .with_recommended(["description"]);

    SchemaDefinition::object()
        .with_id(HOMEBREW)
        .with_description("Homebrew content")
        .with_property("id", identifier())
        .with_property("name", SchemaDefinition::string().with_min_length(1))
        .with_property("type", SchemaDefinition::string().with_enum(HOMEBREW_TYPES))
        .with_property("version", SchemaDefinition::string().with_pattern(SEMVER_PATTERN))
        .with_property("rulesetId", identifier())
        .with_property("description", SchemaDefinition::string())
        .with_property("balance", balance)
        .with_property("content", content)
        .with_required(["id", "name", "type", "version", "rulesetId", "content"])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lint::lint_schema;
    use regex::Regex;

    #[test]
    fn builtins_lint_clean() {
        for (name, schema) in builtin_schemas() {
            let issues = lint_schema(&schema);
            assert!(issues.is_empty(), "{name}: {issues:?}");
        }
    }

    #[test]
    fn builtin_ids_match_registry_names() {
        for (name, schema) in builtin_schemas() {
            assert_eq!(schema.id.as_deref(), Some(name.as_str()));
        }
    }

    #[test]
    fn timestamp_pattern_accepts_common_forms() {
        let re = Regex::new(ISO_8601_PATTERN).unwrap();
        assert!(re.is_match("2025-01-01T00:00:00Z"));
        assert!(re.is_match("2025-01-01T00:00:00.123+02:00"));
        assert!(!re.is_match("2025-01-01"));
        assert!(!re.is_match("yesterday"));
    }

    #[test]
    fn semver_pattern_accepts_prerelease() {
        let re = Regex::new(SEMVER_PATTERN).unwrap();
        assert!(re.is_match("1.0.0"));
        assert!(re.is_match("2.1.0-beta.1+build.5"));
        assert!(!re.is_match("1.0"));
    }

    #[test]
    fn ability_scores_are_closed_and_complete() {
        let schema = character_schema();
        let scores = schema.properties.get("abilityScores").unwrap();
        assert!(scores.rejects_additional_properties());
        assert_eq!(scores.required, ABILITIES.to_vec());
    }

    #[test]
    fn homebrew_content_needs_a_name() {
        let schema = homebrew_schema();
        let content = schema.properties.get("content").unwrap();
        assert_eq!(content.required, vec!["name"]);
        assert_eq!(content.recommended, vec!["description"]);
        assert!(schema.recommended.is_empty());
    }
}
