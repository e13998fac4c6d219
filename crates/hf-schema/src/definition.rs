//! # Schema Model
//!
//! [`SchemaDefinition`] is the declarative shape a document must have. Its
//! serialized form is the camelCase JSON vocabulary consumed by the wizard,
//! the ruleset loader, and the homebrew importer:
//!
//! ```json
//! {
//!   "id": "character",
//!   "type": "object",
//!   "required": ["name"],
//!   "properties": { "name": { "type": "string", "minLength": 1 } },
//!   "additionalProperties": false
//! }
//! ```
//!
//! ## Ordering
//!
//! Property declaration order is observable: the validator reports errors in
//! the order properties are declared. [`SchemaMap`] keeps entries in
//! insertion order through serde, so a schema read from JSON validates in the
//! order its author wrote it.
//!
//! ## Forward Compatibility
//!
//! Type names outside the seven JSON types are preserved verbatim as
//! [`SchemaType::Unknown`] and validate permissively.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use hf_core::JsonType;

// ---------------------------------------------------------------------------
// SchemaType
// ---------------------------------------------------------------------------

/// The `type` keyword of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SchemaType {
    /// One of the seven JSON types.
    Known(JsonType),
    /// Any other name. Accepted for forward compatibility; never raises a
    /// type error.
    Unknown(String),
}

impl SchemaType {
    /// Whether `value` conforms to this type. Unknown types accept anything.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Self::Known(t) => t.matches(value),
            Self::Unknown(_) => true,
        }
    }

    /// The name as written in the schema.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(t) => t.as_str(),
            Self::Unknown(name) => name,
        }
    }

    /// The known JSON type, if any.
    pub fn json_type(&self) -> Option<JsonType> {
        match self {
            Self::Known(t) => Some(*t),
            Self::Unknown(_) => None,
        }
    }
}

impl From<JsonType> for SchemaType {
    fn from(t: JsonType) -> Self {
        Self::Known(t)
    }
}

impl From<String> for SchemaType {
    fn from(name: String) -> Self {
        match name.parse::<JsonType>() {
            Ok(t) => Self::Known(t),
            Err(_) => Self::Unknown(name),
        }
    }
}

impl From<SchemaType> for String {
    fn from(t: SchemaType) -> Self {
        match t {
            SchemaType::Known(t) => t.as_str().to_string(),
            SchemaType::Unknown(name) => name,
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SchemaMap
// ---------------------------------------------------------------------------

/// Insertion-ordered mapping from name to [`SchemaDefinition`].
///
/// Serialized as a JSON object. Inserting an existing name replaces the
/// schema in place and keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaMap {
    entries: Vec<(String, SchemaDefinition)>,
}

impl SchemaMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a schema by name.
    pub fn get(&self, name: &str) -> Option<&SchemaDefinition> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Mutable lookup by name.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut SchemaDefinition> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Whether `name` is present.
    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace, returning the previous schema for `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        schema: SchemaDefinition,
    ) -> Option<SchemaDefinition> {
        let name = name.into();
        match self.get_mut(&name) {
            Some(slot) => Some(std::mem::replace(slot, schema)),
            None => {
                self.entries.push((name, schema));
                None
            }
        }
    }

    /// Remove `name`, returning its schema.
    pub fn remove(&mut self, name: &str) -> Option<SchemaDefinition> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SchemaDefinition)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate names in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for SchemaMap {
    type Item = (String, SchemaDefinition);
    type IntoIter = std::vec::IntoIter<(String, SchemaDefinition)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, SchemaDefinition)> for SchemaMap {
    fn from_iter<I: IntoIterator<Item = (String, SchemaDefinition)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (name, schema) in iter {
            map.insert(name, schema);
        }
        map
    }
}

impl Serialize for SchemaMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, schema) in &self.entries {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SchemaMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SchemaMapVisitor;

        impl<'de> Visitor<'de> for SchemaMapVisitor {
            type Value = SchemaMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a mapping of names to schema definitions")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SchemaMap, A::Error> {
                let mut map = SchemaMap::new();
                while let Some((name, schema)) =
                    access.next_entry::<String, SchemaDefinition>()?
                {
                    map.insert(name, schema);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SchemaMapVisitor)
    }
}

// ---------------------------------------------------------------------------
// SchemaDefinition
// ---------------------------------------------------------------------------

/// Declarative description of a document's shape and constraints.
///
/// Constraint keywords only take effect for the type they belong to:
/// `minLength`/`maxLength`/`pattern`/`enum` for strings,
/// `minimum`/`maximum` for integers and numbers, `minItems`/`maxItems` for
/// arrays, and `properties`/`required`/`recommended`/`additionalProperties`
/// for objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDefinition {
    /// Identifier of the schema. Top-level schemas carry one; nested ones
    /// usually do not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Declared type. Absent means any value is accepted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    /// Free-form documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Declared properties of an object, in declaration order.
    #[serde(default, skip_serializing_if = "SchemaMap::is_empty")]
    pub properties: SchemaMap,

    /// Property names that must be present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    /// Property names whose absence produces a warning rather than an error.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended: Vec<String>,

    /// When `Some(false)`, undeclared properties are rejected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,

    /// Schema applied to every array element.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDefinition>>,

    /// Minimum string length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,

    /// Maximum string length in characters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,

    /// Regular expression the string must match somewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    /// Inclusive lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,

    /// Inclusive upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,

    /// Minimum array length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,

    /// Maximum array length.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

impl SchemaDefinition {
    /// A schema with only a type set.
    pub fn of_type(t: impl Into<SchemaType>) -> Self {
        Self {
            schema_type: Some(t.into()),
            ..Self::default()
        }
    }

    /// An `object` schema.
    pub fn object() -> Self {
        Self::of_type(JsonType::Object)
    }

    /// An `array` schema whose elements match `items`.
    pub fn array_of(items: SchemaDefinition) -> Self {
        Self::of_type(JsonType::Array).with_items(items)
    }

    /// A `string` schema.
    pub fn string() -> Self {
        Self::of_type(JsonType::String)
    }

    /// An `integer` schema.
    pub fn integer() -> Self {
        Self::of_type(JsonType::Integer)
    }

    /// A `number` schema.
    pub fn number() -> Self {
        Self::of_type(JsonType::Number)
    }

    /// A `boolean` schema.
    pub fn boolean() -> Self {
        Self::of_type(JsonType::Boolean)
    }

    /// A `null` schema.
    pub fn null() -> Self {
        Self::of_type(JsonType::Null)
    }

    /// Set `id`.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set `description`.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare (or redeclare) a property.
    pub fn with_property(mut self, name: impl Into<String>, schema: SchemaDefinition) -> Self {
        self.properties.insert(name, schema);
        self
    }

    /// Append required property names.
    pub fn with_required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required.extend(names.into_iter().map(Into::into));
        self
    }

    /// Append recommended property names.
    pub fn with_recommended<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recommended.extend(names.into_iter().map(Into::into));
        self
    }

    /// Reject undeclared properties (`additionalProperties: false`).
    pub fn closed(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    /// Set `items`.
    pub fn with_items(mut self, items: SchemaDefinition) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Set `minLength`.
    pub fn with_min_length(mut self, n: u64) -> Self {
        self.min_length = Some(n);
        self
    }

    /// Set `maxLength`.
    pub fn with_max_length(mut self, n: u64) -> Self {
        self.max_length = Some(n);
        self
    }

    /// Set `pattern`.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Restrict to a set of string values.
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(|v| Value::String(v.into())).collect());
        self
    }

    /// Set `minimum`.
    pub fn with_minimum(mut self, n: impl Into<Number>) -> Self {
        self.minimum = Some(n.into());
        self
    }

    /// Set `maximum`.
    pub fn with_maximum(mut self, n: impl Into<Number>) -> Self {
        self.maximum = Some(n.into());
        self
    }

    /// Set `minItems`.
    pub fn with_min_items(mut self, n: u64) -> Self {
        self.min_items = Some(n);
        self
    }

    /// Set `maxItems`.
    pub fn with_max_items(mut self, n: u64) -> Self {
        self.max_items = Some(n);
        self
    }

    /// Whether undeclared object properties are rejected.
    pub fn rejects_additional_properties(&self) -> bool {
        self.additional_properties == Some(false)
    }
}
