//! # File Loading
//!
//! Reads documents and schemas from disk. JSON and YAML are both accepted;
//! YAML is converted to the equivalent `serde_json::Value` tree before
//! anything else sees it, so the validator only ever handles JSON values.
//!
//! Schema files are named `<name>.schema.json`, `<name>.schema.yaml` or
//! `<name>.schema.yml`. The registry name is the schema's `id` when present,
//! otherwise `<name>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Number, Value};
use serde_yaml::Value as YamlValue;
use thiserror::Error;

use hf_core::{index_segment, prefix_path};

use crate::definition::SchemaDefinition;

/// Errors from reading documents or schemas.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or YAML.
    #[error("failed to parse {}: {reason}", path.display())]
    Parse {
        /// Path that failed.
        path: PathBuf,
        /// Parser message.
        reason: String,
    },

    /// YAML content with no JSON equivalent.
    #[error("cannot represent {} as JSON at {at}: {reason}", path.display())]
    Conversion {
        /// Path that failed.
        path: PathBuf,
        /// Dotted location of the offending node, `(root)` for the top level.
        at: String,
        /// What could not be converted.
        reason: String,
    },

    /// Parsed content is not a valid schema definition.
    #[error("invalid schema in {}: {reason}", path.display())]
    Schema {
        /// Path that failed.
        path: PathBuf,
        /// Deserialization message.
        reason: String,
    },
}

const SCHEMA_SUFFIXES: [&str; 3] = [".schema.json", ".schema.yaml", ".schema.yml"];

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    )
}

/// Read a JSON or YAML document. The format is chosen by extension; anything
/// other than `.yaml`/`.yml` is parsed as JSON.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value, LoadError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if is_yaml(path) {
        let yaml: serde_yaml::Value =
            serde_yaml::from_str(&content).map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        json_from_yaml(&yaml).map_err(|e| LoadError::Conversion {
            path: path.to_path_buf(),
            at: if e.at.is_empty() { "(root)".to_string() } else { e.at },
            reason: e.reason,
        })
    } else {
        serde_json::from_str(&content).map_err(|e| LoadError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// Whether `path` carries one of the schema file suffixes.
pub fn is_schema_file(path: &Path) -> bool {
    schema_stem(path).is_some()
}

fn schema_stem(path: &Path) -> Option<&str> {
    let file_name = path.file_name()?.to_str()?;
    SCHEMA_SUFFIXES
        .iter()
        .find_map(|suffix| file_name.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}

/// Read one schema file, returning its registry name and definition.
pub fn load_schema_file(path: impl AsRef<Path>) -> Result<(String, SchemaDefinition), LoadError> {
    let path = path.as_ref();
    let value = load_document(path)?;
    let schema: SchemaDefinition =
        serde_json::from_value(value).map_err(|e| LoadError::Schema {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let name = match (&schema.id, schema_stem(path)) {
        (Some(id), _) => id.clone(),
        (None, Some(stem)) => stem.to_string(),
        (None, None) => path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string(),
    };
    tracing::debug!(schema = %name, path = %path.display(), "loaded schema file");
    Ok((name, schema))
}

/// Every schema file under `dir`, recursively, sorted by path.
pub fn schema_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, LoadError> {
    let mut files = Vec::new();
    collect_schema_files(dir.as_ref(), &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_schema_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), LoadError> {
    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_dir() {
            collect_schema_files(&path, files)?;
        } else if is_schema_file(&path) {
            files.push(path);
        }
    }
    Ok(())
}

/// Load every schema file under `dir`, in sorted path order.
pub fn load_schema_dir(dir: impl AsRef<Path>) -> Result<Vec<(String, SchemaDefinition)>, LoadError> {
    let dir = dir.as_ref();
    let schemas = schema_files(dir)?
        .iter()
        .map(load_schema_file)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::info!(dir = %dir.display(), count = schemas.len(), "loaded schema directory");
    Ok(schemas)
}

/// A YAML node with no JSON form, located relative to the node being
/// converted.
#[derive(Debug)]
struct Unrepresentable {
    at: String,
    reason: String,
}

impl Unrepresentable {
    fn here(reason: String) -> Self {
        Self {
            at: String::new(),
            reason,
        }
    }

    fn under(mut self, segment: &str) -> Self {
        self.at = prefix_path(segment, &self.at);
        self
    }
}

/// Tags are dropped and scalar keys stringified, so `1: x` becomes `{"1": "x"}`.
fn json_from_yaml(yaml: &YamlValue) -> Result<Value, Unrepresentable> {
    Ok(match yaml {
        YamlValue::Null => Value::Null,
        YamlValue::Bool(b) => Value::Bool(*b),
        YamlValue::Number(n) => json_number(n)?,
        YamlValue::String(s) => Value::String(s.clone()),
        YamlValue::Sequence(items) => Value::Array(
            items
                .iter()
                .enumerate()
                .map(|(i, item)| json_from_yaml(item).map_err(|e| e.under(&index_segment(i))))
                .collect::<Result<_, _>>()?,
        ),
        YamlValue::Mapping(mapping) => {
            let mut object = Map::with_capacity(mapping.len());
            for (key, item) in mapping {
                let key = mapping_key(key)?;
                let converted = json_from_yaml(item).map_err(|e| e.under(&key))?;
                object.insert(key, converted);
            }
            Value::Object(object)
        }
        YamlValue::Tagged(tagged) => json_from_yaml(&tagged.value)?,
    })
}

fn json_number(n: &serde_yaml::Number) -> Result<Value, Unrepresentable> {
    if let Some(i) = n.as_i64() {
        return Ok(Value::from(i));
    }
    if let Some(u) = n.as_u64() {
        return Ok(Value::from(u));
    }
    n.as_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| Unrepresentable::here(format!("non-finite number {n}")))
}

fn mapping_key(key: &YamlValue) -> Result<String, Unrepresentable> {
    match key {
        YamlValue::String(s) => Ok(s.clone()),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => mapping_key(&tagged.value),
        YamlValue::Sequence(_) | YamlValue::Mapping(_) => Err(Unrepresentable::here(
            "mapping keys must be scalars".to_string(),
        )),
    }
}
