//! # CLI Configuration
//!
//! [`FoundryConfig`] is read from an optional YAML file and then overridden
//! by environment variables:
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `HF_SCHEMA_DIRS` | `schema_dirs` | `:`-separated paths |
//! | `HF_LOG_FORMAT` | `log_format` | `text` or `json` |
//! | `HF_STRICT_SCHEMAS` | `strict_schemas` | boolean |
//! | `HF_FAIL_ON_WARNINGS` | `fail_on_warnings` | boolean |
//!
//! Booleans accept `true/false`, `1/0`, `yes/no` and `on/off`.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::InvalidLogFormat(s.to_string())),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Settings shared by every `hf` subcommand.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FoundryConfig {
    /// Directories scanned for `*.schema.{json,yaml,yml}` at startup.
    pub schema_dirs: Vec<PathBuf>,
    /// Log output format.
    pub log_format: LogFormat,
    /// Lint schemas before registering them and reject ill-formed ones.
    pub strict_schemas: bool,
    /// Treat warnings as failures when computing the exit code.
    pub fail_on_warnings: bool,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
    #[error("unknown log format '{0}' (expected 'text' or 'json')")]
    InvalidLogFormat(String),
    #[error("invalid boolean for {var}: '{value}'")]
    InvalidBool { var: String, value: String },
}

impl FoundryConfig {
    /// Read `path` if given, then apply the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env(|var| std::env::var(var).ok())
    }

    /// Read a YAML config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Override fields from variables found by `lookup`.
    pub fn apply_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dirs) = lookup("HF_SCHEMA_DIRS") {
            self.schema_dirs = dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                .collect();
        }
        if let Some(format) = lookup("HF_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }
        if let Some(value) = lookup("HF_STRICT_SCHEMAS") {
            self.strict_schemas = parse_bool("HF_STRICT_SCHEMAS", &value)?;
        }
        if let Some(value) = lookup("HF_FAIL_ON_WARNINGS") {
            self.fail_on_warnings = parse_bool("HF_FAIL_ON_WARNINGS", &value)?;
        }
        Ok(self)
    }

    /// Append directories given on the command line.
    pub fn with_schema_dirs(mut self, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        self.schema_dirs.extend(dirs);
        self
    }
}

fn parse_bool(var: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            var: var.to_string(),
            value: value.to_string(),
        }),
    }
}
