//! # Error Types
//!
//! Errors raised by the core primitives. Higher crates define their own
//! `thiserror` enums and wrap these where needed.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HfError {
    /// A type name that is not one of the seven JSON type names.
    #[error("unknown JSON type name: '{0}'")]
    UnknownJsonType(String),
}
