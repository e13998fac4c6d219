//! # hf-core — Foundational Types for The Hero Foundry
//!
//! The leaf of the crate graph. Everything that inspects untyped document
//! data builds on the primitives defined here.
//!
//! ## Contents
//!
//! - [`JsonType`] and [`json_type_of`]: the type-checking primitive used by
//!   the schema engine to decide whether a runtime value conforms to a
//!   declared type.
//! - [`path`]: dotted/indexed diagnostic path construction (`skills.0.name`).
//! - [`HfError`]: the shared error type for core parsing failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `hf-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod json_type;
pub mod path;

pub use error::HfError;
pub use json_type::{is_whole_number, json_type_of, JsonType};
pub use path::{index_segment, prefix_path};
