//! Core contracts and helpers for sqlseed.
//!
//! This crate defines the table schema extracted from a `CREATE TABLE`
//! statement, the scalar values and rows produced by generation, and the
//! declared-type classification shared by the extractor, synthesizer and CLI.

pub mod error;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use schema::{ColumnDescriptor, TableSchema};
pub use types::{ValueKind, declares_date};
pub use validation::validate_table;
pub use value::{Row, Value};

/// Current contract version for `schema.json` artifacts.
pub const SCHEMA_VERSION: &str = "0.1";
