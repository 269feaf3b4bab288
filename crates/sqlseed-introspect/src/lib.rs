//! Schema extraction over an embedded relational engine.
//!
//! A `CREATE TABLE` statement is executed against a scratch SQLite database,
//! and the resulting table is read back through `pragma_table_info`.

pub mod adapter;
pub mod extract;
pub mod sqlite;

pub use adapter::Adapter;
pub use extract::{extract_schema, extract_with, materialize, table_name_from_statement};
pub use sqlite::SqliteAdapter;

pub use sqlseed_core::TableSchema;
