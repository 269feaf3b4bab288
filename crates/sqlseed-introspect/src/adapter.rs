use async_trait::async_trait;

use sqlseed_core::{Result, Row, TableSchema};

/// Trait implemented by relational engines that can validate, introspect and
/// populate a single working table.
///
/// Implementations are used sequentially by one generation session and are
/// not expected to serve concurrent sessions.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Returns the engine identifier (e.g. `sqlite`).
    fn engine(&self) -> &'static str;

    /// Execute one statement. Rejections surface as `Error::InvalidStatement`.
    async fn execute(&self, statement: &str) -> Result<()>;

    /// Read back the columns of `table` in declaration order.
    async fn introspect_table(&self, table: &str) -> Result<TableSchema>;

    /// Drop `table` if it exists.
    async fn drop_table(&self, table: &str) -> Result<()>;

    /// Delete every row of `table`, keeping its structure.
    async fn clear_table(&self, table: &str) -> Result<()>;

    /// Number of user-defined schema objects (tables, indexes, views,
    /// triggers), excluding engine-internal ones.
    async fn count_schema_objects(&self) -> Result<u64>;

    /// Insert one fully assembled row.
    async fn insert_row(&self, table: &TableSchema, row: &Row) -> Result<()>;

    /// Number of rows currently stored in `table`.
    async fn count_rows(&self, table: &str) -> Result<u64>;
}
