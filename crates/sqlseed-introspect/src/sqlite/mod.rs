use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

use sqlseed_core::{Error, Result, Row, TableSchema};

use crate::adapter::Adapter;

mod mapper;
mod queries;

/// Adapter for SQLite databases, in memory or on disk.
#[derive(Debug, Clone)]
pub struct SqliteAdapter {
    pool: SqlitePool,
}

impl SqliteAdapter {
    /// Create a new adapter using a pre-configured pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite in-memory connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|err| Error::Db(err.to_string()))?;
        Ok(Self { pool })
    }

    /// Connect to a SQLite database URL such as `sqlite://data.db?mode=rwc`.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await
            .map_err(|err| Error::Db(err.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl Adapter for SqliteAdapter {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn execute(&self, statement: &str) -> Result<()> {
        queries::execute_statement(&self.pool, statement).await
    }

    async fn introspect_table(&self, table: &str) -> Result<TableSchema> {
        let raw = queries::list_columns(&self.pool, table).await?;
        Ok(TableSchema {
            name: table.to_string(),
            columns: mapper::map_columns(raw),
        })
    }

    async fn drop_table(&self, table: &str) -> Result<()> {
        queries::drop_table(&self.pool, table).await
    }

    async fn clear_table(&self, table: &str) -> Result<()> {
        queries::clear_table(&self.pool, table).await
    }

    async fn count_schema_objects(&self) -> Result<u64> {
        queries::count_schema_objects(&self.pool).await
    }

    async fn insert_row(&self, table: &TableSchema, row: &Row) -> Result<()> {
        queries::insert_row(&self.pool, table, row).await
    }

    async fn count_rows(&self, table: &str) -> Result<u64> {
        queries::count_rows(&self.pool, table).await
    }
}

/// Quote an identifier for SQLite, doubling embedded quotes.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
