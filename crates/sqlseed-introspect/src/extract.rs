use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use sqlseed_core::{Error, Result, TableSchema, validate_table};

use crate::adapter::Adapter;
use crate::sqlite::SqliteAdapter;

/// Extract the table defined by `statement` using a fresh in-memory engine.
pub async fn extract_schema(statement: &str) -> Result<TableSchema> {
    let scratch = SqliteAdapter::in_memory().await?;
    extract_with(&scratch, statement).await
}

/// Extract the table defined by `statement` using a caller-provided engine.
///
/// Scripts that create more than one schema object or insert rows are
/// rejected with `Error::InvalidStatement`, so a successful extraction is
/// safe to replay through [`materialize`].
///
/// The engine should not already hold a table of the same name; use a scratch
/// instance and call [`materialize`] on the working engine afterwards.
pub async fn extract_with(adapter: &dyn Adapter, statement: &str) -> Result<TableSchema> {
    let statement = statement.trim();
    if statement.is_empty() {
        return Err(Error::EmptyStatement);
    }

    let objects_before = adapter.count_schema_objects().await?;
    adapter.execute(statement).await?;

    let table_name = table_name_from_statement(statement).ok_or(Error::MissingTableName)?;
    let created = adapter
        .count_schema_objects()
        .await?
        .saturating_sub(objects_before);
    if created > 1 {
        return Err(Error::InvalidStatement(format!(
            "expected a single CREATE TABLE statement, but {created} schema objects were created"
        )));
    }
    let table = adapter.introspect_table(&table_name).await?;
    if table.columns.is_empty() {
        return Err(Error::InvalidSchema(format!(
            "statement did not create table '{table_name}'"
        )));
    }
    validate_table(&table)?;
    if adapter.count_rows(&table_name).await? > 0 {
        return Err(Error::InvalidStatement(format!(
            "statement must only create table '{table_name}', but rows were inserted"
        )));
    }

    debug!(
        engine = adapter.engine(),
        table = %table.name,
        columns = table.columns.len(),
        "schema extracted"
    );

    Ok(table)
}

/// Replace `table` in the working engine with the structure from `statement`.
pub async fn materialize(adapter: &dyn Adapter, statement: &str, table: &TableSchema) -> Result<()> {
    adapter.drop_table(&table.name).await?;
    adapter.execute(statement.trim()).await?;
    info!(engine = adapter.engine(), table = %table.name, "working table materialized");
    Ok(())
}

/// Read the table name from the leading `CREATE TABLE [IF NOT EXISTS] <name>`
/// clause. Identifier quotes are stripped and a schema qualifier is dropped.
pub fn table_name_from_statement(statement: &str) -> Option<String> {
    let captures = table_name_pattern()?.captures(statement)?;
    let raw = captures.get(1)?.as_str();

    let name = if let Some(inner) = raw.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        inner.replace("\"\"", "\"")
    } else if let Some(inner) = raw.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        inner.to_string()
    } else if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        inner.to_string()
    } else {
        raw.rsplit('.').next().unwrap_or(raw).to_string()
    };

    if name.is_empty() { None } else { Some(name) }
}

fn table_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| {
            Regex::new(
                r#"(?i)^\s*create\s+table\s+(?:if\s+not\s+exists\s+)?("(?:[^"]|"")+"|`[^`]+`|\[[^\]]+\]|[^\s(]+)"#,
            )
            .ok()
        })
        .as_ref()
}
