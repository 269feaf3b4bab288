use sqlx::{Row as _, SqlitePool};

use sqlseed_core::{Error, Result, Row, TableSchema, Value};

use super::quote_ident;

pub struct RawColumn {
    pub cid: i64,
    pub name: String,
    pub declared_type: String,
    pub not_null: i64,
    pub default: Option<String>,
    /// 1-based position inside the primary key, 0 when not part of it.
    pub pk: i64,
}

pub async fn execute_statement(pool: &SqlitePool, statement: &str) -> Result<()> {
    sqlx::raw_sql(statement)
        .execute(pool)
        .await
        .map_err(|err| Error::InvalidStatement(err.to_string()))?;
    Ok(())
}

pub async fn list_columns(pool: &SqlitePool, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select cid, name, type, "notnull", dflt_value, pk
        from pragma_table_info(?1)
        order by cid
        "#,
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))?;

    rows.into_iter()
        .map(|row| {
            Ok(RawColumn {
                cid: row.try_get("cid").map_err(db_error)?,
                name: row.try_get("name").map_err(db_error)?,
                declared_type: row.try_get("type").map_err(db_error)?,
                not_null: row.try_get("notnull").map_err(db_error)?,
                default: row.try_get("dflt_value").map_err(db_error)?,
                pk: row.try_get("pk").map_err(db_error)?,
            })
        })
        .collect()
}

pub async fn drop_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!("drop table if exists {}", quote_ident(table));
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(())
}

pub async fn clear_table(pool: &SqlitePool, table: &str) -> Result<()> {
    let sql = format!("delete from {}", quote_ident(table));
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(())
}

/// Automatic indexes (`sqlite_autoindex_*`) and internal tables are skipped.
pub async fn count_schema_objects(pool: &SqlitePool) -> Result<u64> {
    let count: i64 = sqlx::query_scalar(
        r#"
        select count(*)
        from sqlite_master
        where name not like 'sqlite\_%' escape '\'
        "#,
    )
    .fetch_one(pool)
    .await
    .map_err(|err| Error::Db(err.to_string()))?;
    Ok(count.max(0) as u64)
}

pub async fn insert_row(pool: &SqlitePool, table: &TableSchema, row: &Row) -> Result<()> {
    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|column| quote_ident(&column.name))
        .collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();
    let sql = format!(
        "insert into {} ({}) values ({})",
        quote_ident(&table.name),
        columns.join(", "),
        placeholders.join(", ")
    );

    let mut query = sqlx::query(&sql);
    for column in &table.columns {
        let value = row.get(&column.name).ok_or_else(|| {
            Error::InvalidSchema(format!(
                "row is missing column: {}.{}",
                table.name, column.name
            ))
        })?;
        query = match value {
            Value::Int(value) => query.bind(*value),
            Value::Decimal(value) => query.bind(*value),
            Value::Text(value) => query.bind(value.clone()),
        };
    }

    query
        .execute(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(())
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<u64> {
    let sql = format!("select count(*) from {}", quote_ident(table));
    let count: i64 = sqlx::query_scalar(&sql)
        .fetch_one(pool)
        .await
        .map_err(|err| Error::Db(err.to_string()))?;
    Ok(count.max(0) as u64)
}

fn db_error(err: sqlx::Error) -> Error {
    Error::Db(err.to_string())
}
