use anyhow::{Context, Result, anyhow};
use sqlseed_core::{Error, Row, Value};
use sqlseed_introspect::{
    Adapter, SqliteAdapter, extract_schema, extract_with, materialize, table_name_from_statement,
};

const EMPLOYEES: &str = "CREATE TABLE employees (
    id INTEGER PRIMARY KEY,
    first_name VARCHAR(50) NOT NULL,
    last_name VARCHAR(50) NOT NULL,
    email TEXT UNIQUE,
    salary REAL DEFAULT 0,
    hire_date DATE
)";

#[tokio::test]
async fn extracts_columns_in_declaration_order() -> Result<()> {
    let table = extract_schema(EMPLOYEES).await?;
    assert_eq!(table.name, "employees");

    let names: Vec<&str> = table.column_names().collect();
    assert_eq!(
        names,
        vec!["id", "first_name", "last_name", "email", "salary", "hire_date"]
    );

    let id = table.column("id").ok_or_else(|| anyhow!("expected id"))?;
    assert!(id.is_primary_key);
    assert_eq!(id.declared_type, "INTEGER");

    let first = table
        .column("first_name")
        .ok_or_else(|| anyhow!("expected first_name"))?;
    assert!(first.is_not_null);
    assert!(!first.is_primary_key);
    assert_eq!(first.declared_type, "VARCHAR(50)");

    let email = table.column("email").ok_or_else(|| anyhow!("expected email"))?;
    assert!(!email.is_not_null);

    let salary = table.column("salary").ok_or_else(|| anyhow!("expected salary"))?;
    assert_eq!(salary.default.as_deref(), Some("0"));

    Ok(())
}

#[tokio::test]
async fn composite_primary_keys_flag_every_member() -> Result<()> {
    let table = extract_schema(
        "create table if not exists enrollments (student_id int, course_id int, grade text, primary key (student_id, course_id))",
    )
    .await?;
    assert_eq!(table.name, "enrollments");
    let pk: Vec<&str> = table
        .columns
        .iter()
        .filter(|col| col.is_primary_key)
        .map(|col| col.name.as_str())
        .collect();
    assert_eq!(pk, vec!["student_id", "course_id"]);
    Ok(())
}

#[tokio::test]
async fn rejects_empty_statement() {
    let result = extract_schema("   \n ").await;
    assert!(matches!(result, Err(Error::EmptyStatement)));
}

#[tokio::test]
async fn rejects_invalid_sql() {
    let result = extract_schema("CREATE TABLE broken (id INTEGER,").await;
    assert!(matches!(result, Err(Error::InvalidStatement(_))));
}

#[tokio::test]
async fn rejects_statement_without_table_name() {
    let result = extract_schema("SELECT 1").await;
    assert!(matches!(result, Err(Error::MissingTableName)));
}

#[test]
fn table_name_pattern_handles_quoting() {
    assert_eq!(
        table_name_from_statement("CREATE TABLE t (id INTEGER)").as_deref(),
        Some("t")
    );
    assert_eq!(
        table_name_from_statement("create table IF NOT EXISTS users(id int)").as_deref(),
        Some("users")
    );
    assert_eq!(
        table_name_from_statement("CREATE TABLE \"Order Items\" (id INTEGER)").as_deref(),
        Some("Order Items")
    );
    assert_eq!(
        table_name_from_statement("CREATE TABLE `logs` (id INTEGER)").as_deref(),
        Some("logs")
    );
    assert_eq!(
        table_name_from_statement("CREATE TABLE [audit] (id INTEGER)").as_deref(),
        Some("audit")
    );
    assert_eq!(
        table_name_from_statement("CREATE TABLE main.accounts (id INTEGER)").as_deref(),
        Some("accounts")
    );
    assert_eq!(table_name_from_statement("CREATE VIEW v AS SELECT 1"), None);
    assert_eq!(table_name_from_statement("INSERT INTO t VALUES (1)"), None);
}

#[tokio::test]
async fn materialize_replaces_existing_table() -> Result<()> {
    let working = SqliteAdapter::in_memory().await?;
    working
        .execute("CREATE TABLE t (legacy TEXT)")
        .await
        .context("seeding legacy table")?;

    let statement = "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)";
    let table = extract_schema(statement).await?;
    materialize(&working, statement, &table).await?;

    let reread = working.introspect_table("t").await?;
    assert_eq!(reread, table);

    let mut row = Row::new();
    row.insert("id", Value::Int(1));
    row.insert("name", Value::Text("Bob".to_string()));
    working.insert_row(&table, &row).await?;
    assert_eq!(working.count_rows("t").await?, 1);

    Ok(())
}

#[tokio::test]
async fn insert_surfaces_constraint_violations() -> Result<()> {
    let working = SqliteAdapter::in_memory().await?;
    let statement = "CREATE TABLE t (id INTEGER PRIMARY KEY, code TEXT UNIQUE)";
    let table = extract_with(&working, statement).await?;

    let mut row = Row::new();
    row.insert("id", Value::Int(1));
    row.insert("code", Value::Text("A".to_string()));
    working.insert_row(&table, &row).await?;

    let mut duplicate = Row::new();
    duplicate.insert("id", Value::Int(2));
    duplicate.insert("code", Value::Text("A".to_string()));
    let result = working.insert_row(&table, &duplicate).await;
    assert!(matches!(result, Err(Error::Db(_))));

    Ok(())
}

#[tokio::test]
async fn rejects_script_that_inserts_rows() {
    let result =
        extract_schema("CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT); INSERT INTO t VALUES (1, 'x')")
            .await;
    assert!(matches!(result, Err(Error::InvalidStatement(_))));
}

#[tokio::test]
async fn rejects_script_that_creates_extra_objects() {
    let result = extract_schema(
        "CREATE TABLE t (id INTEGER PRIMARY KEY); CREATE TABLE side (id INTEGER)",
    )
    .await;
    assert!(matches!(result, Err(Error::InvalidStatement(_))));

    let result =
        extract_schema("CREATE TABLE t (id INTEGER, code TEXT); CREATE INDEX t_code ON t (code)")
            .await;
    assert!(matches!(result, Err(Error::InvalidStatement(_))));
}

#[tokio::test]
async fn implicit_unique_indexes_do_not_count_as_extra_objects() -> Result<()> {
    let table = extract_schema(
        "CREATE TABLE tags (code TEXT PRIMARY KEY, label TEXT UNIQUE, note TEXT);",
    )
    .await?;
    assert_eq!(table.columns.len(), 3);
    Ok(())
}

#[tokio::test]
async fn clear_table_keeps_structure() -> Result<()> {
    let working = SqliteAdapter::in_memory().await?;
    let table = extract_with(&working, "CREATE TABLE t (id INTEGER PRIMARY KEY, name TEXT)").await?;

    let mut row = Row::new();
    row.insert("id", Value::Int(1));
    row.insert("name", Value::Text("Bob".to_string()));
    working.insert_row(&table, &row).await?;
    assert_eq!(working.count_rows("t").await?, 1);

    working.clear_table("t").await?;
    assert_eq!(working.count_rows("t").await?, 0);
    assert_eq!(working.introspect_table("t").await?, table);
    assert_eq!(working.count_schema_objects().await?, 1);
    Ok(())
}
