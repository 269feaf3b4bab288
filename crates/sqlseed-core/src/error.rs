use thiserror::Error;

/// Core error type shared across sqlseed crates.
///
/// Every variant except `Db` is a schema error: it is surfaced to the caller
/// immediately and never retried.
#[derive(Debug, Error)]
pub enum Error {
    /// The statement text was empty or whitespace only.
    #[error("statement is empty")]
    EmptyStatement,
    /// The relational engine rejected the statement.
    #[error("invalid statement: {0}")]
    InvalidStatement(String),
    /// No table name could be read from the leading `CREATE TABLE` clause.
    #[error("could not find a table name in the CREATE TABLE clause")]
    MissingTableName,
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Database error or adapter failure outside of statement validation.
    #[error("database error: {0}")]
    Db(String),
}

/// Convenience alias for results returned by sqlseed crates.
pub type Result<T> = std::result::Result<T, Error>;
