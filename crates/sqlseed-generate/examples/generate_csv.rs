//! Offline dry run: extract a table, fill it from a scripted backend and
//! print the CSV to stdout.
//!
//! cargo run -p sqlseed-generate --example generate_csv -- "CREATE TABLE ..." 5

use std::env;
use std::sync::Arc;

use sqlseed_generate::output::write_rows_csv_to;
use sqlseed_generate::{
    ExhaustedPolicy, GenerateOptions, GenerationSession, ScriptedBackend, TracingProgress,
};
use sqlseed_introspect::extract_schema;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut args = env::args().skip(1);
    let statement = args.next().unwrap_or_else(|| {
        "CREATE TABLE employees (id INTEGER PRIMARY KEY, first_name TEXT, age INTEGER, salary REAL)"
            .to_string()
    });
    let rows: u64 = match args.next() {
        Some(value) => value.parse()?,
        None => 5,
    };

    let schema = extract_schema(&statement).await?;

    // Text columns take the scripted answer; numeric ones fall back to mocks.
    let backend = Arc::new(ScriptedBackend::always("Alice"));
    let options = GenerateOptions {
        retry_delay_ms: 0,
        max_attempts: 1,
        on_exhausted: ExhaustedPolicy::SubstituteMock,
        ..GenerateOptions::default()
    };

    let mut session =
        GenerationSession::new(schema, backend, options)?.with_progress(Arc::new(TracingProgress));
    let report = session.run(rows).await;

    write_rows_csv_to(std::io::stdout().lock(), session.schema(), session.rows())?;
    eprintln!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
