mod registry;
mod workspace;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use registry::{
    RunContext, init_run_logging, init_stderr_logging, start_run, write_dataset, write_report,
    write_schema,
};
use sqlseed_core::{Error as CoreError, SCHEMA_VERSION, TableSchema};
use sqlseed_generate::{
    BackendError, ExhaustedPolicy, GenerateOptions, GenerationError, GenerationSession,
    InferenceBackend, LlamaServerBackend, SessionState, TracingProgress,
};
use sqlseed_introspect::{SqliteAdapter, extract_schema, materialize};
use thiserror::Error;
use uuid::Uuid;
use workspace::{WorkspacePaths, load_or_create_settings};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("workspace error: {0}")]
    Workspace(#[from] workspace::WorkspaceError),
    #[error("schema error: {0}")]
    Schema(#[from] CoreError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("session {state}: generated {generated} of {requested} rows{}", failure_suffix(.failure))]
    Incomplete {
        state: &'static str,
        generated: u64,
        requested: u64,
        failure: Option<String>,
    },
}

fn failure_suffix(failure: &Option<String>) -> String {
    failure
        .as_deref()
        .map(|message| format!(" ({message})"))
        .unwrap_or_default()
}

#[derive(Parser, Debug)]
#[command(name = "sqlseed", version, about = "Model-driven sample data for SQL tables")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract the table structure and print it as JSON.
    Inspect(InspectArgs),
    /// Generate rows for the table and export them as CSV.
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct StatementArgs {
    /// File holding a single CREATE TABLE statement.
    #[arg(
        value_name = "DDL_FILE",
        required_unless_present = "statement",
        conflicts_with = "statement"
    )]
    ddl_file: Option<PathBuf>,
    /// CREATE TABLE statement given inline.
    #[arg(long, value_name = "SQL")]
    statement: Option<String>,
}

impl StatementArgs {
    fn read(&self) -> Result<String, CliError> {
        match (&self.ddl_file, &self.statement) {
            (Some(path), None) => Ok(std::fs::read_to_string(path)?),
            (None, Some(statement)) => Ok(statement.clone()),
            _ => Err(CliError::InvalidConfig(
                "use either DDL_FILE or --statement".to_string(),
            )),
        }
    }
}

#[derive(Args, Debug)]
struct InspectArgs {
    #[command(flatten)]
    source: StatementArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OnExhausted {
    Fail,
    SubstituteMock,
}

impl From<OnExhausted> for ExhaustedPolicy {
    fn from(value: OnExhausted) -> Self {
        match value {
            OnExhausted::Fail => ExhaustedPolicy::Fail,
            OnExhausted::SubstituteMock => ExhaustedPolicy::SubstituteMock,
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    source: StatementArgs,
    /// Number of rows to generate.
    #[arg(long)]
    rows: u64,
    /// Inference server base URL (overrides settings).
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
    /// Per-attempt timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Attempts per field before giving up.
    #[arg(long)]
    max_attempts: Option<u32>,
    /// What to do once every attempt for a field has failed.
    #[arg(long, value_enum)]
    on_exhausted: Option<OnExhausted>,
    /// Additional path for the exported CSV.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output directory for runs (defaults to `<workspace>/runs`).
    #[arg(long)]
    run_dir: Option<PathBuf>,
    /// Workspace root holding `config/settings.toml`.
    #[arg(long, default_value = ".sqlseed")]
    workspace: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Inspect(args) => run_inspect(args).await,
        Command::Generate(args) => run_generate(args).await,
    }
}

async fn run_inspect(args: InspectArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let statement = args.source.read()?;
    let schema = extract_schema(&statement).await?;
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let statement = args.source.read()?;

    let paths = WorkspacePaths::new(args.workspace.clone());
    paths.ensure_dirs()?;
    let settings = load_or_create_settings(&paths)?;

    let endpoint = args
        .endpoint
        .clone()
        .unwrap_or_else(|| settings.backend.endpoint.clone());
    let options = merge_options(settings.generation.clone(), &args);
    options.validate()?;

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        schema_version: SCHEMA_VERSION.to_string(),
        backend: "llama-server".to_string(),
        endpoint: Some(endpoint.clone()),
        model: settings.backend.model.clone(),
        rows: args.rows,
        run_dir: args.run_dir.clone().unwrap_or_else(|| paths.runs_dir.clone()),
        options: options.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(event = "run_started", run_id = %run_id, rows = args.rows);

    let schema = extract_schema(&statement).await?;
    write_schema(&run_paths, &schema)?;
    tracing::info!(
        event = "schema_extracted",
        table = %schema.name,
        columns = schema.columns.len()
    );

    let working = Arc::new(SqliteAdapter::in_memory().await?);
    materialize(working.as_ref(), &statement, &schema).await?;

    let backend: Arc<dyn InferenceBackend> = Arc::new(LlamaServerBackend::new(
        &endpoint,
        Duration::from_millis(settings.backend.request_timeout_ms),
    )?);

    let mut session = GenerationSession::new(schema, backend, options)?
        .with_working_table(working)
        .with_progress(Arc::new(TracingProgress))
        .with_run_id(run_id.clone());

    let cancel = session.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!(event = "interrupt_received", "stopping after the current row");
            cancel.cancel();
        }
    });

    let report = session.run(args.rows).await;
    interrupt.abort();

    let bytes = write_dataset(
        &run_paths,
        session.schema(),
        session.rows(),
        args.out.as_deref(),
    )?;
    write_report(&run_paths, &report)?;

    tracing::info!(
        event = "run_finished",
        status = report.state.as_str(),
        rows_generated = report.rows_generated,
        bytes,
        duration_ms = report.duration_ms
    );

    print_summary(session.schema(), &report, &run_paths.root);

    if report.state != SessionState::Completed {
        return Err(CliError::Incomplete {
            state: report.state.as_str(),
            generated: report.rows_generated,
            requested: report.rows_requested,
            failure: report.failure.clone(),
        });
    }

    Ok(())
}

fn merge_options(mut options: GenerateOptions, args: &GenerateArgs) -> GenerateOptions {
    if let Some(timeout_ms) = args.timeout_ms {
        options.timeout_ms = timeout_ms;
    }
    if let Some(max_attempts) = args.max_attempts {
        options.max_attempts = max_attempts;
    }
    if let Some(policy) = args.on_exhausted {
        options.on_exhausted = policy.into();
    }
    options
}

fn print_summary(
    schema: &TableSchema,
    report: &sqlseed_generate::SessionReport,
    run_root: &std::path::Path,
) {
    println!(
        "{}: {} of {} rows for '{}' ({} model attempts, {} timeouts, {} fallbacks)",
        report.state.as_str(),
        report.rows_generated,
        report.rows_requested,
        schema.name,
        report.model_attempts,
        report.timeouts,
        report.fallback_count
    );
    println!("run artifacts: {}", run_root.display());
}
