use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{info, warn};

use sqlseed_core::{Row, TableSchema};
use sqlseed_introspect::Adapter;

use crate::assembler::RowAssembler;
use crate::backend::InferenceBackend;
use crate::errors::GenerationError;
use crate::model::{GenerateOptions, SessionReport, SessionState};
use crate::progress::{NoopProgress, ProgressSink};
use crate::synthesizer::ValueSynthesizer;

/// Cooperative cancellation flag shared between a session and its owner.
///
/// The session polls it before starting each row; an in-flight row is never
/// interrupted.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// One generation session over one table.
///
/// Owns the accumulated rows and the session state; nothing is shared with
/// other sessions. Rows are produced strictly one at a time.
pub struct GenerationSession {
    schema: TableSchema,
    synthesizer: ValueSynthesizer,
    backend_name: &'static str,
    working: Option<Arc<dyn Adapter>>,
    progress: Arc<dyn ProgressSink>,
    cancel: CancelHandle,
    run_id: Option<String>,
    state: SessionState,
    rows: Vec<Row>,
    target_count: u64,
    failure: Option<GenerationError>,
}

impl GenerationSession {
    pub fn new(
        schema: TableSchema,
        backend: Arc<dyn InferenceBackend>,
        options: GenerateOptions,
    ) -> Result<Self, GenerationError> {
        options.validate()?;
        let backend_name = backend.name();
        Ok(Self {
            schema,
            synthesizer: ValueSynthesizer::new(backend, options),
            backend_name,
            working: None,
            progress: Arc::new(NoopProgress),
            cancel: CancelHandle::new(),
            run_id: None,
            state: SessionState::Idle,
            rows: Vec::new(),
            target_count: 0,
            failure: None,
        })
    }

    /// Insert every assembled row into `adapter`'s copy of the table.
    /// Insertion errors fail the session.
    pub fn with_working_table(mut self, adapter: Arc<dyn Adapter>) -> Self {
        self.working = Some(adapter);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Share an externally created cancellation flag.
    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn target_count(&self) -> u64 {
        self.target_count
    }

    /// Rows accumulated so far; partial for stopped or failed sessions.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The error that moved the session to `Failed`, if any.
    pub fn failure(&self) -> Option<&GenerationError> {
        self.failure.as_ref()
    }

    /// Drop accumulated rows, re-arm the cancel flag and return to `Idle`.
    pub fn reset(&mut self) {
        self.clear_results();
        self.state = SessionState::Idle;
        self.cancel.reset();
    }

    fn clear_results(&mut self) {
        self.rows.clear();
        self.failure = None;
        self.target_count = 0;
    }

    /// Generate up to `target_count` rows.
    ///
    /// Prior rows are discarded and the working table, if any, is emptied.
    /// A cancel requested before the call is honored: the run stops before
    /// its first row. Use [`reset`](Self::reset) to re-arm a cancelled
    /// session. Always returns a report; the outcome is carried by
    /// `report.state`.
    pub async fn run(&mut self, target_count: u64) -> SessionReport {
        let started = Instant::now();
        self.clear_results();
        self.target_count = target_count;
        self.state = SessionState::Running;

        let run_id = self
            .run_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let mut report = SessionReport::new(run_id.clone(), self.schema.name.clone(), target_count);
        report.state = SessionState::Running;

        info!(
            run_id = %run_id,
            table = %self.schema.name,
            columns = self.schema.columns.len(),
            rows = target_count,
            backend = self.backend_name,
            "generation started"
        );
        self.progress.report("Starting generation", 0.0);

        let options = self.synthesizer.options().clone();
        let assembler = RowAssembler::new(&self.schema, &self.synthesizer);
        let mut outcome = SessionState::Completed;

        let mut rows_to_run = target_count;
        if let Some(working) = &self.working {
            if let Err(err) = working.clear_table(&self.schema.name).await {
                warn!(run_id = %run_id, error = %err, "working table reset failed");
                report.failure = Some(err.to_string());
                self.failure = Some(err.into());
                outcome = SessionState::Failed;
                rows_to_run = 0;
            }
        }

        for row_index in 0..rows_to_run {
            if self.cancel.is_cancelled() {
                info!(run_id = %run_id, row_index, "generation cancelled");
                outcome = SessionState::Stopped;
                break;
            }

            let assembled = match assembler.assemble_row(row_index).await {
                Ok(assembled) => assembled,
                Err(err) => {
                    warn!(run_id = %run_id, row_index, error = %err, "row synthesis failed");
                    report.failure = Some(err.to_string());
                    self.failure = Some(err.into());
                    outcome = SessionState::Failed;
                    break;
                }
            };

            report.model_attempts += assembled.model_attempts;
            report.timeouts += assembled.timeouts;
            report.fallback_count += assembled.fallbacks;

            if let Some(working) = &self.working {
                if let Err(err) = working.insert_row(&self.schema, &assembled.row).await {
                    warn!(run_id = %run_id, row_index, error = %err, "row insertion failed");
                    report.failure = Some(err.to_string());
                    self.failure = Some(err.into());
                    outcome = SessionState::Failed;
                    break;
                }
            }

            self.rows.push(assembled.row);
            let produced = row_index + 1;
            self.progress.report(
                &format!("Generated row {produced}/{target_count}"),
                produced as f64 / target_count as f64 * 100.0,
            );

            if options.pause_every_rows > 0
                && produced % options.pause_every_rows == 0
                && produced < target_count
            {
                let pause = options.pause();
                if pause.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(pause).await;
                }
            }
        }

        self.state = outcome;
        report.state = outcome;
        report.rows_generated = self.rows.len() as u64;
        report.duration_ms = started.elapsed().as_millis() as u64;

        match outcome {
            SessionState::Completed => {
                self.progress.report("Generation complete", 100.0);
                info!(
                    run_id = %run_id,
                    rows_generated = report.rows_generated,
                    model_attempts = report.model_attempts,
                    timeouts = report.timeouts,
                    fallbacks = report.fallback_count,
                    duration_ms = report.duration_ms,
                    "generation completed"
                );
            }
            SessionState::Stopped => {
                self.progress.report(
                    &format!("Stopped after {} rows", report.rows_generated),
                    report.rows_generated as f64 / target_count.max(1) as f64 * 100.0,
                );
            }
            _ => {
                self.progress.report(
                    &format!("Failed after {} rows", report.rows_generated),
                    report.rows_generated as f64 / target_count.max(1) as f64 * 100.0,
                );
                warn!(
                    run_id = %run_id,
                    rows_generated = report.rows_generated,
                    "generation failed"
                );
            }
        }

        report
    }
}
