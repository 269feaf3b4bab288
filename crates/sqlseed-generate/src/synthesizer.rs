use std::sync::Arc;

use tracing::{debug, warn};

use sqlseed_core::{ColumnDescriptor, Value};

use crate::backend::InferenceBackend;
use crate::errors::{AttemptFailure, SynthesisError};
use crate::mock::mock_value;
use crate::model::{ExhaustedPolicy, GenerateOptions};
use crate::parse::parse_output;
use crate::prompt::build_prompt;

/// One synthesis attempt for one field.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub column: &'a ColumnDescriptor,
    pub row_index: u64,
    /// 1-based, bounded by `GenerateOptions::max_attempts`.
    pub attempt: u32,
}

/// Where a synthesized value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    PrimaryKey,
    Model,
    Mock,
}

/// A field value plus the attempt bookkeeping that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub value: Value,
    pub source: ValueSource,
    /// Inference calls made for this field.
    pub attempts: u32,
    pub timeouts: u32,
}

enum AttemptOutcome {
    Value(Value),
    Failed(AttemptFailure),
}

/// Produces one scalar per (column, row) through the inference backend.
#[derive(Clone)]
pub struct ValueSynthesizer {
    backend: Arc<dyn InferenceBackend>,
    options: GenerateOptions,
}

impl ValueSynthesizer {
    pub fn new(backend: Arc<dyn InferenceBackend>, options: GenerateOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    pub async fn synthesize(
        &self,
        column: &ColumnDescriptor,
        row_index: u64,
    ) -> Result<Synthesized, SynthesisError> {
        if column.is_integer_primary_key() {
            let key = i64::try_from(row_index)
                .ok()
                .and_then(|index| index.checked_add(1))
                .ok_or_else(|| SynthesisError::KeyOverflow {
                    column: column.name.clone(),
                    row_index,
                })?;
            return Ok(Synthesized {
                value: Value::Int(key),
                source: ValueSource::PrimaryKey,
                attempts: 0,
                timeouts: 0,
            });
        }

        let max_attempts = self.options.max_attempts.max(1);
        let mut timeouts = 0;
        let mut last_cause = AttemptFailure::Empty;

        for attempt in 1..=max_attempts {
            let request = GenerationRequest {
                column,
                row_index,
                attempt,
            };

            match self.attempt(&request).await {
                AttemptOutcome::Value(value) => {
                    return Ok(Synthesized {
                        value,
                        source: ValueSource::Model,
                        attempts: attempt,
                        timeouts,
                    });
                }
                AttemptOutcome::Failed(cause) => {
                    if matches!(cause, AttemptFailure::Timeout(_)) {
                        timeouts += 1;
                    }
                    debug!(
                        column = %column.name,
                        row_index,
                        attempt,
                        cause = cause.code(),
                        detail = %cause,
                        "synthesis attempt failed"
                    );
                    last_cause = cause;
                }
            }

            if attempt < max_attempts {
                let delay = self.options.retry_delay();
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        }

        match self.options.on_exhausted {
            ExhaustedPolicy::Fail => {
                warn!(
                    column = %column.name,
                    row_index,
                    attempts = max_attempts,
                    cause = last_cause.code(),
                    "synthesis exhausted"
                );
                Err(SynthesisError::Exhausted {
                    column: column.name.clone(),
                    row_index,
                    attempts: max_attempts,
                    last_cause,
                })
            }
            ExhaustedPolicy::SubstituteMock => {
                warn!(
                    column = %column.name,
                    row_index,
                    attempts = max_attempts,
                    cause = last_cause.code(),
                    "synthesis exhausted, substituting mock value"
                );
                Ok(Synthesized {
                    value: mock_value(column, row_index),
                    source: ValueSource::Mock,
                    attempts: max_attempts,
                    timeouts,
                })
            }
        }
    }

    async fn attempt(&self, request: &GenerationRequest<'_>) -> AttemptOutcome {
        let prompt = build_prompt(request.column);
        let raw = match self.infer(prompt).await {
            Ok(raw) => raw,
            Err(cause) => return AttemptOutcome::Failed(cause),
        };

        match parse_output(&raw, request.column.value_kind()) {
            Ok(value) => AttemptOutcome::Value(value),
            Err(cause) => AttemptOutcome::Failed(cause),
        }
    }

    /// Race the backend call against the timeout. The losing inference task
    /// is aborted and its result is never observed.
    async fn infer(&self, prompt: String) -> Result<String, AttemptFailure> {
        let backend = Arc::clone(&self.backend);
        let params = self.options.sampling.clone();
        let mut task = tokio::spawn(async move { backend.generate(&prompt, &params).await });
        let timeout = self.options.timeout();

        tokio::select! {
            joined = &mut task => match joined {
                Ok(Ok(text)) => Ok(text),
                Ok(Err(err)) => Err(AttemptFailure::Backend(err.to_string())),
                Err(err) => Err(AttemptFailure::Backend(err.to_string())),
            },
            _ = tokio::time::sleep(timeout) => {
                task.abort();
                Err(AttemptFailure::Timeout(timeout))
            }
        }
    }
}
