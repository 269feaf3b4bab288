use std::time::Duration;

use thiserror::Error;

use sqlseed_core::ValueKind;

/// Why a single synthesis attempt produced no value.
///
/// These are expected outcomes that the retry loop absorbs; they only reach
/// callers as the `last_cause` of [`SynthesisError::Exhausted`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptFailure {
    #[error("inference did not finish within {0:?}")]
    Timeout(Duration),
    #[error("model output contained no token")]
    Empty,
    #[error("expected {} value, got '{}'", .expected.as_str(), .token)]
    TypeMismatch { expected: ValueKind, token: String },
    #[error("backend error: {0}")]
    Backend(String),
}

impl AttemptFailure {
    pub fn code(&self) -> &'static str {
        match self {
            AttemptFailure::Timeout(_) => "timeout",
            AttemptFailure::Empty => "empty",
            AttemptFailure::TypeMismatch { .. } => "type_mismatch",
            AttemptFailure::Backend(_) => "backend",
        }
    }
}

/// Terminal synthesis failure for one column of one row.
#[derive(Debug, Clone, Error)]
pub enum SynthesisError {
    #[error(
        "no value for column '{column}' in row {row_index} after {attempts} attempts: {last_cause}"
    )]
    Exhausted {
        column: String,
        row_index: u64,
        attempts: u32,
        last_cause: AttemptFailure,
    },
    #[error("row {row_index} has no representable key for column '{column}'")]
    KeyOverflow { column: String, row_index: u64 },
}

/// Errors raised by inference backends.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("backend misconfigured: {0}")]
    Config(String),
}

/// Errors that end a generation session.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
    #[error("engine error: {0}")]
    Engine(#[from] sqlseed_core::Error),
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}
