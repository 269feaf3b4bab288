use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::SamplingParams;
use crate::errors::GenerationError;

/// What the synthesizer does once every attempt for a field has failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExhaustedPolicy {
    /// Surface `SynthesisError::Exhausted`; the session fails.
    #[default]
    Fail,
    /// Substitute a deterministic mock value and count it as a fallback.
    SubstituteMock,
}

/// Options for the generation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Maximum inference attempts for a single field.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub retry_delay_ms: u64,
    /// Wall-clock budget for one inference call.
    pub timeout_ms: u64,
    /// Yield to other tasks after this many rows (0 disables the pause).
    pub pause_every_rows: u64,
    pub pause_ms: u64,
    pub on_exhausted: ExhaustedPolicy,
    pub sampling: SamplingParams,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            retry_delay_ms: 150,
            timeout_ms: 5_000,
            pause_every_rows: 10,
            pause_ms: 10,
            on_exhausted: ExhaustedPolicy::Fail,
            sampling: SamplingParams::default(),
        }
    }
}

impl GenerateOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.max_attempts == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(GenerationError::InvalidOptions(
                "timeout_ms must be positive".to_string(),
            ));
        }
        if self.sampling.max_new_tokens == 0 {
            return Err(GenerationError::InvalidOptions(
                "sampling.max_new_tokens must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Lifecycle of a generation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Stopped,
    Failed,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Completed | SessionState::Stopped | SessionState::Failed
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Completed => "completed",
            SessionState::Stopped => "stopped",
            SessionState::Failed => "failed",
        }
    }
}

/// Report for a generation session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub run_id: String,
    pub table: String,
    pub state: SessionState,
    pub rows_requested: u64,
    pub rows_generated: u64,
    /// Inference attempts across all fields, successful or not.
    pub model_attempts: u64,
    pub timeouts: u64,
    /// Fields filled by the mock fallback instead of the model.
    pub fallback_count: u64,
    pub failure: Option<String>,
    pub duration_ms: u64,
}

impl SessionReport {
    pub fn new(run_id: String, table: String, rows_requested: u64) -> Self {
        Self {
            run_id,
            table,
            state: SessionState::Idle,
            rows_requested,
            rows_generated: 0,
            model_attempts: 0,
            timeouts: 0,
            fallback_count: 0,
            failure: None,
            duration_ms: 0,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.state == SessionState::Completed
    }
}
