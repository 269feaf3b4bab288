use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::BackendError;

mod llama_server;
mod scripted;

pub use llama_server::LlamaServerBackend;
pub use scripted::ScriptedBackend;

/// Sampling controls forwarded to the backend untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            max_new_tokens: 8,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
        }
    }
}

/// Text-generation backend.
///
/// Calls are raced against a timeout and may be abandoned mid-flight, so
/// implementations must tolerate being dropped at any await point.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Continue `prompt` and return only the generated text.
    async fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, BackendError>;
}
