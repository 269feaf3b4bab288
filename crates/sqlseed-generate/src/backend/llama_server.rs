use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{InferenceBackend, SamplingParams};
use crate::errors::BackendError;

/// Backend speaking the llama.cpp server `/completion` protocol.
#[derive(Debug, Clone)]
pub struct LlamaServerBackend {
    client: Client,
    completion_url: String,
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    prompt: &'a str,
    n_predict: u32,
    temperature: f32,
    top_p: f32,
    stream: bool,
}

#[derive(Deserialize)]
struct CompletionResponse {
    content: String,
}

impl LlamaServerBackend {
    /// `request_timeout` bounds abandoned requests; the per-attempt timeout is
    /// enforced separately by the synthesizer.
    pub fn new(endpoint: &str, request_timeout: Duration) -> Result<Self, BackendError> {
        let endpoint = endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(BackendError::Config(format!(
                "endpoint must be an http(s) URL: {endpoint}"
            )));
        }

        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            completion_url: format!("{}/completion", endpoint.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl InferenceBackend for LlamaServerBackend {
    fn name(&self) -> &'static str {
        "llama-server"
    }

    async fn generate(&self, prompt: &str, params: &SamplingParams) -> Result<String, BackendError> {
        let request = CompletionRequest {
            prompt,
            n_predict: params.max_new_tokens,
            temperature: if params.do_sample {
                params.temperature
            } else {
                0.0
            },
            top_p: params.top_p,
            stream: false,
        };

        let response = self
            .client
            .post(&self.completion_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status { status, body });
        }

        let completion: CompletionResponse = response.json().await?;
        debug!(url = %self.completion_url, chars = completion.content.len(), "completion received");
        Ok(completion.content)
    }
}
