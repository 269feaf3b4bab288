use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{InferenceBackend, SamplingParams};
use crate::errors::BackendError;

type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// In-process backend replaying canned responses.
///
/// Responses are returned in order; once the script runs out the last
/// response repeats. Useful for tests and offline dry runs.
pub struct ScriptedBackend {
    responses: Vec<String>,
    calls: AtomicUsize,
    delay: Option<Duration>,
    prompts: Mutex<Vec<String>>,
    hook: Option<CallHook>,
}

impl ScriptedBackend {
    pub fn always(response: impl Into<String>) -> Self {
        Self::sequence([response.into()])
    }

    pub fn sequence<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: responses.into_iter().map(Into::into).collect(),
            calls: AtomicUsize::new(0),
            delay: None,
            prompts: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    /// Sleep before answering, to exercise timeouts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Run `hook` with the 1-based call number before each answer.
    pub fn with_hook(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl InferenceBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str, _params: &SamplingParams) -> Result<String, BackendError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        if let Some(hook) = &self.hook {
            hook(index + 1);
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let last = self
            .responses
            .len()
            .checked_sub(1)
            .ok_or_else(|| BackendError::Config("script has no responses".to_string()))?;
        Ok(self.responses[index.min(last)].clone())
    }
}
