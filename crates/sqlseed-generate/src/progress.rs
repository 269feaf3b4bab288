use tracing::info;

/// Receives progress notifications; fire-and-forget.
pub trait ProgressSink: Send + Sync {
    fn report(&self, message: &str, percent: f64);
}

/// Discards progress updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn report(&self, _message: &str, _percent: f64) {}
}

/// Emits progress updates as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn report(&self, message: &str, percent: f64) {
        info!(percent, "{message}");
    }
}
