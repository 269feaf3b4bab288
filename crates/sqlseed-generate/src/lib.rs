//! Model-driven row generation for sqlseed.
//!
//! For every column of an extracted table this crate builds a one-shot seed
//! prompt, races an inference call against a timeout, parses and coerces the
//! first token of the output, and retries a bounded number of times. Rows are
//! assembled column by column and accumulated by a cancellable session.

pub mod assembler;
pub mod backend;
pub mod errors;
pub mod mock;
pub mod model;
pub mod output;
pub mod parse;
pub mod progress;
pub mod prompt;
pub mod session;
pub mod synthesizer;

pub use assembler::{AssembledRow, RowAssembler};
pub use backend::{InferenceBackend, LlamaServerBackend, SamplingParams, ScriptedBackend};
pub use errors::{AttemptFailure, BackendError, GenerationError, SynthesisError};
pub use model::{ExhaustedPolicy, GenerateOptions, SessionReport, SessionState};
pub use progress::{NoopProgress, ProgressSink, TracingProgress};
pub use session::{CancelHandle, GenerationSession};
pub use synthesizer::{GenerationRequest, Synthesized, ValueSource, ValueSynthesizer};
