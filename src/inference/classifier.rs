//! Classifier trait for remote sketch recognition backends.

use async_trait::async_trait;

use super::error::InferenceError;
use super::types::Prediction;
use crate::locale::Language;

/// A remote service that turns one PNG image into a [`Prediction`].
///
/// Implementations make exactly one attempt per call: no retries, no
/// backoff, and no timeout beyond whatever the transport imposes.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Provider name for logs (e.g. `"gemini"`).
    fn name(&self) -> &str;

    /// Classify a base64-encoded PNG (no data-URI prefix), answering in `language`.
    async fn classify(
        &self,
        image_base64: &str,
        language: Language,
    ) -> Result<Prediction, InferenceError>;
}
