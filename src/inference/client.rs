//! Failure-absorbing front door to a [`Classifier`].
//!
//! Callers never see an error: any failure is logged with its stable code
//! and replaced by [`Prediction::fallback`].

use super::classifier::Classifier;
use super::error::InferenceError;
use super::types::Prediction;
use crate::canvas::frame::{Frame, strip_data_uri_prefix};
use crate::locale::Language;

/// Wraps a classifier with the swallow-and-default error policy.
#[derive(Debug)]
pub struct InferenceClient<C> {
    classifier: C,
}

impl<C: Classifier> InferenceClient<C> {
    pub fn new(classifier: C) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Analyze an encoded sketch (raw base64 or a PNG/JPEG data URI).
    ///
    /// Never fails; returns the fallback prediction on any error.
    pub async fn analyze_sketch(&self, encoded_image: &str, language: Language) -> Prediction {
        match self.try_analyze_sketch(encoded_image, language).await {
            Ok(prediction) => prediction,
            Err(e) => {
                tracing::error!(
                    provider = self.classifier.name(),
                    code = e.code(),
                    error = %e,
                    "error analyzing sketch; using fallback prediction"
                );
                Prediction::fallback()
            }
        }
    }

    /// Analyze a canvas frame. Never fails.
    pub async fn analyze_frame(&self, frame: &Frame, language: Language) -> Prediction {
        self.analyze_sketch(&frame.to_data_uri(), language).await
    }

    /// Fallible variant of [`analyze_sketch`](Self::analyze_sketch) for diagnostics.
    pub async fn try_analyze_sketch(
        &self,
        encoded_image: &str,
        language: Language,
    ) -> Result<Prediction, InferenceError> {
        let payload = strip_data_uri_prefix(encoded_image);
        if payload.is_empty() {
            return Err(InferenceError::ConfigError("empty image payload".into()));
        }
        let prediction = self.classifier.classify(payload, language).await?;
        tracing::info!(
            provider = self.classifier.name(),
            guess = %prediction.guess,
            confidence = prediction.confidence,
            "sketch analyzed"
        );
        Ok(prediction.normalized())
    }
}
