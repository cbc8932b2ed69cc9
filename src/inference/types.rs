//! Prediction returned by the remote classifier.

use serde::{Deserialize, Serialize};

/// Placeholder text used by the fallback prediction.
pub const PLACEHOLDER: &str = "...";

/// The structured `{guess, reasoning, confidence}` answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Name of the object the model thinks is being drawn.
    pub guess: String,
    /// Short visual explanation.
    pub reasoning: String,
    /// Confidence from 0 to 100.
    pub confidence: f64,
}

impl Prediction {
    pub fn new(guess: impl Into<String>, reasoning: impl Into<String>, confidence: f64) -> Self {
        Self {
            guess: guess.into(),
            reasoning: reasoning.into(),
            confidence,
        }
        .normalized()
    }

    /// The sentinel returned whenever analysis fails.
    pub fn fallback() -> Self {
        Self {
            guess: PLACEHOLDER.to_owned(),
            reasoning: PLACEHOLDER.to_owned(),
            confidence: 0.0,
        }
    }

    /// Whether this is the failure sentinel.
    pub fn is_fallback(&self) -> bool {
        self.confidence == 0.0 && self.guess == PLACEHOLDER
    }

    /// Clamp confidence into `0..=100`.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.confidence = self.confidence.clamp(0.0, 100.0);
        self
    }
}
