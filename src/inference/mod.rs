//! Remote sketch classification.
//!
//! The [`Classifier`] trait is the seam to the hosted model;
//! [`InferenceClient`] wraps any classifier with the policy that analysis
//! never fails from the caller's point of view.

pub mod classifier;
pub mod client;
pub mod error;
pub mod gemini;
pub mod prompt;
pub mod types;

pub use classifier::Classifier;
pub use client::InferenceClient;
pub use error::InferenceError;
pub use gemini::{GeminiClassifier, GeminiConfig};
pub use types::Prediction;
