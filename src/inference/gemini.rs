//! Gemini `generateContent` adapter.
//!
//! Sends the sketch as an inline PNG part plus a text instruction, with a
//! JSON response schema so the model answers with exactly
//! `{guess, reasoning, confidence}`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use sketchguess::inference::classifier::Classifier;
//! use sketchguess::inference::gemini::{GeminiClassifier, GeminiConfig};
//! use sketchguess::locale::Language;
//!
//! # async fn example() -> Result<(), sketchguess::inference::error::InferenceError> {
//! let classifier = GeminiClassifier::new(GeminiConfig::new(Some("key".into()), "gemini-3-flash-preview"));
//! let prediction = classifier.classify("iVBORw0KGgo...", Language::En).await?;
//! println!("{} ({}%)", prediction.guess, prediction.confidence);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::Deserialize;

use super::classifier::Classifier;
use super::error::InferenceError;
use super::prompt;
use super::types::Prediction;
use crate::config::InferenceConfig;
use crate::locale::Language;

/// MIME type of every frame sent.
const IMAGE_MIME_TYPE: &str = "image/png";

// ── Configuration ─────────────────────────────────────────────

/// Configuration for the Gemini adapter.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key. `None` makes every call fail with an auth error.
    pub api_key: Option<String>,
    /// Base URL (defaults to `https://generativelanguage.googleapis.com`).
    pub base_url: String,
    /// The model to use.
    pub model: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a config with the given key and model against the public endpoint.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: InferenceConfig::default().base_url,
            model: model.into(),
        }
    }

    /// Build from the `[inference]` config section, resolving the key from
    /// the environment when the section has none.
    pub fn from_inference_config(config: &InferenceConfig) -> Self {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                "no inference API key configured; every analysis will return the fallback prediction"
            );
        }
        Self {
            api_key,
            base_url: config.base_url.clone(),
            model: config.model.clone(),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Full `generateContent` endpoint URL.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

// ── Request Builder ───────────────────────────────────────────

/// Build the JSON request body for one sketch.
pub fn build_request(image_base64: &str, language: Language) -> serde_json::Value {
    serde_json::json!({
        "contents": [{
            "parts": [
                {
                    "inlineData": {
                        "mimeType": IMAGE_MIME_TYPE,
                        "data": image_base64,
                    }
                },
                { "text": prompt::instruction(language) },
            ]
        }],
        "generationConfig": {
            "responseMimeType": "application/json",
            "responseSchema": prompt::response_schema(language),
        },
    })
}

// ── Response Parsing ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Concatenate the text parts of the first candidate.
///
/// Returns `None` when there is no candidate or no non-empty text.
fn response_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Parse a raw `generateContent` response body into a prediction.
pub fn parse_response(body: &str) -> Result<Prediction, InferenceError> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|e| {
        InferenceError::MalformedResponse(format!("invalid generateContent body: {e}"))
    })?;
    let text = response_text(&response)
        .ok_or_else(|| InferenceError::EmptyResponse("no response text".into()))?;
    let prediction: Prediction = serde_json::from_str(text.trim()).map_err(|e| {
        InferenceError::MalformedResponse(format!("response text is not a prediction: {e}"))
    })?;
    Ok(prediction.normalized())
}

/// Extract an error message from a Gemini error response body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}

// ── Adapter Implementation ────────────────────────────────────

/// Gemini classifier adapter.
pub struct GeminiClassifier {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl std::fmt::Debug for GeminiClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClassifier")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url)
            .finish()
    }
}

impl GeminiClassifier {
    /// Create a new adapter with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// Map an HTTP error status to the appropriate InferenceError.
    fn map_http_error(status: reqwest::StatusCode, body: &str) -> InferenceError {
        let message = extract_error_message(body);
        match status.as_u16() {
            401 | 403 => InferenceError::AuthError(format!("Gemini authentication failed: {message}")),
            429 => InferenceError::RequestError(format!("Gemini rate limited: {message}")),
            _ => InferenceError::ProviderError(format!(
                "Gemini HTTP {}: {message}",
                status.as_u16()
            )),
        }
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn classify(
        &self,
        image_base64: &str,
        language: Language,
    ) -> Result<Prediction, InferenceError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| InferenceError::AuthError("missing API key".into()))?;

        let url = self.config.endpoint();
        let body = build_request(image_base64, language);
        tracing::debug!(
            model = %self.config.model,
            language = language.code(),
            payload_len = image_base64.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| InferenceError::RequestError(format!("Gemini request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(Self::map_http_error(status, &body_text));
        }

        let body_text = response.text().await.map_err(|e| {
            InferenceError::RequestError(format!("failed to read Gemini response body: {e}"))
        })?;
        parse_response(&body_text)
    }
}
