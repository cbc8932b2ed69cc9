//! Error types for the inference module.
//!
//! Each error variant carries a stable error code (SCREAMING_SNAKE_CASE)
//! that is included in the Display output and accessible via [`InferenceError::code()`].
//! None of these reach the UI: the analysis path logs them and substitutes
//! the fallback prediction.

/// Stable error codes for programmatic error handling.
pub mod error_codes {
    /// Invalid or missing configuration.
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";

    /// Authentication failed (invalid/missing API key).
    pub const AUTH_FAILED: &str = "AUTH_FAILED";

    /// The request could not be sent or was rejected as transient (network, 429).
    pub const REQUEST_FAILED: &str = "REQUEST_FAILED";

    /// Provider-specific error not covered by other variants.
    pub const PROVIDER_ERROR: &str = "PROVIDER_ERROR";

    /// The provider answered without any response text.
    pub const EMPTY_RESPONSE: &str = "EMPTY_RESPONSE";

    /// The response text did not match the declared schema.
    pub const MALFORMED_RESPONSE: &str = "MALFORMED_RESPONSE";
}

/// Errors produced while asking the remote classifier for a prediction.
///
/// The Display impl formats as `[CODE] message`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InferenceError {
    /// Invalid or missing configuration.
    #[error("[{}] {}", error_codes::CONFIG_INVALID, .0)]
    ConfigError(String),

    /// Authentication failed (invalid/missing API key).
    #[error("[{}] {}", error_codes::AUTH_FAILED, .0)]
    AuthError(String),

    /// Request to the provider failed.
    #[error("[{}] {}", error_codes::REQUEST_FAILED, .0)]
    RequestError(String),

    /// Provider-specific error not covered by other variants.
    #[error("[{}] {}", error_codes::PROVIDER_ERROR, .0)]
    ProviderError(String),

    /// The provider returned no response text.
    #[error("[{}] {}", error_codes::EMPTY_RESPONSE, .0)]
    EmptyResponse(String),

    /// The response text could not be parsed into a prediction.
    #[error("[{}] {}", error_codes::MALFORMED_RESPONSE, .0)]
    MalformedResponse(String),
}

impl InferenceError {
    /// Returns the stable error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => error_codes::CONFIG_INVALID,
            Self::AuthError(_) => error_codes::AUTH_FAILED,
            Self::RequestError(_) => error_codes::REQUEST_FAILED,
            Self::ProviderError(_) => error_codes::PROVIDER_ERROR,
            Self::EmptyResponse(_) => error_codes::EMPTY_RESPONSE,
            Self::MalformedResponse(_) => error_codes::MALFORMED_RESPONSE,
        }
    }

    /// Returns the inner message without the code prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::ConfigError(m)
            | Self::AuthError(m)
            | Self::RequestError(m)
            | Self::ProviderError(m)
            | Self::EmptyResponse(m)
            | Self::MalformedResponse(m) => m,
        }
    }
}

/// Convenience alias for inference results.
pub type Result<T> = std::result::Result<T, InferenceError>;
