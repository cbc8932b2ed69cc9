//! Error types for the sketch pipeline.

/// Top-level error type for the sketch capture and guessing system.
#[derive(Debug, thiserror::Error)]
pub enum SketchError {
    /// Canvas surface error (bad dimensions, bad coordinates).
    #[error("canvas error: {0}")]
    Canvas(String),

    /// Frame encoding or decoding error.
    #[error("encode error: {0}")]
    Encode(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unsupported host command.
    #[error("host command error: {0}")]
    Host(String),

    /// Channel send/receive error.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SketchError>;
