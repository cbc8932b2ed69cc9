//! Sketchguess: live sketch capture with debounced remote guessing.
//!
//! The crate turns freehand pointer input into a raster, waits for the
//! drawing to settle, and asks a hosted multimodal model what the sketch
//! depicts:
//! Pointer input → DrawingSurface → Debounce (800 ms) → InferenceClient → AnalysisState
//!
//! # Architecture
//!
//! - **Canvas**: RGBA raster with pencil/eraser strokes and bounded undo via `image`
//! - **Debounce**: quiet-period gate on a tokio task, cancellable via `tokio-util`
//! - **Inference**: Gemini `generateContent` over `reqwest`, failures collapse to a fallback
//! - **Session**: single worker task publishing the tagged analysis state on a watch channel
//! - **Host**: newline-delimited JSON bridge so any front end can drive a session

pub mod canvas;
pub mod config;
pub mod error;
pub mod host;
pub mod inference;
pub mod locale;
pub mod pipeline;

pub use config::SketchConfig;
pub use error::{Result, SketchError};
pub use inference::{InferenceClient, Prediction};
pub use locale::Language;
pub use pipeline::{AnalysisState, SketchSession};
