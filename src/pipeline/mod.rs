//! Frame scheduling and the analysis worker.

pub mod debounce;
pub mod session;

pub use debounce::DebounceController;
pub use session::{AnalysisState, SketchSession};
