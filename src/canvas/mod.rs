//! Freehand drawing surface.
//!
//! Turns normalized pointer input into strokes on an RGBA raster, keeps a
//! bounded undo history, and encodes the canvas into PNG [`Frame`]s.

pub mod frame;
pub mod history;
pub mod raster;
pub mod surface;
pub mod types;

pub use frame::{Frame, strip_data_uri_prefix};
pub use surface::{DrawingSurface, MAX_DIMENSION};
pub use types::{CanvasBounds, InputEvent, Point, Tool, TouchPhase};
