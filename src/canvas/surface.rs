//! The drawing surface: raster, active stroke, tool, and undo history.
//!
//! Every operation that finishes a visible change (stroke end, clear, undo)
//! returns a freshly encoded [`Frame`] of the whole canvas for the caller to
//! forward to the analysis pipeline.

use image::RgbaImage;

use super::frame::Frame;
use super::history::SnapshotHistory;
use super::raster;
use super::types::{BACKGROUND, InputEvent, Point, Tool};
use crate::config::CanvasConfig;
use crate::error::{Result, SketchError};

/// Largest accepted canvas side, in pixels.
pub const MAX_DIMENSION: u32 = 4096;

/// A freehand drawing canvas backed by an RGBA raster.
#[derive(Debug, Clone)]
pub struct DrawingSurface {
    raster: RgbaImage,
    history: SnapshotHistory,
    tool: Tool,
    stroke_width: f32,
    /// Last point of the stroke in progress.
    cursor: Option<Point>,
}

impl DrawingSurface {
    /// Create a background-filled surface.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::Canvas`] for zero dimensions, a side above
    /// [`MAX_DIMENSION`], or a non-positive stroke width.
    pub fn new(width: u32, height: u32, stroke_width: f32, undo_capacity: usize) -> Result<Self> {
        check_dimensions(width, height)?;
        if !(stroke_width.is_finite() && stroke_width > 0.0) {
            return Err(SketchError::Canvas(format!(
                "stroke width must be positive, got {stroke_width}"
            )));
        }
        Ok(Self {
            raster: RgbaImage::from_pixel(width, height, BACKGROUND),
            history: SnapshotHistory::new(undo_capacity),
            tool: Tool::default(),
            stroke_width,
            cursor: None,
        })
    }

    /// Create a surface from the `[canvas]` config section.
    pub fn from_config(config: &CanvasConfig) -> Result<Self> {
        Self::new(
            config.width,
            config.height,
            config.stroke_width,
            config.undo_capacity,
        )
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Select the tool used by subsequent strokes.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Current pixels.
    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn is_drawing(&self) -> bool {
        self.cursor.is_some()
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Dispatch a normalized input event.
    ///
    /// Returns a frame only when the event ends a stroke.
    pub fn handle_input(&mut self, event: InputEvent) -> Result<Option<Frame>> {
        match event {
            InputEvent::PointerDown(p) => {
                self.pointer_down(p);
                Ok(None)
            }
            InputEvent::PointerMove(p) => {
                self.pointer_move(p);
                Ok(None)
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => self.pointer_up(),
        }
    }

    /// Start a stroke, saving the current raster for undo first.
    pub fn pointer_down(&mut self, p: Point) {
        if !is_finite(p) {
            tracing::debug!(?p, "ignoring pointer down with non-finite coordinates");
            return;
        }
        self.history.push(self.raster.clone());
        self.cursor = Some(p);
    }

    /// Extend the active stroke to `p`. Ignored when no stroke is active.
    pub fn pointer_move(&mut self, p: Point) {
        let Some(last) = self.cursor else {
            return;
        };
        if !is_finite(p) {
            tracing::debug!(?p, "ignoring pointer move with non-finite coordinates");
            return;
        }
        raster::stroke_segment(&mut self.raster, last, p, self.stroke_width, self.tool.color());
        self.cursor = Some(p);
    }

    /// End the active stroke and emit a frame. No-op without a stroke.
    pub fn pointer_up(&mut self) -> Result<Option<Frame>> {
        if self.cursor.take().is_none() {
            return Ok(None);
        }
        self.snapshot_frame().map(Some)
    }

    /// Fill the canvas with the background color and emit a frame.
    pub fn clear(&mut self) -> Result<Frame> {
        self.cursor = None;
        self.history.push(self.raster.clone());
        raster::fill(&mut self.raster, BACKGROUND);
        self.snapshot_frame()
    }

    /// Restore the most recent snapshot and emit a frame.
    ///
    /// Returns `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self) -> Result<Option<Frame>> {
        let Some(previous) = self.history.pop() else {
            return Ok(None);
        };
        self.cursor = None;
        self.raster = previous;
        self.snapshot_frame().map(Some)
    }

    /// Reinitialize to new dimensions, wiping content to background.
    ///
    /// Snapshots of the old size cannot be restored onto the new raster, so
    /// the undo history is dropped as well.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        check_dimensions(width, height)?;
        self.raster = RgbaImage::from_pixel(width, height, BACKGROUND);
        self.history.clear();
        self.cursor = None;
        tracing::debug!(width, height, "canvas resized");
        Ok(())
    }

    /// Encode the current raster.
    pub fn snapshot_frame(&self) -> Result<Frame> {
        Frame::encode(&self.raster)
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(SketchError::Canvas(format!(
            "canvas dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(SketchError::Canvas(format!(
            "canvas dimensions must not exceed {MAX_DIMENSION}x{MAX_DIMENSION}, got {width}x{height}"
        )));
    }
    Ok(())
}

fn is_finite(p: Point) -> bool {
    p.x.is_finite() && p.y.is_finite()
}
