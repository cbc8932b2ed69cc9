//! Drawing tools and normalized pointer input.

use image::Rgba;
use serde::{Deserialize, Serialize};

/// Canvas background color (`#FFFFFF`).
pub const BACKGROUND: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 0xFF]);

/// Pencil ink color (`#000000`).
pub const INK: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xFF]);

/// The active drawing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Paints ink.
    #[default]
    Pencil,
    /// Paints the background color.
    Eraser,
}

impl Tool {
    /// The color this tool lays down.
    pub fn color(self) -> Rgba<u8> {
        match self {
            Self::Pencil => INK,
            Self::Eraser => BACKGROUND,
        }
    }
}

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// On-screen placement of the canvas, used to translate client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub left: f32,
    pub top: f32,
}

impl CanvasBounds {
    /// Translate a client-space position into canvas space.
    pub fn to_canvas(self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// A normalized input event from mouse, touch, or pen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer pressed (mouse down, touch start).
    PointerDown(Point),
    /// Pointer moved (mouse move, touch move).
    PointerMove(Point),
    /// Pointer released (mouse up, touch end).
    PointerUp,
    /// Pointer left the canvas while pressed.
    PointerLeave,
}

/// Touch phase reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
}

impl InputEvent {
    /// Build an event from a touch callback. Only the first touch point is
    /// used; a start/move with no touches yields `None`.
    pub fn from_touches(phase: TouchPhase, touches: &[Point]) -> Option<Self> {
        match phase {
            TouchPhase::Start => touches.first().copied().map(Self::PointerDown),
            TouchPhase::Move => touches.first().copied().map(Self::PointerMove),
            TouchPhase::End => Some(Self::PointerUp),
        }
    }
}
