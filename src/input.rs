//! Input model: tools, tool settings, modifier keys, and the gesture state machine.
//!
//! `Tool`, `ToolSettings` and `Modifiers` capture the user's intent at the
//! time of a pointer event. `InputState` is the gesture tracked between
//! pointer-down and pointer-up, carrying what the engine needs to preview
//! and then commit the result on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_STROKE_WIDTH;
use crate::doc::{Color, ShapeKind, Style};
use crate::geom::Point;
use crate::hit::ObjectRef;
use crate::timeline::OnionSkin;
use crate::transform::TransformDrag;

/// Which tool is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Freehand brush (default).
    #[default]
    Brush,
    /// Cut strokes and remove shapes.
    Eraser,
    /// Line, rectangle or ellipse by drag.
    Shape,
    /// Flood fill from the rendered frame.
    Fill,
    /// Select, move, rotate and resize objects.
    Transform,
}

impl Tool {
    /// Whether this tool writes into the active cell on pointer-down.
    #[must_use]
    pub fn is_drawing(self) -> bool {
        matches!(self, Self::Brush | Self::Eraser | Self::Shape | Self::Fill)
    }
}

/// Per-tool options chosen in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub brush_color: Color,
    pub brush_size: f64,
    pub eraser_radius: f64,
    pub shape_kind: ShapeKind,
    pub shape_color: Color,
    pub shape_thickness: f64,
    pub fill_color: Color,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            brush_color: Color::BLACK,
            brush_size: DEFAULT_STROKE_WIDTH,
            eraser_radius: 10.0,
            shape_kind: ShapeKind::Line,
            shape_color: Color::BLACK,
            shape_thickness: 3.0,
            fill_color: Color::RED,
        }
    }
}

impl ToolSettings {
    #[must_use]
    pub fn brush_style(&self) -> Style {
        Style::new(self.brush_color, self.brush_size)
    }

    #[must_use]
    pub fn shape_style(&self) -> Style {
        Style::new(self.shape_color, self.shape_thickness)
    }
}

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default)]
pub struct Modifiers {
    /// Shift key is held; snaps rotation to 15° steps.
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// Persistent UI state visible to the renderer.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Currently active tool.
    pub tool: Tool,
    pub settings: ToolSettings,
    /// Layer that drawing tools write to.
    pub active_layer: usize,
    /// Selected object in the current frame, transform tool only.
    pub selection: Option<ObjectRef>,
    pub onion: OnionSkin,
}

/// The gesture in progress.
#[derive(Debug, Clone, Default)]
pub enum InputState {
    /// Waiting for the next pointer-down.
    #[default]
    Idle,
    /// Capturing raw brush samples in canvas space.
    Drawing { samples: Vec<Point> },
    /// Dragging out a shape from `start`.
    Shaping { start: Point, current: Point },
    /// Erasing; `last` is the previous erase center.
    Erasing { last: Point },
    /// Dragging a handle or the body of the selected object.
    Transforming { target: ObjectRef, drag: TransformDrag },
}

impl InputState {
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether a brush stroke is being captured.
    #[must_use]
    pub fn is_drawing(&self) -> bool {
        matches!(self, Self::Drawing { .. })
    }
}
