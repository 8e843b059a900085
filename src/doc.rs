//! Document model: scene objects, their styles, and eraser masks.
//!
//! This module defines what can be drawn into a timeline cell. A
//! [`SceneObject`] pairs an identity (`id`, `revision`) with an
//! [`ObjectBody`], the closed set of drawable kinds:
//!
//! - [`Stroke`]: a smoothed freehand path, points relative to its pivot.
//! - [`Shape`]: a line, rectangle or ellipse spanned by two pivot-relative points.
//! - [`FillRegion`]: a solid rectangle in absolute canvas coordinates produced
//!   by the fill tool. It has no transform and is never selectable.
//!
//! Strokes and shapes carry an ordered list of [`EraserMask`] cutouts that the
//! renderer subtracts at draw time without touching stored geometry.
//!
//! Equality between scene objects compares drawn content only. Two
//! independent copies of the same drawing compare equal even though their
//! ids differ.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geom::{BoundingBox, Point, Transform};

/// Unique identifier for a scene object.
pub type ObjectId = Uuid;

/// Error parsing a hex color string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),
}

/// An 8-bit RGBA color. Serialized as `#rrggbb` (or `#rrggbbaa` when not opaque).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (leading `#` optional).
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHex`] for any other length or a non-hex digit.
    pub fn from_hex(raw: &str) -> Result<Self, ColorError> {
        let hex = raw.trim().trim_start_matches('#');
        let invalid = || ColorError::InvalidHex(raw.to_string());
        let byte = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());
        if !hex.is_ascii() {
            return Err(invalid());
        }
        match hex.len() {
            3 => {
                let nibble = |i: usize| byte(&hex[i..=i]).map(|v| v * 17);
                Ok(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?))
            }
            6 => Ok(Self::rgb(byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?)),
            8 => Ok(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
                a: byte(&hex[6..8])?,
            }),
            _ => Err(invalid()),
        }
    }

    #[must_use]
    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Color {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Paint style shared by strokes and shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub color: Color,
    /// Brush width for strokes, line thickness for shapes.
    pub width: f64,
    /// In `[0, 1]`.
    pub opacity: f64,
}

impl Style {
    /// Fully opaque style.
    #[must_use]
    pub fn new(color: Color, width: f64) -> Self {
        Self { color, width, opacity: 1.0 }
    }

    #[must_use]
    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity: opacity.clamp(0.0, 1.0), ..self }
    }
}

/// Elliptical cutout in pivot-relative, pre-scale space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EraserMask {
    pub x: f64,
    pub y: f64,
    pub radius_x: f64,
    pub radius_y: f64,
}

/// The primitive drawn by a [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// Straight segment from `start` to `end`.
    #[default]
    Line,
    /// Outline of the box spanned by `start` and `end`.
    Rect,
    /// Ellipse inscribed in the box spanned by `start` and `end`.
    Circle,
}

/// A freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<Point>,
    pub style: Style,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<EraserMask>,
}

/// A geometric shape spanned by two pivot-relative points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub start: Point,
    pub end: Point,
    pub style: Style,
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub masks: Vec<EraserMask>,
}

/// Solid rectangle left behind by the fill tool, in absolute canvas space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillRegion {
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub color: Color,
    pub opacity: f64,
}

/// The drawable payload of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ObjectBody {
    Stroke(Stroke),
    Shape(Shape),
    Fill(FillRegion),
}

/// A drawable object stored in a timeline cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    /// Identity used to key derived render data.
    pub id: ObjectId,
    /// Bumped on every in-place mutation.
    pub revision: u64,
    pub body: ObjectBody,
}

impl PartialEq for SceneObject {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl SceneObject {
    /// Wrap a body with a fresh identity.
    #[must_use]
    pub fn new(body: ObjectBody) -> Self {
        Self { id: Uuid::new_v4(), revision: 0, body }
    }

    #[must_use]
    pub fn stroke(points: Vec<Point>, style: Style, transform: Transform) -> Self {
        Self::new(ObjectBody::Stroke(Stroke { points, style, transform, masks: Vec::new() }))
    }

    #[must_use]
    pub fn shape(kind: ShapeKind, start: Point, end: Point, style: Style, transform: Transform) -> Self {
        Self::new(ObjectBody::Shape(Shape { kind, start, end, style, transform, masks: Vec::new() }))
    }

    #[must_use]
    pub fn fill(region: FillRegion) -> Self {
        Self::new(ObjectBody::Fill(region))
    }

    /// Independent structural copy with a fresh identity.
    #[must_use]
    pub fn deep_copy(&self) -> Self {
        Self::new(self.body.clone())
    }

    /// Local, pivot-relative bounding box (scale not applied).
    ///
    /// `None` for fill regions and strokes without points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match &self.body {
            ObjectBody::Stroke(stroke) => BoundingBox::from_points(stroke.points.iter().copied()),
            ObjectBody::Shape(shape) => BoundingBox::from_points([shape.start, shape.end]),
            ObjectBody::Fill(_) => None,
        }
    }

    #[must_use]
    pub fn transform(&self) -> Option<&Transform> {
        match &self.body {
            ObjectBody::Stroke(stroke) => Some(&stroke.transform),
            ObjectBody::Shape(shape) => Some(&shape.transform),
            ObjectBody::Fill(_) => None,
        }
    }

    /// Mutable transform access. Counts as a mutation.
    pub fn transform_mut(&mut self) -> Option<&mut Transform> {
        self.revision += 1;
        match &mut self.body {
            ObjectBody::Stroke(stroke) => Some(&mut stroke.transform),
            ObjectBody::Shape(shape) => Some(&mut shape.transform),
            ObjectBody::Fill(_) => None,
        }
    }

    #[must_use]
    pub fn style(&self) -> Option<&Style> {
        match &self.body {
            ObjectBody::Stroke(stroke) => Some(&stroke.style),
            ObjectBody::Shape(shape) => Some(&shape.style),
            ObjectBody::Fill(_) => None,
        }
    }

    #[must_use]
    pub fn masks(&self) -> &[EraserMask] {
        match &self.body {
            ObjectBody::Stroke(stroke) => &stroke.masks,
            ObjectBody::Shape(shape) => &shape.masks,
            ObjectBody::Fill(_) => &[],
        }
    }

    /// Drawn opacity regardless of kind.
    #[must_use]
    pub fn opacity(&self) -> f64 {
        match &self.body {
            ObjectBody::Stroke(stroke) => stroke.style.opacity,
            ObjectBody::Shape(shape) => shape.style.opacity,
            ObjectBody::Fill(fill) => fill.opacity,
        }
    }

    /// Selection slop added around the local bounding box.
    #[must_use]
    pub fn hit_padding(&self) -> f64 {
        match &self.body {
            ObjectBody::Stroke(stroke) => stroke.style.width / 2.0,
            ObjectBody::Shape(_) | ObjectBody::Fill(_) => 0.0,
        }
    }

    /// Whether the transform tool can select this object.
    #[must_use]
    pub fn is_transformable(&self) -> bool {
        !matches!(self.body, ObjectBody::Fill(_))
    }
}
