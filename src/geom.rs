//! Geometry kernel: points, object transforms, and bounding boxes.
//!
//! Every transformable object stores its geometry relative to a pivot. The
//! [`Transform`] maps that local space to canvas space as
//! `world = rotate(scale(local)) + pivot`; [`Transform::to_local`] is the exact
//! inverse and is the single conversion used by hit-testing and handle
//! detection.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point in canvas or object-local space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Rotate about the origin by `angle` radians.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Placement of an object on the canvas.
///
/// `x`/`y` is the pivot, `rotation` is in radians, and the scale factors are
/// applied in local space before rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::at(Point::default())
    }
}

impl Transform {
    /// Identity rotation and scale with the pivot at `pivot`.
    #[must_use]
    pub fn at(pivot: Point) -> Self {
        Self { x: pivot.x, y: pivot.y, rotation: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }

    #[must_use]
    pub fn pivot(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_pivot(&mut self, pivot: Point) {
        self.x = pivot.x;
        self.y = pivot.y;
    }

    /// Map a local point to canvas space.
    #[must_use]
    pub fn apply(&self, local: Point) -> Point {
        Point::new(local.x * self.scale_x, local.y * self.scale_y).rotated(self.rotation) + self.pivot()
    }

    /// Map a canvas point into this transform's local (pre-scale) space.
    #[must_use]
    pub fn to_local(&self, world: Point) -> Point {
        let unscaled = self.to_visual(world);
        Point::new(unscaled.x / self.scale_x, unscaled.y / self.scale_y)
    }

    /// Map a canvas point into pivot-relative, unrotated space with scale
    /// still applied. Handles live in this space.
    #[must_use]
    pub fn to_visual(&self, world: Point) -> Point {
        (world - self.pivot()).rotated(-self.rotation)
    }
}

/// Axis-aligned box described by its center and extent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// The smallest box containing every point, or `None` for an empty input.
    #[must_use]
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self {
            center_x: (min_x + max_x) / 2.0,
            center_y: (min_y + max_y) / 2.0,
            width: max_x - min_x,
            height: max_y - min_y,
        })
    }

    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.center_x, self.center_y)
    }

    /// Whether `p` lies inside the box grown by `padding` on every side.
    /// Edges are inclusive.
    #[must_use]
    pub fn contains_padded(&self, p: Point, padding: f64) -> bool {
        let half_w = self.width / 2.0 + padding;
        let half_h = self.height / 2.0 + padding;
        p.x >= self.center_x - half_w
            && p.x <= self.center_x + half_w
            && p.y >= self.center_y - half_h
            && p.y <= self.center_y + half_h
    }
}

/// Distance from `p` to the closed segment `a`–`b`.
///
/// A degenerate segment (`a == b`) falls back to the distance to `a`.
#[must_use]
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
