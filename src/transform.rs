//! Transform drags: move, rotate and resize of a selected object.
//!
//! A [`TransformDrag`] captures what the gesture needs at pointer-down and is
//! then applied to the object on every pointer-move. Only the object's
//! [`Transform`] changes; its local geometry is never rewritten.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use crate::consts::{MIN_VISUAL_SIZE, ROTATION_SNAP};
use crate::doc::SceneObject;
use crate::geom::{Point, Transform};
use crate::hit::{Corner, HitPart, VisualBox};

/// An in-progress transform gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformDrag {
    /// Translate the pivot rigidly.
    Move {
        /// Pointer minus pivot at grab time.
        offset: Point,
    },
    /// Spin about the pivot.
    Rotate {
        /// Pointer angle around the pivot at grab time.
        grab_angle: f64,
        /// Object rotation at grab time.
        grab_rotation: f64,
    },
    /// Rescale by dragging a corner; the opposite corner is the anchor.
    Resize { corner: Corner },
}

impl TransformDrag {
    /// Start a drag of `part` on `transform` with the pointer at `pointer`.
    #[must_use]
    pub fn begin(part: HitPart, transform: &Transform, pointer: Point) -> Self {
        match part {
            HitPart::Body => Self::Move { offset: pointer - transform.pivot() },
            HitPart::Rotate => Self::Rotate {
                grab_angle: angle_around(transform.pivot(), pointer),
                grab_rotation: transform.rotation,
            },
            HitPart::Resize(corner) => Self::Resize { corner },
        }
    }

    /// Apply the drag for a pointer at `pointer`. `snap` rounds rotation to
    /// 15° steps. Returns `false` if the object has no transform.
    pub fn update(&self, obj: &mut SceneObject, pointer: Point, snap: bool) -> bool {
        let Some(vbox) = VisualBox::of(obj) else {
            return false;
        };
        let Some(bbox) = obj.bounding_box() else {
            return false;
        };
        let Some(t) = obj.transform_mut() else {
            return false;
        };
        match *self {
            Self::Move { offset } => t.set_pivot(pointer - offset),
            Self::Rotate { grab_angle, grab_rotation } => {
                let rotation = grab_rotation + (angle_around(t.pivot(), pointer) - grab_angle);
                t.rotation = if snap { snap_rotation(rotation) } else { rotation };
            }
            Self::Resize { corner } => {
                let (width, height) = resized_dimensions(t, &vbox, corner, pointer);
                // A zero-extent axis (e.g. a horizontal line) keeps its scale.
                if bbox.width > 0.0 {
                    t.scale_x = width / bbox.width;
                }
                if bbox.height > 0.0 {
                    t.scale_y = height / bbox.height;
                }
            }
        }
        true
    }
}

fn angle_around(pivot: Point, pointer: Point) -> f64 {
    (pointer.y - pivot.y).atan2(pointer.x - pivot.x)
}

/// Round to the nearest multiple of 15°.
#[must_use]
pub fn snap_rotation(rotation: f64) -> f64 {
    (rotation / ROTATION_SNAP).round() * ROTATION_SNAP
}

/// New visual width and height for a resize drag of `corner`, measured from
/// the opposite corner and clamped to [`MIN_VISUAL_SIZE`].
#[must_use]
pub fn resized_dimensions(t: &Transform, vbox: &VisualBox, corner: Corner, pointer: Point) -> (f64, f64) {
    let p = t.to_visual(pointer);
    let anchor = vbox.corner(corner.opposite());
    ((p.x - anchor.x).abs().max(MIN_VISUAL_SIZE), (p.y - anchor.y).abs().max(MIN_VISUAL_SIZE))
}
