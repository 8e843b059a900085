//! Hit-testing: which object is under a point, and which handle of the
//! selected object.
//!
//! Objects are tested topmost first: layers from the highest index down, and
//! within a layer from the last-painted object back. The pointer is brought
//! into each object's local space with [`Transform::to_local`] and tested
//! against its padded bounding box.
//!
//! Handles are measured in *visual* space (pivot-relative, unrotated, scale
//! applied), so their hit zones keep a constant size however the object is
//! scaled.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HANDLE_SIZE, ROTATE_DIST};
use crate::doc::SceneObject;
use crate::geom::{Point, Transform};
use crate::timeline::Timeline;

/// Which part of the selected object was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    Resize(Corner),
    Rotate,
}

/// Corner of a bounding box, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    Nw,
    Ne,
    Se,
    Sw,
}

impl Corner {
    pub const ALL: [Corner; 4] = [Corner::Nw, Corner::Ne, Corner::Se, Corner::Sw];

    /// Position in [`Corner::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Corner::Nw => 0,
            Corner::Ne => 1,
            Corner::Se => 2,
            Corner::Sw => 3,
        }
    }

    /// The diagonally opposite corner, `(index + 2) mod 4`.
    #[must_use]
    pub fn opposite(self) -> Corner {
        Corner::ALL[(self.index() + 2) % 4]
    }
}

/// Location of an object in the current frame's exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectRef {
    pub layer: usize,
    /// Position within the layer's exposed list.
    pub index: usize,
}

/// Visual-space geometry of an object's selection box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualBox {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl VisualBox {
    /// The selection box of `obj`, or `None` for objects that cannot be selected.
    #[must_use]
    pub fn of(obj: &SceneObject) -> Option<Self> {
        let t = obj.transform()?;
        let bbox = obj.bounding_box()?;
        Some(Self {
            center: Point::new(bbox.center_x * t.scale_x, bbox.center_y * t.scale_y),
            width: bbox.width * t.scale_x,
            height: bbox.height * t.scale_y,
        })
    }

    #[must_use]
    pub fn corner(&self, corner: Corner) -> Point {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        let (dx, dy) = match corner {
            Corner::Nw => (-hw, -hh),
            Corner::Ne => (hw, -hh),
            Corner::Se => (hw, hh),
            Corner::Sw => (-hw, hh),
        };
        Point::new(self.center.x + dx, self.center.y + dy)
    }

    /// Center of the rotate handle, `ROTATE_DIST` above the top edge.
    #[must_use]
    pub fn rotate_handle(&self) -> Point {
        Point::new(self.center.x, self.center.y - self.height / 2.0 - ROTATE_DIST)
    }
}

/// The topmost selectable object under `world` at `frame`.
#[must_use]
pub fn object_at(timeline: &Timeline, frame: usize, world: Point) -> Option<ObjectRef> {
    (0..timeline.layer_count()).rev().find_map(|layer| {
        let objects = timeline.exposed(frame, layer);
        objects
            .iter()
            .rposition(|obj| body_contains(obj, world))
            .map(|index| ObjectRef { layer, index })
    })
}

/// Whether `world` falls inside `obj`'s padded local bounding box.
#[must_use]
pub fn body_contains(obj: &SceneObject, world: Point) -> bool {
    let (Some(t), Some(bbox)) = (obj.transform(), obj.bounding_box()) else {
        return false;
    };
    bbox.contains_padded(t.to_local(world), obj.hit_padding())
}

/// The handle of `obj` under `world`, if any. The rotate handle wins over a
/// resize corner when the zones overlap.
#[must_use]
pub fn handle_at(obj: &SceneObject, world: Point) -> Option<HitPart> {
    let vbox = VisualBox::of(obj)?;
    let t: &Transform = obj.transform()?;
    let p = t.to_visual(world);

    if p.distance(vbox.rotate_handle()) <= HANDLE_SIZE {
        return Some(HitPart::Rotate);
    }
    Corner::ALL.into_iter().find_map(|corner| {
        let c = vbox.corner(corner);
        ((p.x - c.x).abs() <= HANDLE_SIZE && (p.y - c.y).abs() <= HANDLE_SIZE).then_some(HitPart::Resize(corner))
    })
}
