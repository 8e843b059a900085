//! Eraser segmentation: cut strokes and drop shapes under an erase circle.
//!
//! Strokes are split at point granularity. Each consecutive point pair is a
//! segment, tested in canvas space by offsetting the points with the stroke's
//! pivot only (rotation and scale are not applied). A segment survives when
//! neither endpoint nor the segment itself comes within
//! `radius + stroke_width / 2` of the erase center; consecutive survivors form
//! runs, and every run of two or more points becomes a new stroke carrying an
//! [`EraserMask`] so the renderer can round off the cut.
//!
//! Shapes are never clipped: they are removed whole when the erase center is
//! within `radius` of their transformed bounding-box center. Fill regions are
//! never touched.

#[cfg(test)]
#[path = "eraser_test.rs"]
mod eraser_test;

use tracing::debug;

use crate::consts::ERASER_MIN_STEP;
use crate::doc::{EraserMask, ObjectBody, SceneObject, Stroke};
use crate::geom::{Point, point_to_segment_distance};

/// Result of erasing at one point.
#[derive(Debug, Clone, Default)]
pub struct Erased {
    /// The rebuilt object list, in original paint order.
    pub objects: Vec<SceneObject>,
    /// Objects removed outright (shapes, fully covered strokes).
    pub removed: usize,
    /// Strokes replaced by their surviving pieces.
    pub split: usize,
}

impl Erased {
    /// Whether the erase changed anything.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.removed > 0 || self.split > 0
    }
}

/// How one stroke fared under the eraser.
#[derive(Debug, Clone, PartialEq)]
pub enum StrokeCut {
    /// Nothing was within reach; keep the original object as is.
    Untouched,
    /// Replace the stroke with these pieces (possibly none).
    Pieces(Vec<SceneObject>),
}

/// Erase a circle of `radius` at `center` from `objects`.
#[must_use]
pub fn erase(objects: &[SceneObject], center: Point, radius: f64) -> Erased {
    let mut out = Erased { objects: Vec::with_capacity(objects.len()), ..Erased::default() };
    for obj in objects {
        match &obj.body {
            ObjectBody::Stroke(stroke) => match cut_stroke(stroke, center, radius) {
                StrokeCut::Untouched => out.objects.push(obj.clone()),
                StrokeCut::Pieces(pieces) => {
                    if pieces.is_empty() {
                        out.removed += 1;
                    } else {
                        out.split += 1;
                    }
                    out.objects.extend(pieces);
                }
            },
            ObjectBody::Shape(_) => {
                if shape_hit(obj, center, radius) {
                    out.removed += 1;
                } else {
                    out.objects.push(obj.clone());
                }
            }
            ObjectBody::Fill(_) => out.objects.push(obj.clone()),
        }
    }
    if out.changed() {
        debug!(x = center.x, y = center.y, radius, removed = out.removed, split = out.split, "erased");
    }
    out
}

/// Split `stroke` around the erase circle.
#[must_use]
pub fn cut_stroke(stroke: &Stroke, center: Point, radius: f64) -> StrokeCut {
    let reach = radius + stroke.style.width / 2.0;
    let pivot = stroke.transform.pivot();
    let world = |p: Point| p + pivot;

    match stroke.points.as_slice() {
        [] => return StrokeCut::Untouched,
        [only] => {
            return if world(*only).distance(center) <= reach {
                StrokeCut::Pieces(Vec::new())
            } else {
                StrokeCut::Untouched
            };
        }
        _ => {}
    }

    let mut runs: Vec<Vec<Point>> = Vec::new();
    let mut run: Vec<Point> = Vec::new();
    for pair in stroke.points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let (wa, wb) = (world(a), world(b));
        let safe = wa.distance(center) > reach
            && wb.distance(center) > reach
            && point_to_segment_distance(center, wa, wb) > reach;
        if safe {
            if run.is_empty() {
                run.push(a);
            }
            run.push(b);
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }

    if runs.len() == 1 && runs[0].len() == stroke.points.len() {
        return StrokeCut::Untouched;
    }

    let mask = EraserMask { x: center.x - pivot.x, y: center.y - pivot.y, radius_x: radius, radius_y: radius };
    let pieces = runs
        .into_iter()
        .filter(|points| points.len() >= 2)
        .map(|points| {
            let mut masks = stroke.masks.clone();
            masks.push(mask);
            SceneObject::new(ObjectBody::Stroke(Stroke { points, style: stroke.style, transform: stroke.transform, masks }))
        })
        .collect();
    StrokeCut::Pieces(pieces)
}

/// Whether the erase circle swallows a shape's transformed box center.
fn shape_hit(obj: &SceneObject, center: Point, radius: f64) -> bool {
    let (Some(t), Some(bbox)) = (obj.transform(), obj.bounding_box()) else {
        return false;
    };
    t.apply(bbox.center()).distance(center) <= radius
}

/// Erase centers along a drag from `from` to `to`, both ends included, spaced
/// at most `max(2, radius / 3)` apart.
#[must_use]
pub fn interpolate(from: Point, to: Point, radius: f64) -> Vec<Point> {
    let step = ERASER_MIN_STEP.max(radius / 3.0);
    let dist = from.distance(to);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let steps = (dist / step).ceil() as usize;
    if steps == 0 {
        return vec![to];
    }
    #[allow(clippy::cast_precision_loss)]
    (0..=steps)
        .map(|i| {
            let f = i as f64 / steps as f64;
            Point::new(from.x + (to.x - from.x) * f, from.y + (to.y - from.y) * f)
        })
        .collect()
}
