//! Rendering: turns the exposed scene into calls on a [`RenderBackend`].
//!
//! The core decides *what* to draw and *where*; the backend owns the
//! rasterization API. Drawing never mutates scene state. The only mutable
//! input is the [`PathCache`], which holds per-object draw plans keyed by
//! object id and invalidated when an object's revision changes.
//!
//! Draw order for a frame:
//! 1. clear
//! 2. onion-skin ghost frames (alpha-faded, beneath everything)
//! 3. the frame's layers, bottom first, objects in paint order
//! 4. overlay objects (live brush/shape preview)
//! 5. selection box and handles

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::collections::HashMap;

use crate::consts::{HANDLE_SIZE, ROTATE_HANDLE_DRAW_RADIUS};
use crate::doc::{Color, ObjectBody, ObjectId, SceneObject, ShapeKind};
use crate::geom::Point;
use crate::hit::{Corner, VisualBox};
use crate::timeline::Timeline;

/// Selection outline and handle stroke color.
pub const SELECTION_COLOR: Color = Color::rgb(0x1e, 0x90, 0xff);

/// Selection handle fill.
pub const HANDLE_FILL: Color = Color::rgb(0xff, 0xff, 0xff);

/// Selection dash segment length.
const SELECTION_DASH: f64 = 4.0;

/// Line style for stroked primitives. Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Color,
    pub width: f64,
    /// Dash and gap length; `None` for a solid line.
    pub dash: Option<f64>,
}

impl Pen {
    #[must_use]
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width, dash: None }
    }

    #[must_use]
    pub fn dashed(color: Color, width: f64, dash: f64) -> Self {
        Self { color, width, dash: Some(dash) }
    }
}

/// The drawing surface the core renders through.
///
/// Transform calls compose with the current transform; `save`/`restore`
/// bracket them together with alpha. `begin_isolated`/`end_isolated` bracket
/// one object that carries eraser masks: everything drawn in between lands
/// on a scratch surface, so `erase_ellipse` only cuts that object, and the
/// result is composited onto the target at `end_isolated`.
pub trait RenderBackend {
    type Error;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), Self::Error>;
    fn save(&mut self) -> Result<(), Self::Error>;
    fn restore(&mut self) -> Result<(), Self::Error>;
    fn translate(&mut self, x: f64, y: f64) -> Result<(), Self::Error>;
    fn rotate(&mut self, angle: f64) -> Result<(), Self::Error>;
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), Self::Error>;
    /// Set the global alpha, in `[0, 1]`.
    fn set_alpha(&mut self, alpha: f64) -> Result<(), Self::Error>;
    /// Open polyline. A single point draws a dot.
    fn stroke_path(&mut self, points: &[Point], pen: &Pen) -> Result<(), Self::Error>;
    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, pen: &Pen) -> Result<(), Self::Error>;
    fn stroke_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64, pen: &Pen) -> Result<(), Self::Error>;
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<(), Self::Error>;
    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), Self::Error>;
    /// Subtract an ellipse from what has been drawn so far.
    fn erase_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64) -> Result<(), Self::Error>;
    fn begin_isolated(&mut self) -> Result<(), Self::Error>;
    fn end_isolated(&mut self) -> Result<(), Self::Error>;
}

// =============================================================
// Draw plans and cache
// =============================================================

/// One local-space drawing step of an object.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path(Vec<Point>),
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Ellipse { center: Point, radius_x: f64, radius_y: f64 },
    Erase { center: Point, radius_x: f64, radius_y: f64 },
}

/// Local-space primitives for a stroke or shape, valid for one revision.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawPlan {
    pub revision: u64,
    pub primitives: Vec<Primitive>,
}

impl DrawPlan {
    /// Plan for `obj`; `None` for objects drawn without a transform (fills).
    #[must_use]
    pub fn build(obj: &SceneObject) -> Option<Self> {
        let mut primitives = match &obj.body {
            ObjectBody::Stroke(stroke) => vec![Primitive::Path(stroke.points.clone())],
            ObjectBody::Shape(shape) => {
                let (a, b) = (shape.start, shape.end);
                let prim = match shape.kind {
                    ShapeKind::Line => Primitive::Path(vec![a, b]),
                    ShapeKind::Rect => Primitive::Rect {
                        x: a.x.min(b.x),
                        y: a.y.min(b.y),
                        width: (b.x - a.x).abs(),
                        height: (b.y - a.y).abs(),
                    },
                    ShapeKind::Circle => Primitive::Ellipse {
                        center: Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0),
                        radius_x: (b.x - a.x).abs() / 2.0,
                        radius_y: (b.y - a.y).abs() / 2.0,
                    },
                };
                vec![prim]
            }
            ObjectBody::Fill(_) => return None,
        };
        // Masks share the local frame of the geometry they were cut from.
        primitives.extend(obj.masks().iter().map(|m| Primitive::Erase {
            center: Point::new(m.x, m.y),
            radius_x: m.radius_x,
            radius_y: m.radius_y,
        }));
        Some(Self { revision: obj.revision, primitives })
    }

    #[must_use]
    pub fn has_erase(&self) -> bool {
        self.primitives.iter().any(|p| matches!(p, Primitive::Erase { .. }))
    }
}

#[derive(Debug)]
struct CacheEntry {
    plan: DrawPlan,
    used: bool,
}

/// Draw plans keyed by object id. Stale revisions are rebuilt on lookup;
/// entries not looked up since the previous [`PathCache::sweep`] are dropped
/// by the next one.
#[derive(Debug, Default)]
pub struct PathCache {
    entries: HashMap<ObjectId, CacheEntry>,
}

impl PathCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The cached plan for `obj`, rebuilt if its revision moved on.
    pub fn plan(&mut self, obj: &SceneObject) -> Option<&DrawPlan> {
        if !obj.is_transformable() {
            return None;
        }
        let entry = match self.entries.entry(obj.id) {
            std::collections::hash_map::Entry::Occupied(slot) => {
                let entry = slot.into_mut();
                if entry.plan.revision != obj.revision {
                    entry.plan = DrawPlan::build(obj)?;
                }
                entry
            }
            std::collections::hash_map::Entry::Vacant(slot) => {
                slot.insert(CacheEntry { plan: DrawPlan::build(obj)?, used: false })
            }
        };
        entry.used = true;
        Some(&entry.plan)
    }

    /// Drop entries unused since the last sweep. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| std::mem::take(&mut entry.used));
        before - self.entries.len()
    }
}

// =============================================================
// Scene
// =============================================================

/// Everything beyond the timeline that one render pass needs.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    pub width: f64,
    pub height: f64,
    pub frame: usize,
    /// Ghost frames and their alpha, drawn beneath the frame.
    pub ghosts: &'a [(usize, f64)],
    /// Uncommitted objects drawn on top, e.g. the live brush preview.
    pub overlay: &'a [SceneObject],
    pub selected: Option<&'a SceneObject>,
}

/// Draw a full frame.
///
/// # Errors
///
/// Propagates the first backend error.
pub fn draw_scene<B: RenderBackend>(
    backend: &mut B,
    timeline: &Timeline,
    view: &SceneView<'_>,
    cache: &mut PathCache,
) -> Result<(), B::Error> {
    backend.clear(view.width, view.height)?;

    for &(ghost, alpha) in view.ghosts {
        draw_frame(backend, timeline, ghost, alpha, cache)?;
    }
    draw_frame(backend, timeline, view.frame, 1.0, cache)?;
    for obj in view.overlay {
        draw_object(backend, obj, 1.0, cache)?;
    }
    if let Some(obj) = view.selected {
        draw_selection(backend, obj)?;
    }

    cache.sweep();
    Ok(())
}

fn draw_frame<B: RenderBackend>(
    backend: &mut B,
    timeline: &Timeline,
    frame: usize,
    alpha: f64,
    cache: &mut PathCache,
) -> Result<(), B::Error> {
    for layer in 0..timeline.layer_count() {
        for obj in timeline.exposed(frame, layer) {
            draw_object(backend, obj, alpha, cache)?;
        }
    }
    Ok(())
}

/// Draw one object with its own opacity multiplied by `alpha`.
///
/// # Errors
///
/// Propagates the first backend error.
pub fn draw_object<B: RenderBackend>(
    backend: &mut B,
    obj: &SceneObject,
    alpha: f64,
    cache: &mut PathCache,
) -> Result<(), B::Error> {
    let opacity = obj.opacity() * alpha;

    if let ObjectBody::Fill(fill) = &obj.body {
        backend.save()?;
        backend.set_alpha(opacity)?;
        backend.fill_rect(fill.position.x, fill.position.y, fill.width, fill.height, fill.color)?;
        return backend.restore();
    }

    let (Some(t), Some(style)) = (obj.transform().copied(), obj.style().copied()) else {
        return Ok(());
    };
    let Some(plan) = cache.plan(obj) else {
        return Ok(());
    };
    let pen = Pen::solid(style.color, style.width);
    let isolated = plan.has_erase();

    if isolated {
        backend.begin_isolated()?;
    }
    backend.save()?;
    backend.translate(t.x, t.y)?;
    backend.rotate(t.rotation)?;
    backend.scale(t.scale_x, t.scale_y)?;
    backend.set_alpha(opacity)?;
    for prim in &plan.primitives {
        match prim {
            Primitive::Path(points) => backend.stroke_path(points, &pen)?,
            Primitive::Rect { x, y, width, height } => backend.stroke_rect(*x, *y, *width, *height, &pen)?,
            Primitive::Ellipse { center, radius_x, radius_y } => {
                backend.stroke_ellipse(*center, *radius_x, *radius_y, &pen)?;
            }
            Primitive::Erase { center, radius_x, radius_y } => backend.erase_ellipse(*center, *radius_x, *radius_y)?,
        }
    }
    backend.restore()?;
    if isolated {
        backend.end_isolated()?;
    }
    Ok(())
}

// =============================================================
// Selection
// =============================================================

/// Dashed visual box, rotate stem and handle, and four corner handles,
/// drawn in the object's rotated frame at constant (unscaled) size.
///
/// # Errors
///
/// Propagates the first backend error.
pub fn draw_selection<B: RenderBackend>(backend: &mut B, obj: &SceneObject) -> Result<(), B::Error> {
    let (Some(vbox), Some(t)) = (VisualBox::of(obj), obj.transform().copied()) else {
        return Ok(());
    };
    let outline = Pen::solid(SELECTION_COLOR, 1.0);

    backend.save()?;
    backend.translate(t.x, t.y)?;
    backend.rotate(t.rotation)?;

    let nw = vbox.corner(Corner::Nw);
    backend.stroke_rect(
        nw.x,
        nw.y,
        vbox.width,
        vbox.height,
        &Pen::dashed(SELECTION_COLOR, 1.0, SELECTION_DASH),
    )?;

    let top = Point::new(vbox.center.x, vbox.center.y - vbox.height / 2.0);
    let knob = vbox.rotate_handle();
    backend.stroke_path(&[top, knob], &outline)?;
    backend.fill_circle(knob, ROTATE_HANDLE_DRAW_RADIUS, HANDLE_FILL)?;
    backend.stroke_ellipse(knob, ROTATE_HANDLE_DRAW_RADIUS, ROTATE_HANDLE_DRAW_RADIUS, &outline)?;

    let half = HANDLE_SIZE / 2.0;
    for corner in Corner::ALL {
        let c = vbox.corner(corner);
        backend.fill_rect(c.x - half, c.y - half, HANDLE_SIZE, HANDLE_SIZE, HANDLE_FILL)?;
        backend.stroke_rect(c.x - half, c.y - half, HANDLE_SIZE, HANDLE_SIZE, &outline)?;
    }

    backend.restore()
}
