//! Shared numeric constants for the flipbook crate.

// ── Transform handles ───────────────────────────────────────────

/// Half-extent of a corner resize handle hit zone, and radius of the rotate
/// handle hit zone, in canvas units.
pub const HANDLE_SIZE: f64 = 8.0;

/// Distance above the visual bounding box to the rotate handle center.
pub const ROTATE_DIST: f64 = 15.0;

/// Drawn radius of the rotate handle circle.
pub const ROTATE_HANDLE_DRAW_RADIUS: f64 = 6.0;

/// Smallest visual width/height a resize drag may produce.
pub const MIN_VISUAL_SIZE: f64 = 4.0;

/// Rotation snap increment with the modifier held (15°).
pub const ROTATION_SNAP: f64 = std::f64::consts::PI / 12.0;

// ── Smoothing ───────────────────────────────────────────────────

/// Spline subdivisions per segment for the live brush preview.
pub const PREVIEW_STEPS: usize = 3;

/// Spline subdivisions per segment for a committed stroke.
pub const COMMIT_STEPS: usize = 20;

// ── Eraser ──────────────────────────────────────────────────────

/// Lower bound on the spacing of interpolated erase centers.
pub const ERASER_MIN_STEP: f64 = 2.0;

// ── Timeline ────────────────────────────────────────────────────

/// Peak opacity of the nearest onion-skin ghost frame.
pub const ONION_BASE_ALPHA: f64 = 0.4;

/// Default stroke width when a style does not specify one.
pub const DEFAULT_STROKE_WIDTH: f64 = 4.0;
