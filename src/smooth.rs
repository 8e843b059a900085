//! Stroke smoothing: Catmull-Rom resampling of raw pointer samples.
//!
//! Each consecutive window `(p0, p1, p2, p3)` contributes the curve between
//! `p1` and `p2`; the sample sequence is padded by repeating its first and
//! last points so the curve passes through every sample.

#[cfg(test)]
#[path = "smooth_test.rs"]
mod smooth_test;

use crate::geom::{BoundingBox, Point};

/// Resample `samples` along a Catmull-Rom spline with `steps` subdivisions per
/// segment. The output starts at the first sample and ends at the last.
#[must_use]
pub fn catmull_rom(samples: &[Point], steps: usize) -> Vec<Point> {
    let n = samples.len();
    if n < 2 || steps == 0 {
        return samples.to_vec();
    }

    let mut out = Vec::with_capacity((n - 1) * steps + 1);
    for i in 0..n - 1 {
        let p0 = samples[i.saturating_sub(1)];
        let p1 = samples[i];
        let p2 = samples[i + 1];
        let p3 = samples[(i + 2).min(n - 1)];
        for s in 0..steps {
            #[allow(clippy::cast_precision_loss)]
            let t = s as f64 / steps as f64;
            out.push(Point::new(spline_axis(p0.x, p1.x, p2.x, p3.x, t), spline_axis(p0.y, p1.y, p2.y, p3.y, t)));
        }
    }
    out.push(samples[n - 1]);
    out
}

fn spline_axis(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Re-express `points` relative to the center of their bounding box.
///
/// Returns the shifted points and the center, which becomes the stroke pivot.
#[must_use]
pub fn center_on_bounds(points: &[Point]) -> (Vec<Point>, Point) {
    let Some(bbox) = BoundingBox::from_points(points.iter().copied()) else {
        return (Vec::new(), Point::default());
    };
    let center = bbox.center();
    (points.iter().map(|&p| p - center).collect(), center)
}
