//! Flood fill over a rendered raster.
//!
//! The fill tool samples what is on screen rather than the scene model: the
//! host renders the current frame, hands the pixels over as an
//! [`RgbaImage`], and the region connected to the clicked pixel by an exact
//! RGBA match is found with an explicit DFS stack (4-connected).
//!
//! The result is recorded as a [`FillRegion`] spanning the region's bounding
//! box. Concave or ring-shaped regions therefore paint more than the pixels
//! that were actually reached; only the extents are kept.

#[cfg(test)]
#[path = "fill_test.rs"]
mod fill_test;

use image::{Rgba, RgbaImage};
use tracing::debug;

use crate::doc::{Color, FillRegion};
use crate::geom::Point;

/// Pixel extents of a filled region, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelBounds {
    fn at(x: u32, y: u32) -> Self {
        Self { min_x: x, min_y: y, max_x: x, max_y: y }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Bounds of the region of pixels equal to the one at `(x, y)` and connected
/// to it. `None` when the seed lies outside the raster.
#[must_use]
pub fn region_bounds(raster: &RgbaImage, x: u32, y: u32) -> Option<PixelBounds> {
    let (w, h) = raster.dimensions();
    if x >= w || y >= h {
        return None;
    }
    let target = *raster.get_pixel(x, y);
    let wu = w as usize;
    let mut visited = vec![false; wu * h as usize];
    let mut bounds = PixelBounds::at(x, y);

    let mut stack: Vec<(u32, u32)> = Vec::with_capacity(1024);
    visited[y as usize * wu + x as usize] = true;
    stack.push((x, y));

    while let Some((cx, cy)) = stack.pop() {
        bounds.include(cx, cy);
        let neighbors = [
            (cx.checked_sub(1), Some(cy)),
            (cx.checked_add(1).filter(|&nx| nx < w), Some(cy)),
            (Some(cx), cy.checked_sub(1)),
            (Some(cx), cy.checked_add(1).filter(|&ny| ny < h)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let idx = ny as usize * wu + nx as usize;
            if !visited[idx] && *raster.get_pixel(nx, ny) == target {
                visited[idx] = true;
                stack.push((nx, ny));
            }
        }
    }
    Some(bounds)
}

/// Fill the region under `at` with `color`.
///
/// Returns `None` when `at` is off the raster or the pixel there already
/// has exactly the fill color.
#[must_use]
pub fn flood_fill(raster: &RgbaImage, at: Point, color: Color) -> Option<FillRegion> {
    let (w, h) = raster.dimensions();
    let (fx, fy) = (at.x.floor(), at.y.floor());
    if fx < 0.0 || fy < 0.0 || fx >= f64::from(w) || fy >= f64::from(h) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x, y) = (fx as u32, fy as u32);
    if *raster.get_pixel(x, y) == Rgba(color.to_rgba()) {
        debug!(x, y, "fill skipped: pixel already has fill color");
        return None;
    }

    let bounds = region_bounds(raster, x, y)?;
    debug!(
        x,
        y,
        min_x = bounds.min_x,
        min_y = bounds.min_y,
        width = bounds.width(),
        height = bounds.height(),
        "flood fill"
    );
    Some(FillRegion {
        position: Point::new(f64::from(bounds.min_x), f64::from(bounds.min_y)),
        width: f64::from(bounds.width()),
        height: f64::from(bounds.height()),
        color,
        opacity: 1.0,
    })
}
