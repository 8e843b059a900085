//! [`RenderBackend`] for a browser `<canvas>`.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! Objects carrying eraser masks are drawn onto a scratch canvas of the same
//! size, cut with a `destination-out` composite, and then stamped onto the
//! visible canvas, so a mask never removes pixels of other objects.
//!
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::doc::Color;
use crate::geom::Point;
use crate::render::{Pen, RenderBackend};

/// Fetch the 2D context of `canvas`.
///
/// # Errors
///
/// Returns `Err` if the context is unavailable.
pub fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, JsValue> {
    canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(JsValue::from)
}

pub struct CanvasBackend {
    main: CanvasRenderingContext2d,
    scratch_canvas: HtmlCanvasElement,
    scratch: CanvasRenderingContext2d,
    isolated: bool,
}

impl CanvasBackend {
    /// Bind to `canvas`, creating a matching scratch canvas in its document.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas is detached or a context is unavailable.
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let main = context_2d(canvas)?;
        let document = canvas
            .owner_document()
            .ok_or_else(|| JsValue::from_str("canvas has no owner document"))?;
        let scratch_canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(JsValue::from)?;
        scratch_canvas.set_width(canvas.width());
        scratch_canvas.set_height(canvas.height());
        let scratch = context_2d(&scratch_canvas)?;
        Ok(Self { main, scratch_canvas, scratch, isolated: false })
    }

    fn ctx(&self) -> &CanvasRenderingContext2d {
        if self.isolated { &self.scratch } else { &self.main }
    }

    fn apply_pen(&self, pen: &Pen) -> Result<(), JsValue> {
        let ctx = self.ctx();
        ctx.set_stroke_style_str(&pen.color.to_string());
        ctx.set_line_width(pen.width);
        ctx.set_line_cap("round");
        ctx.set_line_join("round");
        let dash_array = js_sys::Array::new();
        if let Some(dash) = pen.dash {
            dash_array.push(&dash.into());
            dash_array.push(&dash.into());
        }
        ctx.set_line_dash(&dash_array)
    }

    fn ellipse_path(&self, center: Point, radius_x: f64, radius_y: f64) -> Result<(), JsValue> {
        let ctx = self.ctx();
        ctx.begin_path();
        ctx.ellipse(center.x, center.y, radius_x.abs(), radius_y.abs(), 0.0, 0.0, TAU)
    }
}

impl RenderBackend for CanvasBackend {
    type Error = JsValue;

    fn clear(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.main.clear_rect(0.0, 0.0, width, height);
        Ok(())
    }

    fn save(&mut self) -> Result<(), JsValue> {
        self.ctx().save();
        Ok(())
    }

    fn restore(&mut self) -> Result<(), JsValue> {
        self.ctx().restore();
        Ok(())
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), JsValue> {
        self.ctx().translate(x, y)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), JsValue> {
        self.ctx().rotate(angle)
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), JsValue> {
        self.ctx().scale(sx, sy)
    }

    fn set_alpha(&mut self, alpha: f64) -> Result<(), JsValue> {
        self.ctx().set_global_alpha(alpha.clamp(0.0, 1.0));
        Ok(())
    }

    fn stroke_path(&mut self, points: &[Point], pen: &Pen) -> Result<(), JsValue> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.apply_pen(pen)?;
        let ctx = self.ctx();
        ctx.begin_path();
        ctx.move_to(first.x, first.y);
        if rest.is_empty() {
            // Round caps turn a zero-length segment into a dot.
            ctx.line_to(first.x, first.y);
        }
        for p in rest {
            ctx.line_to(p.x, p.y);
        }
        ctx.stroke();
        Ok(())
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, pen: &Pen) -> Result<(), JsValue> {
        self.apply_pen(pen)?;
        self.ctx().stroke_rect(x, y, width, height);
        Ok(())
    }

    fn stroke_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64, pen: &Pen) -> Result<(), JsValue> {
        self.apply_pen(pen)?;
        self.ellipse_path(center, radius_x, radius_y)?;
        self.ctx().stroke();
        Ok(())
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<(), JsValue> {
        let ctx = self.ctx();
        ctx.set_fill_style_str(&color.to_string());
        ctx.fill_rect(x, y, width, height);
        Ok(())
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) -> Result<(), JsValue> {
        self.ellipse_path(center, radius, radius)?;
        let ctx = self.ctx();
        ctx.set_fill_style_str(&color.to_string());
        ctx.fill();
        Ok(())
    }

    fn erase_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64) -> Result<(), JsValue> {
        let ctx = self.ctx();
        ctx.save();
        ctx.set_global_composite_operation("destination-out")?;
        ctx.set_global_alpha(1.0);
        self.ellipse_path(center, radius_x, radius_y)?;
        ctx.set_fill_style_str("#000");
        ctx.fill();
        ctx.restore();
        Ok(())
    }

    fn begin_isolated(&mut self) -> Result<(), JsValue> {
        self.scratch.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)?;
        self.scratch.clear_rect(
            0.0,
            0.0,
            f64::from(self.scratch_canvas.width()),
            f64::from(self.scratch_canvas.height()),
        );
        self.isolated = true;
        Ok(())
    }

    fn end_isolated(&mut self) -> Result<(), JsValue> {
        self.isolated = false;
        self.main.draw_image_with_html_canvas_element(&self.scratch_canvas, 0.0, 0.0)
    }
}
