//! Canvas 2D backend for the particle field.

use std::f64::consts::PI;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::error::{SurfaceError, describe};
use super::surface::Surface;
use super::theme::Color;

/// Draws onto an HTML canvas through its 2D context.
pub struct Canvas2dSurface {
	ctx: CanvasRenderingContext2d,
}

impl Canvas2dSurface {
	/// Acquire the 2D context of `canvas`.
	pub fn acquire(canvas: &HtmlCanvasElement) -> Result<Self, SurfaceError> {
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| SurfaceError::ContextRequest(describe(&e)))?
			.ok_or(SurfaceError::NoContext)?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| SurfaceError::NoContext)?;
		Ok(Self { ctx })
	}
}

impl Surface for Canvas2dSurface {
	fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ctx.clear_rect(x, y, width, height);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
		self.ctx
			.set_fill_style_str(&color.with_alpha(alpha * color.a).to_css());
		self.ctx.begin_path();
		let _ = self.ctx.arc(x, y, radius, 0.0, PI * 2.0);
		self.ctx.fill();
	}

	fn line(
		&mut self,
		x1: f64,
		y1: f64,
		x2: f64,
		y2: f64,
		color: Color,
		alpha: f64,
		line_width: f64,
	) {
		self.ctx
			.set_stroke_style_str(&color.with_alpha(alpha * color.a).to_css());
		self.ctx.set_line_width(line_width);
		self.ctx.begin_path();
		self.ctx.move_to(x1, y1);
		self.ctx.line_to(x2, y2);
		self.ctx.stroke();
	}
}
