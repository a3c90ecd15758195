//! Software rasterizer for running the field without a browser.
//!
//! Coverage is decided per pixel by testing the pixel center against the
//! shape, with no anti-aliasing. Colors blend source-over in straight
//! (non-premultiplied) alpha, which is what a 2D canvas does for the
//! operations the field uses.

use super::surface::Surface;
use super::theme::Color;

/// An RGBA pixel buffer, channels in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Raster {
	width: u32,
	height: u32,
	pixels: Vec<[f32; 4]>,
}

impl Raster {
	/// A fully transparent raster.
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			pixels: vec![[0.0; 4]; width as usize * height as usize],
		}
	}

	/// Width in pixels.
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Height in pixels.
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Reallocate to a new size, discarding contents like a canvas does.
	pub fn resize(&mut self, width: u32, height: u32) {
		*self = Self::new(width, height);
	}

	/// Pixel at `(x, y)`, or `None` outside the raster.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
		(x < self.width && y < self.height).then(|| self.pixels[self.index(x, y)])
	}

	/// Number of pixels with any opacity.
	pub fn painted(&self) -> usize {
		self.pixels.iter().filter(|p| p[3] > 0.0).count()
	}

	/// Row-major RGBA8 bytes, e.g. for writing out an image.
	pub fn to_rgba8(&self) -> Vec<u8> {
		self.pixels
			.iter()
			.flat_map(|p| p.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
			.collect()
	}

	fn index(&self, x: u32, y: u32) -> usize {
		y as usize * self.width as usize + x as usize
	}

	/// Clip a float span to pixel indices whose centers may fall inside it.
	fn span(lo: f64, hi: f64, limit: u32) -> std::ops::Range<u32> {
		if !(lo.is_finite() && hi.is_finite()) || hi < 0.0 {
			return 0..0;
		}
		let start = (lo - 0.5).ceil().max(0.0) as u32;
		let end = ((hi - 0.5).floor() + 1.0).clamp(0.0, limit as f64) as u32;
		start.min(end)..end
	}

	fn blend(&mut self, x: u32, y: u32, color: Color, alpha: f64) {
		let src_a = (alpha * color.a).clamp(0.0, 1.0) as f32;
		if src_a <= 0.0 {
			return;
		}
		let idx = self.index(x, y);
		let dst = self.pixels[idx];
		let out_a = src_a + dst[3] * (1.0 - src_a);
		let src = [color.r, color.g, color.b].map(|c| c as f32 / 255.0);

		let mut out = [0.0; 4];
		for ch in 0..3 {
			out[ch] = (src[ch] * src_a + dst[ch] * dst[3] * (1.0 - src_a)) / out_a;
		}
		out[3] = out_a;
		self.pixels[idx] = out;
	}
}

impl Surface for Raster {
	fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
		for py in Self::span(y, y + height, self.height) {
			for px in Self::span(x, x + width, self.width) {
				let idx = self.index(px, py);
				self.pixels[idx] = [0.0; 4];
			}
		}
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64) {
		if radius <= 0.0 {
			return;
		}
		let r2 = radius * radius;
		for py in Self::span(y - radius, y + radius, self.height) {
			for px in Self::span(x - radius, x + radius, self.width) {
				let (dx, dy) = (px as f64 + 0.5 - x, py as f64 + 0.5 - y);
				if dx * dx + dy * dy <= r2 {
					self.blend(px, py, color, alpha);
				}
			}
		}
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
		if line_width <= 0.0 {
			return;
		}
		let half = line_width / 2.0;
		let (dx, dy) = (x2 - x1, y2 - y1);
		let len2 = dx * dx + dy * dy;

		for py in Self::span(y1.min(y2) - half, y1.max(y2) + half, self.height) {
			for px in Self::span(x1.min(x2) - half, x1.max(x2) + half, self.width) {
				let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
				// Butt caps: only points projecting onto the segment count.
				let t = if len2 > 0.0 {
					((cx - x1) * dx + (cy - y1) * dy) / len2
				} else {
					0.0
				};
				if !(0.0..=1.0).contains(&t) {
					continue;
				}
				let (nx, ny) = (x1 + t * dx - cx, y1 + t * dy - cy);
				if nx * nx + ny * ny <= half * half {
					self.blend(px, py, color, alpha);
				}
			}
		}
	}
}
