//! The drawing capability the particle field renders through.

use super::theme::Color;

/// A 2D raster target.
///
/// The field only ever clears, fills circles and strokes straight lines, so
/// any backend offering those three operations can host it: the browser
/// canvas in production, [`Raster`](super::raster::Raster) in headless runs.
pub trait Surface {
	/// Reset the rectangle to fully transparent.
	fn clear(&mut self, x: f64, y: f64, width: f64, height: f64);

	/// Fill a circle centered at `(x, y)`.
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color, alpha: f64);

	/// Stroke a straight segment.
	#[allow(clippy::too_many_arguments)]
	fn line(
		&mut self,
		x1: f64,
		y1: f64,
		x2: f64,
		y2: f64,
		color: Color,
		alpha: f64,
		line_width: f64,
	);
}
