//! Tunables for the particle background.
//!
//! Every field has a default matching the shipped look: 100 particles,
//! radius in `[1, 4)`, speed up to 0.2 per frame on each axis, and lines
//! between particles closer than 150 surface units at up to 0.2 opacity.
//!
//! The page may override any subset of these through a JSON blob; missing
//! keys keep their defaults.

use serde::Deserialize;

/// Particle field configuration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
	/// Number of particles, fixed for the lifetime of a field.
	pub count: usize,
	/// Inclusive lower bound of a particle's radius.
	pub radius_min: f64,
	/// Exclusive upper bound of a particle's radius.
	pub radius_max: f64,
	/// Each velocity component is drawn from `[-max_speed, max_speed)`.
	pub max_speed: f64,
	/// Opacity of the particle dots.
	pub particle_alpha: f64,
	/// Pairs closer than this are joined by a line.
	pub connection_threshold: f64,
	/// Line opacity at distance zero; fades linearly to 0 at the threshold.
	pub connection_alpha: f64,
	/// Stroke width of connection lines.
	pub line_width: f64,
	/// Pull particles back inside the surface when it shrinks.
	///
	/// Off by default: particles left outside a shrunk surface are recycled
	/// by the next frame's bounds check anyway.
	pub clamp_on_resize: bool,
	/// CSS custom property holding the accent color.
	pub color_property: String,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			count: 100,
			radius_min: 1.0,
			radius_max: 4.0,
			max_speed: 0.2,
			particle_alpha: 0.5,
			connection_threshold: 150.0,
			connection_alpha: 0.2,
			line_width: 1.0,
			clamp_on_resize: false,
			color_property: "--accent-color".to_string(),
		}
	}
}

impl FieldConfig {
	/// Repair values that would make sampling or drawing meaningless.
	///
	/// Non-finite or negative numbers fall back to the default, a swapped
	/// radius range is reordered, and opacities are clamped to `[0, 1]`.
	pub fn validated(mut self) -> Self {
		let defaults = Self::default();
		let non_negative = |v: f64, fallback: f64| {
			if v.is_finite() && v >= 0.0 { v } else { fallback }
		};

		self.radius_min = non_negative(self.radius_min, defaults.radius_min);
		self.radius_max = non_negative(self.radius_max, defaults.radius_max);
		if self.radius_min > self.radius_max {
			std::mem::swap(&mut self.radius_min, &mut self.radius_max);
		}
		self.max_speed = non_negative(self.max_speed, defaults.max_speed);
		self.connection_threshold =
			non_negative(self.connection_threshold, defaults.connection_threshold);
		self.line_width = non_negative(self.line_width, defaults.line_width);
		self.particle_alpha = non_negative(self.particle_alpha, defaults.particle_alpha).min(1.0);
		self.connection_alpha =
			non_negative(self.connection_alpha, defaults.connection_alpha).min(1.0);
		if self.color_property.trim().is_empty() {
			self.color_property = defaults.color_property;
		}
		self
	}
}
