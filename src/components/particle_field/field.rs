//! Drifting, self-connecting point cloud.
//!
//! A fixed population of particles drifts in straight lines across the
//! surface. A particle that leaves the surface is not bounced or wrapped; it
//! is recycled in place with a fresh random position, size and velocity, so
//! the population never changes size.

use log::trace;
use rand::Rng;

use super::config::FieldConfig;
use super::surface::Surface;
use super::theme::ColorSource;

/// A single floating particle.
#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
	/// Horizontal position in surface pixels.
	pub x: f64,
	/// Vertical position in surface pixels.
	pub y: f64,
	/// Drawn radius.
	pub radius: f64,
	/// Horizontal velocity, pixels per frame.
	pub vx: f64,
	/// Vertical velocity, pixels per frame.
	pub vy: f64,
}

impl Particle {
	/// Whether the particle lies inside `[0, width] × [0, height]`.
	pub fn is_within(&self, width: f64, height: f64) -> bool {
		self.x >= 0.0 && self.x <= width && self.y >= 0.0 && self.y <= height
	}

	/// Euclidean distance between centers.
	pub fn distance_to(&self, other: &Particle) -> f64 {
		let (dx, dy) = (self.x - other.x, self.y - other.y);
		(dx * dx + dy * dy).sqrt()
	}
}

/// Opacity of the line joining two particles `distance` apart.
///
/// Fades linearly from `base_alpha` at distance zero to nothing at the
/// threshold. Pairs at or beyond the threshold are not connected.
pub fn connection_alpha(distance: f64, threshold: f64, base_alpha: f64) -> Option<f64> {
	if distance < threshold {
		Some((1.0 - distance / threshold) * base_alpha)
	} else {
		None
	}
}

/// Sanitize a surface dimension: anything not strictly positive is empty.
fn extent(v: f64) -> f64 {
	if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

/// Manages the background particles and draws them.
///
/// The random source is injected so that a seeded generator reproduces the
/// exact same field, frame for frame.
pub struct ParticleField<R> {
	particles: Vec<Particle>,
	width: f64,
	height: f64,
	config: FieldConfig,
	rng: R,
}

impl<R: Rng> ParticleField<R> {
	/// Create `count` particles scattered over a `width × height` surface,
	/// with every other setting at its default.
	pub fn initialize(width: f64, height: f64, count: usize, rng: R) -> Self {
		Self::with_config(
			width,
			height,
			FieldConfig {
				count,
				..FieldConfig::default()
			},
			rng,
		)
	}

	/// Create a field from a full configuration.
	///
	/// Zero, negative or non-finite dimensions produce a collapsed field
	/// whose particles all sit at the origin; a later [`on_resize`] with real
	/// dimensions lets them spread out again as they get recycled.
	///
	/// [`on_resize`]: Self::on_resize
	pub fn with_config(width: f64, height: f64, config: FieldConfig, rng: R) -> Self {
		let config = config.validated();
		let mut field = Self {
			particles: Vec::with_capacity(config.count),
			width: extent(width),
			height: extent(height),
			config,
			rng,
		};

		for _ in 0..field.config.count {
			let mut p = Particle {
				x: 0.0,
				y: 0.0,
				radius: 0.0,
				vx: 0.0,
				vy: 0.0,
			};
			field.reset_particle(&mut p);
			field.particles.push(p);
		}

		field
	}

	/// Re-randomize position, radius and velocity of `p`.
	pub fn reset_particle(&mut self, p: &mut Particle) {
		let c = &self.config;
		let rng = &mut self.rng;
		// `u * span` keeps empty spans (a zero-sized surface) from panicking
		// the way an empty `random_range` would.
		let mut sample = |min: f64, span: f64| min + rng.random::<f64>() * span;

		p.x = sample(0.0, self.width);
		p.y = sample(0.0, self.height);
		p.radius = sample(c.radius_min, c.radius_max - c.radius_min);
		p.vx = sample(-c.max_speed, 2.0 * c.max_speed);
		p.vy = sample(-c.max_speed, 2.0 * c.max_speed);
	}

	/// Move every particle by its velocity and recycle the ones that left
	/// the surface. Returns how many were recycled.
	pub fn step(&mut self) -> usize {
		let mut particles = std::mem::take(&mut self.particles);
		let mut recycled = 0;

		for p in &mut particles {
			p.x += p.vx;
			p.y += p.vy;

			if !p.is_within(self.width, self.height) {
				self.reset_particle(p);
				recycled += 1;
			}
		}

		self.particles = particles;
		if recycled > 0 {
			trace!("particle field: recycled {} particles", recycled);
		}
		recycled
	}

	/// Clear the surface and draw every particle plus the connection lines.
	pub fn render(&self, surface: &mut impl Surface, colors: &impl ColorSource) {
		let c = &self.config;
		let color = colors.current();

		surface.clear(0.0, 0.0, self.width, self.height);

		for p in &self.particles {
			surface.fill_circle(p.x, p.y, p.radius, color, c.particle_alpha);
		}

		// Plain pairwise scan. Fine for a hundred particles; a much larger
		// population would want a spatial grid here.
		for (i, a) in self.particles.iter().enumerate() {
			for b in &self.particles[i + 1..] {
				let d = a.distance_to(b);
				if let Some(alpha) = connection_alpha(d, c.connection_threshold, c.connection_alpha)
				{
					surface.line(a.x, a.y, b.x, b.y, color, alpha, c.line_width);
				}
			}
		}
	}

	/// One animation frame: [`step`](Self::step) then [`render`](Self::render).
	pub fn advance(&mut self, surface: &mut impl Surface, colors: &impl ColorSource) {
		self.step();
		self.render(surface, colors);
	}

	/// Adopt new surface dimensions.
	///
	/// Particles stay where they are unless `clamp_on_resize` is set, in
	/// which case they are pulled inside the new bounds.
	pub fn on_resize(&mut self, width: f64, height: f64) {
		self.width = extent(width);
		self.height = extent(height);

		if self.config.clamp_on_resize {
			for p in &mut self.particles {
				p.x = p.x.clamp(0.0, self.width);
				p.y = p.y.clamp(0.0, self.height);
			}
		}
	}
}

impl<R> ParticleField<R> {
	/// The current population.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Mutable access for placing particles by hand.
	pub fn particles_mut(&mut self) -> &mut [Particle] {
		&mut self.particles
	}

	/// Population size. Fixed for the life of the field.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether the field was created with no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Surface width after the last resize.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Surface height after the last resize.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// The validated tunables in use.
	pub fn config(&self) -> &FieldConfig {
		&self.config
	}
}
