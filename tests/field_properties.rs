//! Behavioral checks for the particle field against a recording surface and
//! the headless rasterizer.

use std::cell::RefCell;
use std::rc::Rc;

use plexus_bg::components::particle_field::{
	Color, FieldConfig, FrameHandle, FrameScheduler, ManualScheduler, Particle, ParticleField,
	Raster, Surface,
};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::SmallRng;

const ACCENT: Color = Color::rgb(79, 70, 229);

#[derive(Debug, Clone, PartialEq)]
enum Op {
	Clear(f64, f64, f64, f64),
	Circle { x: f64, y: f64, radius: f64, alpha: f64 },
	Line { from: (f64, f64), to: (f64, f64), alpha: f64 },
}

/// Records every draw call instead of rasterizing.
#[derive(Default)]
struct Recorder {
	ops: Vec<Op>,
}

impl Recorder {
	fn lines(&self) -> Vec<&Op> {
		self.ops.iter().filter(|op| matches!(op, Op::Line { .. })).collect()
	}

	fn circles(&self) -> usize {
		self.ops.iter().filter(|op| matches!(op, Op::Circle { .. })).count()
	}
}

impl Surface for Recorder {
	fn clear(&mut self, x: f64, y: f64, width: f64, height: f64) {
		self.ops.push(Op::Clear(x, y, width, height));
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64, _color: Color, alpha: f64) {
		self.ops.push(Op::Circle { x, y, radius, alpha });
	}

	fn line(
		&mut self,
		x1: f64,
		y1: f64,
		x2: f64,
		y2: f64,
		_color: Color,
		alpha: f64,
		_line_width: f64,
	) {
		self.ops.push(Op::Line {
			from: (x1, y1),
			to: (x2, y2),
			alpha,
		});
	}
}

fn seeded(width: f64, height: f64, count: usize, seed: u64) -> ParticleField<SmallRng> {
	ParticleField::initialize(width, height, count, SmallRng::seed_from_u64(seed))
}

fn still(x: f64, y: f64) -> Particle {
	Particle {
		x,
		y,
		radius: 2.0,
		vx: 0.0,
		vy: 0.0,
	}
}

#[test]
fn initialize_scatters_particles_over_surface() {
	let field = seeded(800.0, 600.0, 100, 1);
	assert_eq!(field.len(), 100);
	assert!(
		field
			.particles()
			.iter()
			.all(|p| (0.0..800.0).contains(&p.x) && (0.0..600.0).contains(&p.y))
	);
}

#[test]
fn population_is_constant_across_frames() {
	let mut field = seeded(200.0, 150.0, 100, 2);
	let mut surface = Recorder::default();
	for _ in 0..2_000 {
		field.advance(&mut surface, &ACCENT);
		assert_eq!(field.len(), 100);
	}
}

#[test]
fn crossing_the_right_edge_recycles() {
	let mut field = seeded(800.0, 600.0, 1, 3);
	field.particles_mut()[0] = Particle {
		x: 799.9,
		y: 300.0,
		radius: 2.0,
		vx: 0.2,
		vy: 0.0,
	};

	assert_eq!(field.step(), 1);
	let p = &field.particles()[0];
	assert!((0.0..800.0).contains(&p.x));
	assert!((0.0..600.0).contains(&p.y));
	assert!((1.0..4.0).contains(&p.radius));
	assert!((-0.2..0.2).contains(&p.vx) && (-0.2..0.2).contains(&p.vy));
}

#[test]
fn staying_inside_just_moves() {
	let mut field = seeded(800.0, 600.0, 1, 3);
	field.particles_mut()[0] = Particle {
		x: 799.0,
		y: 300.0,
		radius: 2.0,
		vx: 0.2,
		vy: 0.0,
	};

	assert_eq!(field.step(), 0);
	assert!((field.particles()[0].x - 799.2).abs() < 1e-9);
	assert_eq!(field.particles()[0].y, 300.0);
}

#[test]
fn recycled_positions_are_uniform() {
	// Push every particle out of the surface each frame and bucket where the
	// recycled ones land.
	let (w, h) = (100.0, 100.0);
	let mut field = seeded(w, h, 50, 4);
	let mut buckets = [[0usize; 4]; 4];
	let mut samples = 0;

	for _ in 0..400 {
		for p in field.particles_mut() {
			p.x = w + 1.0;
		}
		assert_eq!(field.step(), 50);
		for p in field.particles() {
			buckets[(p.x / 25.0) as usize][(p.y / 25.0) as usize] += 1;
			samples += 1;
		}
	}

	let expected = samples as f64 / 16.0;
	for row in buckets {
		for count in row {
			let deviation = (count as f64 - expected).abs() / expected;
			assert!(deviation < 0.15, "bucket {} vs expected {}", count, expected);
		}
	}
}

#[test]
fn reset_domains_hold_over_many_samples() {
	let mut field = seeded(640.0, 480.0, 10, 5);
	let mut p = still(0.0, 0.0);
	let (mut min_r, mut max_r) = (f64::MAX, f64::MIN);
	let (mut min_v, mut max_v) = (f64::MAX, f64::MIN);

	for _ in 0..10_000 {
		field.reset_particle(&mut p);
		assert!((1.0..4.0).contains(&p.radius));
		assert!((-0.2..0.2).contains(&p.vx));
		assert!((-0.2..0.2).contains(&p.vy));
		min_r = min_r.min(p.radius);
		max_r = max_r.max(p.radius);
		min_v = min_v.min(p.vx);
		max_v = max_v.max(p.vx);
	}

	// The ranges are actually used, not just respected.
	assert!(min_r < 1.05 && max_r > 3.95);
	assert!(min_v < -0.19 && max_v > 0.19);
}

#[test]
fn close_pair_gets_a_faded_line() {
	let mut field = seeded(800.0, 600.0, 2, 6);
	field.particles_mut()[0] = still(0.0, 0.0);
	field.particles_mut()[1] = still(100.0, 0.0);

	let mut surface = Recorder::default();
	field.render(&mut surface, &ACCENT);

	let lines = surface.lines();
	assert_eq!(lines.len(), 1);
	match lines[0] {
		Op::Line { from, to, alpha } => {
			assert_eq!((*from, *to), ((0.0, 0.0), (100.0, 0.0)));
			assert!((alpha - 0.0667).abs() < 1e-3);
		}
		_ => unreachable!(),
	}
}

#[test]
fn distant_pair_is_not_connected() {
	let mut field = seeded(800.0, 600.0, 2, 6);
	field.particles_mut()[0] = still(0.0, 0.0);
	field.particles_mut()[1] = still(200.0, 0.0);

	let mut surface = Recorder::default();
	field.render(&mut surface, &ACCENT);
	assert!(surface.lines().is_empty());
	assert_eq!(surface.circles(), 2);
}

#[test]
fn pair_exactly_at_threshold_is_not_connected() {
	let mut field = seeded(800.0, 600.0, 2, 6);
	field.particles_mut()[0] = still(10.0, 10.0);
	field.particles_mut()[1] = still(160.0, 10.0);

	let mut surface = Recorder::default();
	field.render(&mut surface, &ACCENT);
	assert!(surface.lines().is_empty());
}

#[test]
fn every_close_pair_is_drawn_once() {
	let field = seeded(400.0, 300.0, 60, 7);
	let mut surface = Recorder::default();
	field.render(&mut surface, &ACCENT);

	let ps = field.particles();
	let mut expected = 0;
	for i in 0..ps.len() {
		for j in i + 1..ps.len() {
			if ps[i].distance_to(&ps[j]) < 150.0 {
				expected += 1;
			}
		}
	}
	assert_eq!(surface.lines().len(), expected);

	// Opacity only depends on distance, and falls as distance grows.
	let mut by_distance: Vec<(f64, f64)> = surface
		.lines()
		.into_iter()
		.map(|op| match op {
			Op::Line { from, to, alpha } => {
				let d = ((from.0 - to.0).powi(2) + (from.1 - to.1).powi(2)).sqrt();
				(d, *alpha)
			}
			_ => unreachable!(),
		})
		.collect();
	by_distance.sort_by(|a, b| a.0.total_cmp(&b.0));
	for pair in by_distance.windows(2) {
		assert!(pair[1].1 <= pair[0].1 + 1e-12);
	}
}

#[test]
fn frame_starts_with_a_full_clear() {
	let field = seeded(320.0, 200.0, 5, 8);
	let mut surface = Recorder::default();
	field.render(&mut surface, &ACCENT);
	assert_eq!(surface.ops[0], Op::Clear(0.0, 0.0, 320.0, 200.0));
	assert_eq!(surface.circles(), 5);
}

#[test]
fn resize_is_idempotent_and_leaves_particles() {
	let mut field = seeded(800.0, 600.0, 100, 9);
	let before = field.particles().to_vec();

	field.on_resize(400.0, 300.0);
	field.on_resize(400.0, 300.0);

	assert_eq!((field.width(), field.height()), (400.0, 300.0));
	assert_eq!(field.particles(), before.as_slice());
}

#[test]
fn resize_heals_a_degenerate_field() {
	let mut field = seeded(0.0, 0.0, 20, 10);
	field.on_resize(300.0, 200.0);

	// Everything starts collapsed at the origin and drifts; anything moving
	// into negative space is recycled over the real surface.
	for _ in 0..50 {
		field.step();
	}
	assert!(field.particles().iter().all(|p| p.is_within(300.0, 200.0)));
	assert!(field.particles().iter().any(|p| p.x > 1.0 || p.y > 1.0));
}

#[test]
fn clamp_on_resize_pulls_particles_inside() {
	let config = FieldConfig {
		count: 100,
		clamp_on_resize: true,
		..FieldConfig::default()
	};
	let mut field = ParticleField::with_config(800.0, 600.0, config, SmallRng::seed_from_u64(11));
	field.on_resize(50.0, 40.0);
	assert!(field.particles().iter().all(|p| p.is_within(50.0, 40.0)));
}

#[test]
fn scheduled_loop_renders_until_stopped() {
	let field = Rc::new(RefCell::new(seeded(160.0, 120.0, 30, 12)));
	let raster = Rc::new(RefCell::new(Raster::new(160, 120)));
	let frames = Rc::new(RefCell::new(0usize));

	let scheduler = ManualScheduler::new();
	let (f, r, n) = (field.clone(), raster.clone(), frames.clone());
	let handle = scheduler
		.start(Box::new(move || {
			f.borrow_mut().advance(&mut *r.borrow_mut(), &ACCENT);
			*n.borrow_mut() += 1;
		}))
		.unwrap();

	scheduler.run_frames(30);
	assert_eq!(*frames.borrow(), 30);
	assert!(raster.borrow().painted() > 0);

	handle.stop();
	scheduler.run_frames(30);
	assert_eq!(*frames.borrow(), 30);
	assert_eq!(field.borrow().len(), 30);
}

#[test]
fn raster_shows_particles_and_lines() {
	let mut field = seeded(100.0, 20.0, 2, 13);
	field.particles_mut()[0] = still(10.5, 10.5);
	field.particles_mut()[1] = still(90.5, 10.5);

	let mut raster = Raster::new(100, 20);
	field.render(&mut raster, &ACCENT);

	// Dots are drawn at the particle alpha (sampled just off the line), the
	// midpoint of the connecting line at its faded alpha.
	let dot = raster.pixel(10, 9).unwrap();
	assert!((dot[3] - 0.5).abs() < 1e-6);
	let mid = raster.pixel(50, 10).unwrap();
	let expected = (1.0 - 80.0 / 150.0) * 0.2;
	assert!((mid[3] as f64 - expected).abs() < 1e-6);
	assert_eq!(raster.pixel(50, 2), Some([0.0; 4]));
}

#[test]
fn seeded_fields_render_identically() {
	let mut a = seeded(120.0, 90.0, 40, 99);
	let mut b = seeded(120.0, 90.0, 40, 99);
	let (mut ra, mut rb) = (Raster::new(120, 90), Raster::new(120, 90));

	for _ in 0..100 {
		a.advance(&mut ra, &ACCENT);
		b.advance(&mut rb, &ACCENT);
	}
	assert_eq!(ra.to_rgba8(), rb.to_rgba8());
}
