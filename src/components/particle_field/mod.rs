//! Animated particle background.
//!
//! A fixed population of small dots drifts across a canvas; dots that come
//! close are joined by faint lines that fade with distance. The module is
//! split so the simulation can run without a browser:
//! - [`ParticleField`] owns the particles and knows how to step and draw them
//! - [`Surface`] is the drawing capability, with a canvas backend and the
//!   headless [`Raster`]
//! - [`FrameScheduler`] runs the per-frame task, either from
//!   `requestAnimationFrame` or manually
//! - [`ParticleFieldCanvas`] wires all of it into the page
//!
//! # Example
//!
//! ```
//! use plexus_bg::components::particle_field::{
//!     Color, FrameHandle, FrameScheduler, ManualScheduler, ParticleField, Raster,
//! };
//! use rand::SeedableRng;
//! use rand::rngs::SmallRng;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let field = ParticleField::initialize(320.0, 240.0, 100, SmallRng::seed_from_u64(7));
//! let raster = Rc::new(RefCell::new(Raster::new(320, 240)));
//! let state = Rc::new(RefCell::new(field));
//!
//! let scheduler = ManualScheduler::new();
//! let (s, r) = (state.clone(), raster.clone());
//! let handle = scheduler
//!     .start(Box::new(move || {
//!         s.borrow_mut().advance(&mut *r.borrow_mut(), &Color::rgb(80, 70, 230));
//!     }))
//!     .unwrap();
//!
//! scheduler.run_frames(60);
//! handle.stop();
//! assert_eq!(state.borrow().len(), 100);
//! ```

mod component;
pub mod config;
mod error;
mod field;
mod raster;
mod render;
mod schedule;
mod surface;
pub mod theme;

pub use component::ParticleFieldCanvas;
pub use config::FieldConfig;
pub use error::{FrameError, SurfaceError};
pub use field::{Particle, ParticleField, connection_alpha};
pub use raster::Raster;
pub use render::Canvas2dSurface;
pub use schedule::{
	AnimationFrameHandle, AnimationFrameScheduler, FrameHandle, FrameScheduler, ManualHandle,
	ManualScheduler,
};
pub use surface::Surface;
pub use theme::{Color, ColorSource, Palette, ThemeColorSource, ThemeMode, resolve_accent};
