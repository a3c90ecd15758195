//! Leptos component hosting the particle background on a canvas.
//!
//! The component sizes a canvas element, builds a [`ParticleField`] for it
//! and drives the field from a `requestAnimationFrame` loop. Resizes of the
//! window are forwarded to the field in fullscreen mode, and the loop is
//! stopped when the page is unloaded. A page parked in the back/forward cache
//! keeps its loop so it animates again when restored. When the canvas has no 2D
//! context the component renders an empty canvas and does nothing else.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info, warn};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, PageTransitionEvent, Window};

use super::config::FieldConfig;
use super::field::ParticleField;
use super::render::Canvas2dSurface;
use super::schedule::{AnimationFrameHandle, AnimationFrameScheduler, FrameHandle, FrameScheduler};
use super::theme::ThemeColorSource;

/// Bundles the field with the surface it draws on and its color source.
struct FieldContext {
	field: ParticleField<SmallRng>,
	surface: Canvas2dSurface,
	colors: ThemeColorSource,
}

fn viewport_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Handle `pagehide`. A `persisted` page is only entering the back/forward
/// cache, where the browser suspends animation frames on its own, so the loop
/// is kept for when it comes back. Otherwise the page is going away and the
/// loop is stopped. Returns whether it was stopped.
fn on_pagehide<H: FrameHandle>(frame_loop: &RefCell<Option<H>>, persisted: bool) -> bool {
	if persisted {
		debug!("particle field: page cached, frame loop kept");
		return false;
	}
	match frame_loop.borrow_mut().take() {
		Some(handle) => {
			handle.stop();
			info!("particle field: page unloading, frame loop stopped");
			true
		}
		None => false,
	}
}

/// Seed for the field's generator; every page load looks different.
fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Renders the animated particle background on a canvas element.
///
/// The canvas sizes itself to its parent container by default; set
/// `fullscreen = true` to pin it behind the page, fill the viewport and
/// follow window resizes. Explicit `width`/`height` override automatic
/// sizing.
#[component]
pub fn ParticleFieldCanvas(
	/// Field tunables; defaults when omitted.
	#[prop(optional)]
	config: FieldConfig,
	/// Pin behind the page and follow the viewport.
	#[prop(default = false)]
	fullscreen: bool,
	/// Fixed canvas width in pixels.
	#[prop(default = None)]
	width: Option<f64>,
	/// Fixed canvas height in pixels.
	#[prop(default = None)]
	height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<FieldContext>>> = Rc::new(RefCell::new(None));
	let frame_loop: Rc<RefCell<Option<AnimationFrameHandle>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let pagehide_cb: Rc<RefCell<Option<Closure<dyn FnMut(PageTransitionEvent)>>>> =
		Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			warn!("particle field: no window, background disabled");
			return;
		};

		let (w, h) = if fullscreen {
			viewport_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w.max(0.0) as u32);
		canvas.set_height(h.max(0.0) as u32);

		let surface = match Canvas2dSurface::acquire(&canvas) {
			Ok(surface) => surface,
			Err(e) => {
				warn!("particle field: {}, background disabled", e);
				return;
			}
		};

		let field = ParticleField::with_config(
			w,
			h,
			config.clone(),
			SmallRng::seed_from_u64(random_seed()),
		);
		info!("particle field: {} particles on {}x{}", field.len(), w, h);
		let colors = ThemeColorSource::new(field.config().color_property.clone());
		*context.borrow_mut() = Some(FieldContext {
			field,
			surface,
			colors,
		});

		if fullscreen {
			let (context_resize, canvas_resize) = (context.clone(), canvas.clone());
			*resize_cb.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(viewport_size) else {
					return;
				};
				canvas_resize.set_width(nw.max(0.0) as u32);
				canvas_resize.set_height(nh.max(0.0) as u32);
				if let Some(ref mut c) = *context_resize.borrow_mut() {
					c.field.on_resize(nw, nh);
				}
				debug!("particle field: resized to {}x{}", nw, nh);
			}));
			if let Some(ref cb) = *resize_cb.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let context_anim = context.clone();
		let frame = Box::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let FieldContext {
					field,
					surface,
					colors,
				} = c;
				field.advance(surface, &*colors);
			}
		});
		match AnimationFrameScheduler::new().and_then(|s| s.start(frame)) {
			Ok(handle) => *frame_loop.borrow_mut() = Some(handle),
			Err(e) => {
				warn!("particle field: {}, background stays static", e);
				return;
			}
		}

		let loop_hide = frame_loop.clone();
		*pagehide_cb.borrow_mut() = Some(Closure::new(move |ev: PageTransitionEvent| {
			on_pagehide(&loop_hide, ev.persisted());
		}));
		if let Some(ref cb) = *pagehide_cb.borrow() {
			let _ = window.add_event_listener_with_callback("pagehide", cb.as_ref().unchecked_ref());
		}
	});

	let style = if fullscreen {
		"display: block; position: fixed; inset: 0; z-index: -1; pointer-events: none;"
	} else {
		"display: block;"
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="particle-field-canvas"
			aria-hidden="true"
			style=style
		/>
	}
}
