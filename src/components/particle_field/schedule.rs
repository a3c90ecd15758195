//! Recurring per-frame tasks.
//!
//! A frame task is started once and then runs once per display refresh until
//! its handle is stopped. Two schedulers exist: one backed by
//! `requestAnimationFrame` for the page, and a manual one that only runs
//! frames when told to, for headless runs and tests.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use log::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::Closure;
use web_sys::Window;

use super::error::{FrameError, describe};

/// Starts recurring frame tasks.
pub trait FrameScheduler {
	/// Handle returned for each started task.
	type Handle: FrameHandle;

	/// Run `frame` once per frame from now on.
	fn start(&self, frame: Box<dyn FnMut()>) -> Result<Self::Handle, FrameError>;
}

/// Owns a running frame task.
pub trait FrameHandle {
	/// Cancel the task. It will not run again.
	fn stop(self);

	/// Whether the task will run on a coming frame.
	fn is_running(&self) -> bool;
}

struct ManualTask {
	alive: Rc<Cell<bool>>,
	frame: Box<dyn FnMut()>,
}

/// Runs frames only when [`pump`](Self::pump) is called.
///
/// Cloning yields another view of the same task list.
#[derive(Clone, Default)]
pub struct ManualScheduler {
	tasks: Rc<RefCell<Vec<ManualTask>>>,
}

impl ManualScheduler {
	/// A scheduler with no tasks.
	pub fn new() -> Self {
		Self::default()
	}

	/// Run one frame of every live task. Returns how many ran.
	///
	/// Tasks may stop themselves or start new ones while running; new tasks
	/// get their first frame on the next pump.
	pub fn pump(&self) -> usize {
		let mut running = std::mem::take(&mut *self.tasks.borrow_mut());
		let mut ran = 0;

		for task in &mut running {
			if task.alive.get() {
				(task.frame)();
				ran += 1;
			}
		}

		let mut tasks = self.tasks.borrow_mut();
		running.retain(|t| t.alive.get());
		running.append(&mut *tasks);
		*tasks = running;
		ran
	}

	/// Pump `frames` times in a row.
	pub fn run_frames(&self, frames: usize) {
		for _ in 0..frames {
			self.pump();
		}
	}

	/// Number of tasks that have not been stopped.
	pub fn live_tasks(&self) -> usize {
		self.tasks.borrow().iter().filter(|t| t.alive.get()).count()
	}
}

impl FrameScheduler for ManualScheduler {
	type Handle = ManualHandle;

	fn start(&self, frame: Box<dyn FnMut()>) -> Result<ManualHandle, FrameError> {
		let alive = Rc::new(Cell::new(true));
		self.tasks.borrow_mut().push(ManualTask {
			alive: alive.clone(),
			frame,
		});
		Ok(ManualHandle { alive })
	}
}

/// Handle to a task on a [`ManualScheduler`].
pub struct ManualHandle {
	alive: Rc<Cell<bool>>,
}

impl FrameHandle for ManualHandle {
	fn stop(self) {
		self.alive.set(false);
	}

	fn is_running(&self) -> bool {
		self.alive.get()
	}
}

type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// Schedules frames with `window.requestAnimationFrame`.
pub struct AnimationFrameScheduler {
	window: Window,
}

impl AnimationFrameScheduler {
	/// Fails with [`FrameError::NoWindow`] outside a browser page.
	pub fn new() -> Result<Self, FrameError> {
		web_sys::window()
			.map(|window| Self { window })
			.ok_or(FrameError::NoWindow)
	}
}

impl FrameScheduler for AnimationFrameScheduler {
	type Handle = AnimationFrameHandle;

	fn start(&self, mut frame: Box<dyn FnMut()>) -> Result<AnimationFrameHandle, FrameError> {
		let slot: FrameSlot = Rc::new(RefCell::new(None));
		let request_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let (slot_inner, id_inner, window) = (slot.clone(), request_id.clone(), self.window.clone());

		// The closure re-requests itself through the slot, which forms an Rc
		// cycle until `stop` empties the slot.
		let callback = Closure::<dyn FnMut()>::new(move || {
			frame();
			if let Some(ref cb) = *slot_inner.borrow() {
				match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
					Ok(id) => id_inner.set(Some(id)),
					Err(e) => {
						warn!("frame loop: next frame request failed: {}", describe(&e));
						id_inner.set(None);
					}
				}
			}
		});

		let id = self
			.window
			.request_animation_frame(callback.as_ref().unchecked_ref())
			.map_err(|e| FrameError::Request(describe(&e)))?;
		request_id.set(Some(id));
		*slot.borrow_mut() = Some(callback);
		debug!("frame loop: started");

		Ok(AnimationFrameHandle {
			window: self.window.clone(),
			slot,
			request_id,
		})
	}
}

/// Handle to a `requestAnimationFrame` loop.
///
/// Must not be stopped from inside its own frame callback.
pub struct AnimationFrameHandle {
	window: Window,
	slot: FrameSlot,
	request_id: Rc<Cell<Option<i32>>>,
}

impl FrameHandle for AnimationFrameHandle {
	fn stop(self) {
		if let Some(id) = self.request_id.take() {
			let _ = self.window.cancel_animation_frame(id);
		}
		self.slot.borrow_mut().take();
		debug!("frame loop: stopped");
	}

	fn is_running(&self) -> bool {
		self.request_id.get().is_some()
	}
}
