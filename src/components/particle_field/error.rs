//! Errors at the browser seams.
//!
//! None of these are fatal to the page. The component logs them and leaves
//! the background blank.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// The canvas could not be turned into a drawing surface.
#[derive(Debug, Error)]
pub enum SurfaceError {
	/// `getContext("2d")` returned nothing usable.
	#[error("canvas does not provide a 2d context")]
	NoContext,
	/// `getContext` threw.
	#[error("2d context request failed: {0}")]
	ContextRequest(String),
}

/// The recurring frame task could not be scheduled.
#[derive(Debug, Error)]
pub enum FrameError {
	/// Not running inside a browser page.
	#[error("no browser window available")]
	NoWindow,
	/// `requestAnimationFrame` threw.
	#[error("animation frame request failed: {0}")]
	Request(String),
}

/// Render a thrown JS value for an error message.
pub(crate) fn describe(value: &JsValue) -> String {
	value
		.as_string()
		.unwrap_or_else(|| format!("{:?}", value))
}
