//! plexus-bg: animated particle background for static marketing pages.
//!
//! This crate provides a WASM-based canvas component that renders a slowly
//! drifting field of dots joined by faint proximity lines, colored from the
//! page's current theme accent.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::particle_field::{FieldConfig, ParticleField, ParticleFieldCanvas};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("plexus-bg: logging initialized");
}

/// Parse a field configuration blob, falling back to defaults on bad input.
pub fn parse_field_config(json_text: &str) -> FieldConfig {
	match serde_json::from_str::<FieldConfig>(json_text) {
		Ok(config) => {
			info!("plexus-bg: loaded config for {} particles", config.count);
			config
		}
		Err(e) => {
			warn!("plexus-bg: failed to parse particle config: {}", e);
			FieldConfig::default()
		}
	}
}

/// Load field configuration from a script element with id="particle-config".
/// Expected format: JSON object with any subset of [`FieldConfig`] keys.
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("particle-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	Some(parse_field_config(&json_text))
}

/// Main application component.
/// Loads the field configuration from the DOM and pins the background behind
/// the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();

	view! {
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<ParticleFieldCanvas config=config fullscreen=true />
	}
}
