//! Colors and theme lookup for the particle background.
//!
//! The field never decides its own color. It asks a [`ColorSource`] once per
//! frame, so the page's light/dark switch (owned elsewhere) recolors the
//! background without the field knowing about it.

use std::cell::RefCell;

use log::debug;
use web_sys::Element;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color from its channels.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with an explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same channels, different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS text for canvas fill and stroke styles.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parse a CSS color value as written in a stylesheet.
	///
	/// Accepts hex (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`) and `rgb()` /
	/// `rgba()` in both the comma form (`rgb(79, 70, 229)`) and the space form
	/// (`rgb(79 70 229 / 50%)`). Channels and alpha may be percentages.
	/// Surrounding whitespace is ignored; custom properties keep the space
	/// after the colon. Named colors, `hsl()` and the like yield `None`.
	pub fn parse_css(value: &str) -> Option<Self> {
		let value = value.trim();

		if let Some(hex) = value.strip_prefix('#') {
			return Self::parse_hex(hex);
		}

		let open = value.find('(')?;
		let name = value[..open].trim().to_ascii_lowercase();
		if name != "rgb" && name != "rgba" {
			return None;
		}
		let body = value[open + 1..].strip_suffix(')')?.trim();

		let (channels, alpha): (Vec<&str>, Option<&str>) = if body.contains(',') {
			let mut parts: Vec<&str> = body.split(',').map(str::trim).collect();
			let alpha = if parts.len() == 4 { parts.pop() } else { None };
			(parts, alpha)
		} else {
			let (rgb, alpha) = match body.split_once('/') {
				Some((rgb, alpha)) => (rgb, Some(alpha.trim())),
				None => (body, None),
			};
			(rgb.split_whitespace().collect(), alpha)
		};

		let [r, g, b] = channels.as_slice() else {
			return None;
		};
		let a = match alpha {
			Some(a) => Self::parse_alpha(a)?,
			None => 1.0,
		};
		Some(Self::rgba(
			Self::parse_channel(r)?,
			Self::parse_channel(g)?,
			Self::parse_channel(b)?,
			a,
		))
	}

	fn parse_channel(s: &str) -> Option<u8> {
		let v = match s.strip_suffix('%') {
			Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0 * 255.0,
			None => s.parse::<f64>().ok()?,
		};
		v.is_finite().then(|| v.round().clamp(0.0, 255.0) as u8)
	}

	fn parse_alpha(s: &str) -> Option<f64> {
		let v = match s.strip_suffix('%') {
			Some(pct) => pct.trim().parse::<f64>().ok()? / 100.0,
			None => s.parse::<f64>().ok()?,
		};
		v.is_finite().then(|| v.clamp(0.0, 1.0))
	}

	fn parse_hex(hex: &str) -> Option<Self> {
		if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
			return None;
		}
		let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
		let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
		match hex.len() {
			3 => Some(Self::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
			4 => Some(Self::rgba(
				nibble(0)?,
				nibble(1)?,
				nibble(2)?,
				nibble(3)? as f64 / 255.0,
			)),
			6 => Some(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
			8 => Some(Self::rgba(
				byte(0)?,
				byte(2)?,
				byte(4)?,
				byte(6)? as f64 / 255.0,
			)),
			_ => None,
		}
	}
}

/// Supplies the accent color used to draw particles and connections.
pub trait ColorSource {
	/// Color for the frame about to be drawn.
	fn current(&self) -> Color;
}

impl ColorSource for Color {
	fn current(&self) -> Color {
		*self
	}
}

/// Light or dark page theme, as set on the root element's `data-theme`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ThemeMode {
	/// Light page background.
	#[default]
	Light,
	/// Dark page background.
	Dark,
}

impl ThemeMode {
	/// Interpret a `data-theme` attribute value. Unknown values mean light,
	/// which is also what the page falls back to with nothing stored.
	pub fn from_attr(value: Option<&str>) -> Self {
		match value.map(str::trim) {
			Some("dark") => Self::Dark,
			_ => Self::Light,
		}
	}
}

/// Fallback palette used when the stylesheet does not expose an accent color.
#[derive(Clone, Debug)]
pub struct Palette {
	/// Palette name, for logs.
	pub name: &'static str,
	/// Particle and line color.
	pub accent: Color,
}

impl Palette {
	/// Indigo accent on a light page.
	pub fn light() -> Self {
		Self {
			name: "light",
			accent: Color::rgb(79, 70, 229),
		}
	}

	/// Softer violet accent that reads on a dark page.
	pub fn dark() -> Self {
		Self {
			name: "dark",
			accent: Color::rgb(167, 139, 250),
		}
	}

	/// Palette matching a page theme.
	pub fn for_mode(mode: ThemeMode) -> Self {
		match mode {
			ThemeMode::Light => Self::light(),
			ThemeMode::Dark => Self::dark(),
		}
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::light()
	}
}

/// Pick the accent color: the stylesheet value when it parses, otherwise the
/// palette accent for `mode`. A missing or blank value counts as unset.
pub fn resolve_accent(css: Option<&str>, mode: ThemeMode) -> Color {
	css.and_then(Color::parse_css)
		.unwrap_or_else(|| Palette::for_mode(mode).accent)
}

/// Reads the accent color from a CSS custom property on the document root.
///
/// Resolved through `getComputedStyle` on every call, so a theme switch is
/// picked up on the next frame. When the property is missing or unparsable
/// the palette accent for the current `data-theme` is used instead.
pub struct ThemeColorSource {
	root: Option<Element>,
	property: String,
	/// Last unparsable value reported, so the log is not flooded every frame.
	rejected: RefCell<Option<String>>,
}

impl ThemeColorSource {
	/// Source reading `property` (e.g. `--accent-color`) from the root element.
	pub fn new(property: impl Into<String>) -> Self {
		let root = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.document_element());
		Self {
			root,
			property: property.into(),
			rejected: RefCell::new(None),
		}
	}

	fn mode(&self) -> ThemeMode {
		let attr = self.root.as_ref().and_then(|r| r.get_attribute("data-theme"));
		ThemeMode::from_attr(attr.as_deref())
	}

	fn css_value(&self) -> Option<String> {
		let root = self.root.as_ref()?;
		let style = web_sys::window()?.get_computed_style(root).ok()??;
		style.get_property_value(&self.property).ok()
	}

	fn report_rejected(&self, value: &str) {
		let mut rejected = self.rejected.borrow_mut();
		if rejected.as_deref() != Some(value) {
			debug!(
				"theme color: cannot parse {} = {:?}, using palette accent",
				self.property, value
			);
			*rejected = Some(value.to_string());
		}
	}
}

impl ColorSource for ThemeColorSource {
	fn current(&self) -> Color {
		let css = self.css_value();
		let css = css.as_deref().map(str::trim).filter(|v| !v.is_empty());
		if let Some(value) = css {
			if Color::parse_css(value).is_none() {
				self.report_rejected(value);
			}
		}
		resolve_accent(css, self.mode())
	}
}
