//! Geometry and configuration passed into the light field.

use serde::Deserialize;

use super::error::Result;
use super::theme::{Color, Palette};

/// A point in surface coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

/// Size of the visible surface in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn center(&self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}

	/// Whole-pixel dimensions for allocating surfaces.
	pub fn pixel_size(&self) -> (u32, u32) {
		(self.width.max(0.0) as u32, self.height.max(0.0) as u32)
	}
}

/// Page-level settings, read from an optional JSON block in the host page.
///
/// Every field has a default, so `{}` (or no block at all) gives the stock
/// ember field.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
	/// Backdrop fill, `#rrggbb`.
	pub base_color: String,
	/// Colors lights are drawn from, `#rrggbb` each.
	pub palette: Vec<String>,
	/// Foreground lights per pixel of viewport width.
	pub light_density: f64,
	/// Backdrop lights per pixel of viewport width.
	pub backdrop_density: f64,
	/// Half-height of the band backdrop lights are scattered in.
	pub backdrop_band: f64,
	/// Wave amplitude as a fraction of viewport height.
	pub amplitude_ratio: f64,
	/// Re-lay out the foreground when the window is resized.
	pub reset_on_resize: bool,
	/// Fixed RNG seed for reproducible layouts.
	pub seed: Option<u64>,
}

impl Default for FieldConfig {
	fn default() -> Self {
		Self {
			base_color: "#0C0000".into(),
			palette: Palette::ember()
				.colors
				.iter()
				.map(|c| c.to_css())
				.collect(),
			light_density: 0.1,
			backdrop_density: 0.05,
			backdrop_band: 200.0,
			amplitude_ratio: 0.08,
			reset_on_resize: false,
			seed: None,
		}
	}
}

impl FieldConfig {
	pub fn base_color(&self) -> Result<Color> {
		Color::from_hex(&self.base_color)
	}

	pub fn palette(&self) -> Result<Palette> {
		Palette::from_hex(&self.palette)
	}
}
