//! Colors and the light palette.

use super::error::{Error, Result};

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Decode `#rrggbb` or `rrggbb` (either case) into an opaque color.
	pub fn from_hex(hex: &str) -> Result<Self> {
		let digits = hex.strip_prefix('#').unwrap_or(hex);
		let mut rgb = [0u8; 3];
		if digits.len() != 6 {
			return Err(Error::InvalidParameter(format!("malformed color '{hex}'")));
		}
		hex::decode_to_slice(digits, &mut rgb)
			.map_err(|e| Error::InvalidParameter(format!("malformed color '{hex}': {e}")))?;
		Ok(Self::rgb(rgb[0], rgb[1], rgb[2]))
	}

	/// Channels as `[r, g, b, a]` in `0.0..=1.0`.
	pub fn to_unit(self) -> [f64; 4] {
		[
			self.r as f64 / 255.0,
			self.g as f64 / 255.0,
			self.b as f64 / 255.0,
			self.a,
		]
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// The colors lights are drawn from.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
	pub colors: Vec<Color>,
}

impl Palette {
	/// Deep reds through coral to a pale pink.
	pub fn ember() -> Self {
		Self {
			colors: vec![
				Color::rgb(0x4a, 0x02, 0x06), // Oxblood
				Color::rgb(0x71, 0x00, 0x06), // Maroon
				Color::rgb(0xbb, 0x0d, 0x1a), // Crimson
				Color::rgb(0xfa, 0x66, 0x32), // Coral
				Color::rgb(0xcf, 0x06, 0x38), // Raspberry
				Color::rgb(0xef, 0x3e, 0x4d), // Watermelon
				Color::rgb(0xfd, 0xbb, 0xc1), // Blush
			],
		}
	}

	/// Build a palette from hex strings, failing on the first malformed entry.
	pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self> {
		let colors = colors
			.iter()
			.map(|c| Color::from_hex(c.as_ref()))
			.collect::<Result<Vec<_>>>()?;
		if colors.is_empty() {
			return Err(Error::InvalidParameter("palette has no colors".into()));
		}
		Ok(Self { colors })
	}
}

impl Default for Palette {
	fn default() -> Self {
		Self::ember()
	}
}
