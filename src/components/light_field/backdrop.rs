//! Static background wash.
//!
//! A single viewport-sized composite: the base color with a band of large,
//! barely visible lights baked in. It is rendered once and then only blitted.

use rand::Rng;

use super::error::{Error, Result};
use super::light::{Light, LightConfig};
use super::math::{random_below, random_choice, random_range};
use super::surface::{BlendMode, Surface, SurfaceFactory};
use super::theme::{Color, Palette};
use super::types::{FieldConfig, Point, Viewport};

const RADIUS: (f64, f64) = (200.0, 400.0);
const ALPHA: (f64, f64) = (0.01, 0.05);
const SOFTNESS: (f64, f64) = (0.25, 0.9);

/// Settings for [`Backdrop`].
#[derive(Clone, Debug, PartialEq)]
pub struct BackdropConfig {
	pub base_color: Color,
	pub palette: Palette,
	/// Ambient lights per pixel of viewport width.
	pub density: f64,
	/// Vertical half-extent of the band around the viewport center.
	pub band: f64,
}

impl Default for BackdropConfig {
	fn default() -> Self {
		Self {
			base_color: Color::rgb(0x0c, 0x00, 0x00),
			palette: Palette::ember(),
			density: 0.05,
			band: 200.0,
		}
	}
}

impl BackdropConfig {
	pub fn from_field_config(config: &FieldConfig) -> Result<Self> {
		Ok(Self {
			base_color: config.base_color()?,
			palette: config.palette()?,
			density: config.backdrop_density,
			band: config.backdrop_band,
		})
	}
}

/// The pre-rendered background composite.
#[derive(Debug)]
pub struct Backdrop<S> {
	composite: S,
	ambient_count: usize,
}

impl<S: Surface> Backdrop<S> {
	/// Render the composite for `viewport`. Later viewport changes are not observed.
	///
	/// The first light that fails to build aborts the whole backdrop.
	pub fn new<F, R>(config: &BackdropConfig, viewport: Viewport, factory: &F, rng: &mut R) -> Result<Self>
	where
		F: SurfaceFactory<Surface = S>,
		R: Rng + ?Sized,
	{
		let (width, height) = viewport.pixel_size();
		let Point { y: center_y, .. } = viewport.center();
		let count = (config.density * viewport.width).floor().max(0.0) as usize;

		let mut composite = factory.create_surface(width, height)?;
		composite.set_blend_mode(BlendMode::Lighter)?;
		composite.fill_rect(0.0, 0.0, width as f64, height as f64, config.base_color)?;

		for _ in 0..count {
			let radius = random_range(rng, RADIUS.0, RADIUS.1);
			let alpha = random_range(rng, ALPHA.0, ALPHA.1);
			let color = *random_choice(rng, &config.palette.colors)
				.ok_or_else(|| Error::InvalidParameter("palette has no colors".into()))?;
			let softness = random_range(rng, SOFTNESS.0, SOFTNESS.1);

			let light = Light::new(
				LightConfig {
					radius,
					color,
					alpha,
					softness,
					twinkle: false,
					..LightConfig::new(radius)
				},
				factory,
				rng,
			)?;

			let half = light.sprite().width() as f64 / 2.0;
			let x = random_below(rng, viewport.width) - half;
			let y = center_y - half + random_range(rng, -config.band, config.band);
			composite.draw_surface(light.sprite(), x, y)?;
		}

		Ok(Self {
			composite,
			ambient_count: count,
		})
	}

	/// Blit the composite at the origin.
	pub fn draw(&self, target: &mut S) -> Result<()> {
		target.draw_surface(&self.composite, 0.0, 0.0)
	}

	/// Number of ambient lights baked into the composite.
	pub fn ambient_count(&self) -> usize {
		self.ambient_count
	}

	pub fn composite(&self) -> &S {
		&self.composite
	}

	pub fn size(&self) -> (u32, u32) {
		(self.composite.width(), self.composite.height())
	}
}
