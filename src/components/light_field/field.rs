//! The foreground light band and per-frame compositing.
//!
//! Lights are scattered along one sine wave spanning the viewport width.
//! Toward the horizontal center they grow larger and scatter further from the
//! wave; toward the edges they shrink to specks hugging it.

use std::f64::consts::TAU;

use log::{debug, info, warn};
use rand::Rng;

use super::backdrop::{Backdrop, BackdropConfig};
use super::error::{Error, Result};
use super::light::{Light, LightConfig};
use super::math::{lerp, random_angle, random_choice, random_range, try_fill};
use super::surface::{BlendMode, Surface, SurfaceFactory};
use super::theme::Palette;
use super::types::{FieldConfig, Point, Viewport};

const VARIANCE: (f64, f64) = (50.0, 200.0);
const MIN_RADIUS: f64 = 25.0;
const MAX_RADIUS: f64 = 80.0;
const ALPHA: (f64, f64) = (0.05, 0.6);
const SOFTNESS: (f64, f64) = (0.02, 0.5);

/// Settings for the foreground band.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	pub palette: Palette,
	/// Lights per pixel of viewport width.
	pub density: f64,
	/// Wave amplitude as a fraction of viewport height.
	pub amplitude_ratio: f64,
}

/// What happened during one [`LightField::frame_tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
	pub backdrop_drawn: bool,
	pub drawn: usize,
	pub skipped: usize,
}

/// Vertical spread allowed at a normalized distance from the center.
pub fn variance_range(distance_to_center: f64) -> f64 {
	lerp(distance_to_center, VARIANCE.0, VARIANCE.1)
}

/// Owns the backdrop and the ordered foreground lights.
///
/// Holds the surface factory and random source so the band can be re-laid
/// out at any time.
pub struct LightField<F: SurfaceFactory, R> {
	factory: F,
	rng: R,
	layout: LayoutConfig,
	reset_on_resize: bool,
	backdrop: Backdrop<F::Surface>,
	lights: Vec<Light<F::Surface>>,
	viewport: Viewport,
	theta: f64,
	amplitude: f64,
}

impl<F: SurfaceFactory, R: Rng> LightField<F, R> {
	/// Render the backdrop and lay out the first band for `viewport`.
	pub fn init(config: &FieldConfig, viewport: Viewport, factory: F, mut rng: R) -> Result<Self> {
		let backdrop_config = BackdropConfig::from_field_config(config)?;
		let backdrop = Backdrop::new(&backdrop_config, viewport, &factory, &mut rng)?;
		info!(
			"light field: backdrop {}x{} with {} ambient lights",
			viewport.width,
			viewport.height,
			backdrop.ambient_count()
		);

		let mut field = Self {
			factory,
			rng,
			layout: LayoutConfig {
				palette: backdrop_config.palette,
				density: config.light_density,
				amplitude_ratio: config.amplitude_ratio,
			},
			reset_on_resize: config.reset_on_resize,
			backdrop,
			lights: Vec::new(),
			viewport,
			theta: 0.0,
			amplitude: 0.0,
		};
		field.reset(viewport)?;
		Ok(field)
	}

	/// Replace the whole foreground with a fresh band for `viewport`.
	///
	/// On error the previous band is left in place.
	pub fn reset(&mut self, viewport: Viewport) -> Result<()> {
		let count = (self.layout.density * viewport.width).floor().max(0.0) as usize;
		let theta = random_angle(&mut self.rng);
		let amplitude = self.layout.amplitude_ratio * viewport.height;
		let Point { x: cx, y: cy } = viewport.center();

		let (factory, rng, palette) = (&self.factory, &mut self.rng, &self.layout.palette);
		let lights = try_fill(count, |i| {
			let percent = i as f64 / count as f64;
			let x = percent * viewport.width;
			let distance_to_center = 1.0 - (cx - x).abs() / cx;
			let spread = variance_range(distance_to_center);
			let variance = random_range(rng, -spread, spread);
			let offset = (theta + percent * TAU).sin() * amplitude + variance;

			let radius = random_range(rng, MIN_RADIUS, (MAX_RADIUS * distance_to_center).max(1.0));
			let color = *random_choice(rng, &palette.colors)
				.ok_or_else(|| Error::InvalidParameter("palette has no colors".into()))?;
			let alpha = random_range(rng, ALPHA.0, ALPHA.1);
			let softness = random_range(rng, SOFTNESS.0, SOFTNESS.1);

			Light::new(
				LightConfig {
					position: Point::new(x, cy + offset),
					color,
					alpha,
					softness,
					..LightConfig::new(radius)
				},
				factory,
				rng,
			)
		})?;

		self.lights = lights;
		self.viewport = viewport;
		self.theta = theta;
		self.amplitude = amplitude;
		info!("light field: laid out {} lights", self.lights.len());
		Ok(())
	}

	/// Resize the visible surface.
	///
	/// The backdrop and band keep the layout of the viewport they were built
	/// for unless `reset_on_resize` is configured.
	pub fn on_resize(&mut self, viewport: Viewport, target: &mut F::Surface) -> Result<()> {
		let (width, height) = viewport.pixel_size();
		target.resize(width, height)?;
		debug!("light field: surface resized to {width}x{height}");
		if self.reset_on_resize {
			self.reset(viewport)?;
		}
		Ok(())
	}
}

impl<F: SurfaceFactory, R> LightField<F, R> {
	/// Composite one frame: clear, backdrop, then every light in order.
	///
	/// A light that fails to draw is logged and skipped for this frame only.
	pub fn frame_tick(&mut self, elapsed_ms: f64, target: &mut F::Surface) -> FrameStats {
		let mut stats = FrameStats::default();

		if let Err(e) = target.clear() {
			warn!("light field: clear failed: {e}");
		}
		target.save();
		if let Err(e) = target.set_blend_mode(BlendMode::Lighter) {
			warn!("light field: additive blending unavailable: {e}");
		}

		match self.backdrop.draw(target) {
			Ok(()) => stats.backdrop_drawn = true,
			Err(e) => warn!("light field: backdrop skipped: {e}"),
		}

		for (i, light) in self.lights.iter_mut().enumerate() {
			light.update(elapsed_ms);
			match light.draw(target) {
				Ok(()) => stats.drawn += 1,
				Err(e) => {
					stats.skipped += 1;
					warn!("light field: light {i} skipped: {e}");
				}
			}
		}

		target.restore();
		stats
	}

	pub fn lights(&self) -> &[Light<F::Surface>] {
		&self.lights
	}

	pub fn backdrop(&self) -> &Backdrop<F::Surface> {
		&self.backdrop
	}

	/// The viewport the current band was laid out for.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// Phase of the band's sine wave.
	pub fn theta(&self) -> f64 {
		self.theta
	}

	pub fn amplitude(&self) -> f64 {
		self.amplitude
	}
}
