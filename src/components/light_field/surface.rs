//! The drawing capabilities the light field needs from its host.
//!
//! Lights, the backdrop and the visible target are all [`Surface`]s. Off-screen
//! surfaces are created through a [`SurfaceFactory`], so the same engine runs
//! against an HTML canvas in the browser or the software rasterizer headless.

use super::error::Result;
use super::theme::Color;

/// How source pixels combine with what is already on the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
	/// Standard alpha compositing.
	#[default]
	SourceOver,
	/// Additive: overlapping draws sum their intensities ("lighter").
	Lighter,
}

impl BlendMode {
	/// The canvas `globalCompositeOperation` name.
	pub fn as_css(self) -> &'static str {
		match self {
			BlendMode::SourceOver => "source-over",
			BlendMode::Lighter => "lighter",
		}
	}
}

/// One stop of a radial gradient; `offset` runs from the center (0) to the rim (1).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
	pub offset: f64,
	pub color: Color,
}

impl GradientStop {
	pub const fn new(offset: f64, color: Color) -> Self {
		Self { offset, color }
	}
}

/// A 2D raster surface with a canvas-like state machine.
///
/// Transform, global alpha and blend mode are "style state": [`Surface::save`]
/// pushes it, [`Surface::restore`] pops it.
pub trait Surface {
	fn width(&self) -> u32;
	fn height(&self) -> u32;

	/// Resize the surface. Contents and style state are reset.
	fn resize(&mut self, width: u32, height: u32) -> Result<()>;

	/// Erase every pixel to transparent, ignoring the current transform.
	fn clear(&mut self) -> Result<()>;

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()>;

	/// Fill the disc of `radius` around `(cx, cy)` with a radial gradient.
	/// `stops` are ordered by offset.
	fn fill_radial_gradient(
		&mut self,
		cx: f64,
		cy: f64,
		radius: f64,
		stops: &[GradientStop],
	) -> Result<()>;

	fn translate(&mut self, x: f64, y: f64) -> Result<()>;
	fn scale(&mut self, factor: f64) -> Result<()>;
	fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()>;
	fn set_global_alpha(&mut self, alpha: f64);
	fn save(&mut self);
	fn restore(&mut self);

	/// Blit the whole of `source` with its top-left corner at `(x, y)`.
	fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()>;
}

/// Allocates off-screen surfaces.
pub trait SurfaceFactory {
	type Surface: Surface;

	fn create_surface(&self, width: u32, height: u32) -> Result<Self::Surface>;
}
