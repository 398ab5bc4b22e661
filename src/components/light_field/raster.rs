//! Software [`Surface`] for headless rendering.
//!
//! Pixels are stored as premultiplied RGBA in `0.0..=1.0`. Only translation
//! and uniform scale are supported, so every transformed rectangle stays axis
//! aligned. Blits sample the source nearest-neighbour.

use super::error::{Error, Result};
use super::surface::{BlendMode, GradientStop, Surface, SurfaceFactory};
use super::theme::Color;

/// Largest side length a raster surface may have.
pub const MAX_DIMENSION: u32 = 16_384;

type Pixel = [f32; 4];

#[derive(Clone, Copy, Debug)]
struct DrawState {
	tx: f64,
	ty: f64,
	scale: f64,
	alpha: f64,
	blend: BlendMode,
}

impl Default for DrawState {
	fn default() -> Self {
		Self {
			tx: 0.0,
			ty: 0.0,
			scale: 1.0,
			alpha: 1.0,
			blend: BlendMode::SourceOver,
		}
	}
}

impl DrawState {
	fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
		(self.tx + x * self.scale, self.ty + y * self.scale)
	}

	fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
		((x - self.tx) / self.scale, (y - self.ty) / self.scale)
	}
}

/// An in-memory raster image.
#[derive(Clone, Debug)]
pub struct RasterSurface {
	width: u32,
	height: u32,
	pixels: Vec<Pixel>,
	state: DrawState,
	stack: Vec<DrawState>,
}

impl RasterSurface {
	pub fn new(width: u32, height: u32) -> Result<Self> {
		Ok(Self {
			width,
			height,
			pixels: allocate(width, height)?,
			state: DrawState::default(),
			stack: Vec::new(),
		})
	}

	/// Premultiplied RGBA at `(x, y)`.
	pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
		if x >= self.width || y >= self.height {
			return None;
		}
		Some(self.pixels[(y * self.width + x) as usize])
	}

	fn blend_at(&mut self, x: i64, y: i64, src: Pixel) {
		if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
			return;
		}
		let dst = &mut self.pixels[(y as u32 * self.width + x as u32) as usize];
		match self.state.blend {
			BlendMode::SourceOver => {
				let keep = 1.0 - src[3];
				for i in 0..4 {
					dst[i] = src[i] + dst[i] * keep;
				}
			}
			BlendMode::Lighter => {
				for i in 0..4 {
					dst[i] = (src[i] + dst[i]).min(1.0);
				}
			}
		}
	}

	/// Device pixel indices whose centers fall inside `[x0, x1) x [y0, y1)`.
	fn covered(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> (i64, i64, i64, i64) {
		let first = |v: f64| (v - 0.5).ceil().max(0.0) as i64;
		let end = |v: f64, limit: u32| ((v - 0.5).ceil().max(0.0) as i64).min(limit as i64);
		(first(x0), first(y0), end(x1, self.width), end(y1, self.height))
	}
}

fn allocate(width: u32, height: u32) -> Result<Vec<Pixel>> {
	if width > MAX_DIMENSION || height > MAX_DIMENSION {
		return Err(Error::SurfaceAllocation {
			width,
			height,
			reason: format!("exceeds {MAX_DIMENSION} pixels per side"),
		});
	}
	Ok(vec![[0.0; 4]; width as usize * height as usize])
}

fn premultiply(color: Color, alpha: f64) -> Pixel {
	let [r, g, b, a] = color.to_unit();
	let a = a * alpha;
	[(r * a) as f32, (g * a) as f32, (b * a) as f32, a as f32]
}

fn gradient_at(stops: &[GradientStop], t: f64) -> Pixel {
	let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
		return [0.0; 4];
	};
	if t <= first.offset {
		return premultiply(first.color, 1.0);
	}
	if t >= last.offset {
		return premultiply(last.color, 1.0);
	}
	for pair in stops.windows(2) {
		let (a, b) = (pair[0], pair[1]);
		if t >= a.offset && t <= b.offset {
			let span = b.offset - a.offset;
			let f = if span <= 0.0 {
				1.0
			} else {
				((t - a.offset) / span) as f32
			};
			let (pa, pb) = (premultiply(a.color, 1.0), premultiply(b.color, 1.0));
			return std::array::from_fn(|i| pa[i] + (pb[i] - pa[i]) * f);
		}
	}
	premultiply(last.color, 1.0)
}

impl Surface for RasterSurface {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}

	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		self.pixels = allocate(width, height)?;
		self.width = width;
		self.height = height;
		self.state = DrawState::default();
		self.stack.clear();
		Ok(())
	}

	fn clear(&mut self) -> Result<()> {
		self.pixels.fill([0.0; 4]);
		Ok(())
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
		let (x0, y0) = self.state.to_device(x, y);
		let (x1, y1) = self.state.to_device(x + width, y + height);
		let src = premultiply(color, self.state.alpha);
		let (px0, py0, px1, py1) = self.covered(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1));
		for py in py0..py1 {
			for px in px0..px1 {
				self.blend_at(px, py, src);
			}
		}
		Ok(())
	}

	fn fill_radial_gradient(
		&mut self,
		cx: f64,
		cy: f64,
		radius: f64,
		stops: &[GradientStop],
	) -> Result<()> {
		if radius <= 0.0 {
			return Err(Error::Draw(format!("gradient radius {radius} must be positive")));
		}
		let (dcx, dcy) = self.state.to_device(cx, cy);
		let r = radius * self.state.scale;
		let alpha = self.state.alpha as f32;
		let (px0, py0, px1, py1) = self.covered(dcx - r, dcy - r, dcx + r, dcy + r);
		for py in py0..py1 {
			for px in px0..px1 {
				let (dx, dy) = (px as f64 + 0.5 - dcx, py as f64 + 0.5 - dcy);
				let t = (dx * dx + dy * dy).sqrt() / r;
				if t > 1.0 {
					continue;
				}
				let src = gradient_at(stops, t).map(|c| c * alpha);
				self.blend_at(px, py, src);
			}
		}
		Ok(())
	}

	fn translate(&mut self, x: f64, y: f64) -> Result<()> {
		let (tx, ty) = self.state.to_device(x, y);
		self.state.tx = tx;
		self.state.ty = ty;
		Ok(())
	}

	fn scale(&mut self, factor: f64) -> Result<()> {
		if !(factor.is_finite() && factor > 0.0) {
			return Err(Error::Draw(format!("unsupported scale {factor}")));
		}
		self.state.scale *= factor;
		Ok(())
	}

	fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
		self.state.blend = mode;
		Ok(())
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.state.alpha = alpha.clamp(0.0, 1.0);
	}

	fn save(&mut self) {
		self.stack.push(self.state);
	}

	fn restore(&mut self) {
		if let Some(state) = self.stack.pop() {
			self.state = state;
		}
	}

	fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()> {
		let (x0, y0) = self.state.to_device(x, y);
		let (x1, y1) =
			self.state
				.to_device(x + source.width as f64, y + source.height as f64);
		let alpha = self.state.alpha as f32;
		let (px0, py0, px1, py1) = self.covered(x0, y0, x1, y1);
		for py in py0..py1 {
			for px in px0..px1 {
				let (lx, ly) = self.state.to_local(px as f64 + 0.5, py as f64 + 0.5);
				let (sx, sy) = ((lx - x).floor(), (ly - y).floor());
				if sx < 0.0 || sy < 0.0 {
					continue;
				}
				let Some(src) = source.pixel(sx as u32, sy as u32) else {
					continue;
				};
				if src[3] <= 0.0 {
					continue;
				}
				self.blend_at(px, py, src.map(|c| c * alpha));
			}
		}
		Ok(())
	}
}

/// Allocates [`RasterSurface`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RasterFactory;

impl SurfaceFactory for RasterFactory {
	type Surface = RasterSurface;

	fn create_surface(&self, width: u32, height: u32) -> Result<RasterSurface> {
		RasterSurface::new(width, height)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn close(a: f32, b: f32) -> bool {
		(a - b).abs() < 1e-4
	}

	#[test]
	fn oversized_surface_is_an_allocation_failure() {
		let err = RasterSurface::new(MAX_DIMENSION + 1, 4).unwrap_err();
		assert!(matches!(err, Error::SurfaceAllocation { width, .. } if width == MAX_DIMENSION + 1));
	}

	#[test]
	fn fill_rect_respects_transform() {
		let mut s = RasterSurface::new(8, 8).unwrap();
		s.translate(2.0, 2.0).unwrap();
		s.scale(2.0).unwrap();
		s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgb(255, 0, 0)).unwrap();
		assert_eq!(s.pixel(2, 2), Some([1.0, 0.0, 0.0, 1.0]));
		assert_eq!(s.pixel(3, 3), Some([1.0, 0.0, 0.0, 1.0]));
		assert_eq!(s.pixel(4, 4), Some([0.0; 4]));
		assert_eq!(s.pixel(1, 1), Some([0.0; 4]));
	}

	#[test]
	fn lighter_blending_adds_and_saturates() {
		let mut s = RasterSurface::new(1, 1).unwrap();
		s.set_blend_mode(BlendMode::Lighter).unwrap();
		let half = Color::rgba(255, 0, 0, 0.4);
		s.fill_rect(0.0, 0.0, 1.0, 1.0, half).unwrap();
		s.fill_rect(0.0, 0.0, 1.0, 1.0, half).unwrap();
		let p = s.pixel(0, 0).unwrap();
		assert!(close(p[0], 0.8) && close(p[3], 0.8));
		s.fill_rect(0.0, 0.0, 1.0, 1.0, half).unwrap();
		assert!(close(s.pixel(0, 0).unwrap()[0], 1.0));
	}

	#[test]
	fn source_over_replaces_with_opaque_color() {
		let mut s = RasterSurface::new(1, 1).unwrap();
		s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgb(0, 0, 255)).unwrap();
		s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgb(0, 255, 0)).unwrap();
		assert_eq!(s.pixel(0, 0), Some([0.0, 1.0, 0.0, 1.0]));
	}

	#[test]
	fn save_restore_round_trips_state() {
		let mut s = RasterSurface::new(4, 4).unwrap();
		s.save();
		s.translate(3.0, 3.0).unwrap();
		s.set_global_alpha(0.5);
		s.restore();
		s.fill_rect(0.0, 0.0, 1.0, 1.0, Color::rgb(255, 255, 255)).unwrap();
		assert_eq!(s.pixel(0, 0), Some([1.0; 4]));
		s.restore();
	}

	#[test]
	fn gradient_interpolates_between_stops() {
		let mut s = RasterSurface::new(101, 1).unwrap();
		let stops = [
			GradientStop::new(0.0, Color::rgba(0, 0, 0, 0.0)),
			GradientStop::new(1.0, Color::rgb(255, 255, 255)),
		];
		s.fill_radial_gradient(0.0, 0.5, 100.0, &stops).unwrap();
		let mid = s.pixel(50, 0).unwrap();
		assert!(close(mid[3], 0.505), "{mid:?}");
		assert_eq!(s.pixel(100, 0), Some([0.0; 4]));
	}

	#[test]
	fn draw_surface_applies_global_alpha_and_offset() {
		let mut sprite = RasterSurface::new(2, 2).unwrap();
		sprite.fill_rect(0.0, 0.0, 2.0, 2.0, Color::rgb(255, 255, 255)).unwrap();
		let mut target = RasterSurface::new(4, 4).unwrap();
		target.set_global_alpha(0.5);
		target.draw_surface(&sprite, 1.0, 1.0).unwrap();
		assert_eq!(target.pixel(0, 0), Some([0.0; 4]));
		assert_eq!(target.pixel(1, 1), Some([0.5; 4]));
		assert_eq!(target.pixel(2, 2), Some([0.5; 4]));
		assert_eq!(target.pixel(3, 3), Some([0.0; 4]));
	}

	#[test]
	fn resize_reallocates_and_clears() {
		let mut s = RasterSurface::new(2, 2).unwrap();
		s.fill_rect(0.0, 0.0, 2.0, 2.0, Color::rgb(255, 255, 255)).unwrap();
		s.resize(3, 1).unwrap();
		assert_eq!((s.width(), s.height()), (3, 1));
		assert_eq!(s.pixel(0, 0), Some([0.0; 4]));
		assert_eq!(s.pixel(0, 1), None);
	}
}
