//! Recording surface used by the unit tests.

use std::cell::Cell;
use std::collections::HashSet;

use super::error::{Error, Result};
use super::surface::{BlendMode, GradientStop, Surface, SurfaceFactory};
use super::theme::Color;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
	Resize(u32, u32),
	Clear,
	FillRect {
		x: f64,
		y: f64,
		width: f64,
		height: f64,
		color: Color,
	},
	RadialGradient {
		cx: f64,
		cy: f64,
		radius: f64,
		stops: Vec<GradientStop>,
	},
	Translate(f64, f64),
	Scale(f64),
	Blend(BlendMode),
	GlobalAlpha(f64),
	Save,
	Restore,
	DrawSurface {
		width: u32,
		height: u32,
		x: f64,
		y: f64,
	},
}

/// Remembers every call made on it instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub width: u32,
	pub height: u32,
	pub ops: Vec<Op>,
	/// Zero-based indices of `draw_surface` calls that should fail.
	pub failing_draws: HashSet<usize>,
	draws: usize,
}

impl RecordingSurface {
	pub fn new(width: u32, height: u32) -> Self {
		Self {
			width,
			height,
			..Default::default()
		}
	}

	pub fn draws(&self) -> Vec<&Op> {
		self.ops
			.iter()
			.filter(|op| matches!(op, Op::DrawSurface { .. }))
			.collect()
	}
}

impl Surface for RecordingSurface {
	fn width(&self) -> u32 {
		self.width
	}

	fn height(&self) -> u32 {
		self.height
	}

	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		self.width = width;
		self.height = height;
		self.ops.push(Op::Resize(width, height));
		Ok(())
	}

	fn clear(&mut self) -> Result<()> {
		self.ops.push(Op::Clear);
		Ok(())
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
		self.ops.push(Op::FillRect {
			x,
			y,
			width,
			height,
			color,
		});
		Ok(())
	}

	fn fill_radial_gradient(
		&mut self,
		cx: f64,
		cy: f64,
		radius: f64,
		stops: &[GradientStop],
	) -> Result<()> {
		self.ops.push(Op::RadialGradient {
			cx,
			cy,
			radius,
			stops: stops.to_vec(),
		});
		Ok(())
	}

	fn translate(&mut self, x: f64, y: f64) -> Result<()> {
		self.ops.push(Op::Translate(x, y));
		Ok(())
	}

	fn scale(&mut self, factor: f64) -> Result<()> {
		self.ops.push(Op::Scale(factor));
		Ok(())
	}

	fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
		self.ops.push(Op::Blend(mode));
		Ok(())
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ops.push(Op::GlobalAlpha(alpha));
	}

	fn save(&mut self) {
		self.ops.push(Op::Save);
	}

	fn restore(&mut self) {
		self.ops.push(Op::Restore);
	}

	fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()> {
		let index = self.draws;
		self.draws += 1;
		if self.failing_draws.contains(&index) {
			return Err(Error::Draw(format!("injected failure on draw {index}")));
		}
		self.ops.push(Op::DrawSurface {
			width: source.width,
			height: source.height,
			x,
			y,
		});
		Ok(())
	}
}

/// Hands out [`RecordingSurface`]s, optionally failing after a number of them.
#[derive(Debug, Default)]
pub struct RecordingFactory {
	pub fail_after: Option<usize>,
	created: Cell<usize>,
}

impl RecordingFactory {
	pub fn failing_after(count: usize) -> Self {
		Self {
			fail_after: Some(count),
			..Default::default()
		}
	}

	pub fn created(&self) -> usize {
		self.created.get()
	}
}

impl SurfaceFactory for RecordingFactory {
	type Surface = RecordingSurface;

	fn create_surface(&self, width: u32, height: u32) -> Result<RecordingSurface> {
		if self.fail_after.is_some_and(|limit| self.created.get() >= limit) {
			return Err(Error::SurfaceAllocation {
				width,
				height,
				reason: "allocation limit reached".into(),
			});
		}
		self.created.set(self.created.get() + 1);
		Ok(RecordingSurface::new(width, height))
	}
}
