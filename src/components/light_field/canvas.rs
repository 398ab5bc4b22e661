//! [`Surface`] backed by an HTML canvas 2D context.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use super::error::{Error, Result};
use super::surface::{BlendMode, GradientStop, Surface, SurfaceFactory};
use super::theme::Color;

/// A canvas element together with its 2D context.
#[derive(Clone, Debug)]
pub struct CanvasSurface {
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
	/// Wrap an existing (possibly on-screen) canvas.
	pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
		let (width, height) = (canvas.width(), canvas.height());
		let alloc_err = |reason: String| Error::SurfaceAllocation {
			width,
			height,
			reason,
		};
		let ctx = canvas
			.get_context("2d")
			.map_err(|e| alloc_err(format!("{e:?}")))?
			.ok_or_else(|| alloc_err("2d context unavailable".into()))?
			.dyn_into::<CanvasRenderingContext2d>()
			.map_err(|_| alloc_err("context is not a CanvasRenderingContext2d".into()))?;
		Ok(Self { canvas, ctx })
	}

	pub fn element(&self) -> &HtmlCanvasElement {
		&self.canvas
	}
}

impl Surface for CanvasSurface {
	fn width(&self) -> u32 {
		self.canvas.width()
	}

	fn height(&self) -> u32 {
		self.canvas.height()
	}

	fn resize(&mut self, width: u32, height: u32) -> Result<()> {
		self.canvas.set_width(width);
		self.canvas.set_height(height);
		Ok(())
	}

	fn clear(&mut self) -> Result<()> {
		self.ctx.save();
		let reset = self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
		if reset.is_ok() {
			self.ctx
				.clear_rect(0.0, 0.0, self.width() as f64, self.height() as f64);
		}
		self.ctx.restore();
		reset.map_err(|e| Error::from_js("clear", e))
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) -> Result<()> {
		self.ctx.set_fill_style_str(&color.to_css());
		self.ctx.fill_rect(x, y, width, height);
		Ok(())
	}

	fn fill_radial_gradient(
		&mut self,
		cx: f64,
		cy: f64,
		radius: f64,
		stops: &[GradientStop],
	) -> Result<()> {
		let gradient = self
			.ctx
			.create_radial_gradient(cx, cy, 0.0, cx, cy, radius)
			.map_err(|e| Error::from_js("create_radial_gradient", e))?;
		for stop in stops {
			gradient
				.add_color_stop(stop.offset as f32, &stop.color.to_css())
				.map_err(|e| Error::from_js("add_color_stop", e))?;
		}

		self.ctx.begin_path();
		self.ctx
			.arc(cx, cy, radius, 0.0, TAU)
			.map_err(|e| Error::from_js("arc", e))?;
		#[allow(deprecated)]
		self.ctx.set_fill_style(&gradient);
		self.ctx.fill();
		Ok(())
	}

	fn translate(&mut self, x: f64, y: f64) -> Result<()> {
		self.ctx
			.translate(x, y)
			.map_err(|e| Error::from_js("translate", e))
	}

	fn scale(&mut self, factor: f64) -> Result<()> {
		self.ctx
			.scale(factor, factor)
			.map_err(|e| Error::from_js("scale", e))
	}

	fn set_blend_mode(&mut self, mode: BlendMode) -> Result<()> {
		self.ctx
			.set_global_composite_operation(mode.as_css())
			.map_err(|e| Error::from_js("set_global_composite_operation", e))
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		self.ctx.set_global_alpha(alpha);
	}

	fn save(&mut self) {
		self.ctx.save();
	}

	fn restore(&mut self) {
		self.ctx.restore();
	}

	fn draw_surface(&mut self, source: &Self, x: f64, y: f64) -> Result<()> {
		self.ctx
			.draw_image_with_html_canvas_element(&source.canvas, x, y)
			.map_err(|e| Error::from_js("draw_image", e))
	}
}

/// Creates detached canvas elements for sprites and composites.
#[derive(Clone, Debug)]
pub struct CanvasFactory {
	document: Document,
}

impl CanvasFactory {
	pub fn new(document: Document) -> Self {
		Self { document }
	}
}

impl SurfaceFactory for CanvasFactory {
	type Surface = CanvasSurface;

	fn create_surface(&self, width: u32, height: u32) -> Result<CanvasSurface> {
		let canvas: HtmlCanvasElement = self
			.document
			.create_element("canvas")
			.map_err(|e| Error::SurfaceAllocation {
				width,
				height,
				reason: format!("{e:?}"),
			})?
			.dyn_into()
			.map_err(|_| Error::SurfaceAllocation {
				width,
				height,
				reason: "created element is not a canvas".into(),
			})?;
		canvas.set_width(width);
		canvas.set_height(height);
		CanvasSurface::new(canvas)
	}
}
