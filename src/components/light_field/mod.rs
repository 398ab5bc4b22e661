//! Drifting-firefly light field.
//!
//! Renders a band of soft glow sprites over a static tinted backdrop:
//! - Each [`Light`] pre-renders a radial gradient sprite once and blits it
//!   every frame, optionally pulsing in size and opacity ("twinkle")
//! - A [`Backdrop`] bakes a wash of large, faint lights into one composite
//! - [`LightField`] scatters the foreground lights along a sine wave and
//!   composites everything additively once per display frame
//!
//! Drawing goes through the [`Surface`] trait, implemented for HTML canvases
//! ([`CanvasSurface`]) and for headless software rendering ([`RasterSurface`]).
//!
//! # Example
//!
//! ```ignore
//! use ember_field::{FieldConfig, LightField, RasterFactory, RasterSurface, Viewport};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let viewport = Viewport::new(1000.0, 600.0);
//! let mut field = LightField::init(&FieldConfig::default(), viewport, RasterFactory, StdRng::seed_from_u64(1))?;
//! let mut target = RasterSurface::new(1000, 600)?;
//! field.frame_tick(16.0, &mut target);
//! ```

mod backdrop;
mod canvas;
mod component;
mod error;
mod field;
mod light;
pub mod math;
mod raster;
mod surface;
#[cfg(test)]
mod testing;
pub mod theme;
mod types;

pub use backdrop::{Backdrop, BackdropConfig};
pub use canvas::{CanvasFactory, CanvasSurface};
pub use component::LightFieldCanvas;
pub use error::{Error, Result};
pub use field::{FrameStats, LayoutConfig, LightField};
pub use light::{Light, LightConfig, Twinkle};
pub use raster::{RasterFactory, RasterSurface};
pub use surface::{BlendMode, GradientStop, Surface, SurfaceFactory};
pub use theme::{Color, Palette};
pub use types::{FieldConfig, Point, Viewport};
