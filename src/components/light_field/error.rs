//! Errors raised while building or drawing the light field.

use wasm_bindgen::JsValue;

/// Everything that can go wrong in the light field.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
	/// A light or backdrop was configured with values it cannot render.
	#[error("invalid parameter: {0}")]
	InvalidParameter(String),

	/// The host could not provide an off-screen surface of the requested size.
	#[error("failed to allocate {width}x{height} surface: {reason}")]
	SurfaceAllocation {
		width: u32,
		height: u32,
		reason: String,
	},

	/// A drawing call on a surface failed.
	#[error("draw failed: {0}")]
	Draw(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
	/// Wrap a failed canvas call.
	pub fn from_js(what: &str, value: JsValue) -> Self {
		Error::Draw(format!("{what}: {value:?}"))
	}
}
