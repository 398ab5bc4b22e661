//! ember-field: an ambient drifting-firefly glow field.
//!
//! This crate renders a band of soft, twinkling light sprites over a static
//! tinted backdrop on a full-viewport canvas. The engine is surface-agnostic
//! and also renders headless through the software rasterizer.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::light_field::{
	Backdrop, BackdropConfig, BlendMode, CanvasFactory, CanvasSurface, Color, Error, FieldConfig,
	FrameStats, GradientStop, LayoutConfig, Light, LightConfig, LightField, LightFieldCanvas, Palette,
	Point, RasterFactory, RasterSurface, Result, Surface, SurfaceFactory, Twinkle, Viewport,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("ember-field: logging initialized");
}

/// Parse field settings from JSON, falling back to defaults on error.
pub fn parse_field_config(json: &str) -> FieldConfig {
	match serde_json::from_str::<FieldConfig>(json) {
		Ok(config) => {
			info!("ember-field: loaded config (seed {:?})", config.seed);
			config
		}
		Err(e) => {
			warn!("ember-field: failed to parse config, using defaults: {}", e);
			FieldConfig::default()
		}
	}
}

/// Load field settings from a script element with id="light-field-config".
fn load_field_config() -> Option<FieldConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("light-field-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	Some(parse_field_config(&json_text))
}

/// Main application component.
/// Loads settings from the DOM and mounts the light field behind the page.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_field_config().unwrap_or_default();
	let config_signal = Signal::derive(move || config.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Embers" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-field">
			<LightFieldCanvas config=config_signal />
		</div>
	}
}
