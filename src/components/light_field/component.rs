//! Leptos component driving the light field on a full-viewport canvas.
//!
//! On mount the canvas is sized to the window, the backdrop and band are
//! built, and a `requestAnimationFrame` loop composites one frame per display
//! refresh. Window resizes resize the canvas.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, Window};

use super::canvas::{CanvasFactory, CanvasSurface};
use super::error::{Error, Result};
use super::field::LightField;
use super::types::{FieldConfig, Viewport};

/// The running field together with the visible surface it draws on.
struct FieldContext {
	field: LightField<CanvasFactory, StdRng>,
	surface: CanvasSurface,
}

fn window_viewport(window: &Window) -> Viewport {
	let dimension = |v: std::result::Result<JsValue, JsValue>| {
		v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
	};
	Viewport::new(dimension(window.inner_width()), dimension(window.inner_height()))
}

fn seeded_rng(config: &FieldConfig) -> StdRng {
	let seed = config
		.seed
		.unwrap_or_else(|| (js_sys::Math::random() * u64::MAX as f64) as u64);
	StdRng::seed_from_u64(seed)
}

/// Size the canvas to the window, then build the backdrop and first band.
fn start(config: &FieldConfig, canvas: HtmlCanvasElement, window: &Window) -> Result<FieldContext> {
	let viewport = window_viewport(window);
	let (width, height) = viewport.pixel_size();
	canvas.set_width(width);
	canvas.set_height(height);

	let document = window.document().ok_or(Error::SurfaceAllocation {
		width,
		height,
		reason: "window has no document".into(),
	})?;
	let surface = CanvasSurface::new(canvas)?;
	let field = LightField::init(config, viewport, CanvasFactory::new(document), seeded_rng(config))?;
	Ok(FieldContext { field, surface })
}

fn request_frame(window: &Window, cb: &Closure<dyn FnMut(f64)>) {
	if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		error!("light field: requestAnimationFrame failed: {e:?}");
	}
}

/// Full-viewport canvas with the animated light field.
///
/// Settings come from the reactive `config` signal and are read once on mount.
#[component]
pub fn LightFieldCanvas(#[prop(into)] config: Signal<FieldConfig>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<FieldContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			error!("light field: no window");
			return;
		};

		match start(&config.get_untracked(), canvas, &window) {
			Ok(c) => *context.borrow_mut() = Some(c),
			Err(e) => {
				error!("light field: init failed: {e}");
				return;
			}
		}

		let context_resize = context.clone();
		*resize_cb.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let viewport = window_viewport(&win);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				if let Err(e) = c.field.on_resize(viewport, &mut c.surface) {
					warn!("light field: resize failed: {e}");
				}
			}
		}));
		if let Some(ref cb) = *resize_cb.borrow() {
			if let Err(e) = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref()) {
				error!("light field: resize listener not registered: {e:?}");
			}
		}

		let (context_anim, animate_inner) = (context.clone(), animate.clone());
		*animate.borrow_mut() = Some(Closure::new(move |time: f64| {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				c.field.frame_tick(time, &mut c.surface);
			}
			if let (Some(win), Some(cb)) = (web_sys::window(), &*animate_inner.borrow()) {
				request_frame(&win, cb);
			}
		}));
		if let Some(ref cb) = *animate.borrow() {
			request_frame(&window, cb);
		}
	});

	view! {
		<canvas
			node_ref=canvas_ref
			class="light-field-canvas"
			style="display: block; position: fixed; inset: 0; pointer-events: none;"
		/>
	}
}
