use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, IntersectionObserver, IntersectionObserverEntry,
	MouseEvent, Window,
};

use super::config::EngineConfig;
use super::driver::{FrameOutcome, NetworkEngine, SuspendReason};
use super::error::CanvasError;
use super::fps::FrameRateMonitor;
use super::frame_loop::FrameLoop;
use super::listeners::{Debounced, EventListener};
use super::node::Bounds;
use super::types::NetworkSource;

const RESIZE_DEBOUNCE_MS: i32 = 100;
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Everything alive while the canvas is mounted.
struct Mounted {
	engine: Rc<RefCell<NetworkEngine>>,
	ctx: CanvasRenderingContext2d,
	loops: Loops,
	observer: Option<(IntersectionObserver, Closure<dyn FnMut(js_sys::Array)>)>,
	_listeners: Vec<EventListener>,
}

impl Mounted {
	fn repaint_if_idle(&self) {
		let engine = self.engine.borrow();
		if !engine.should_animate() {
			engine.paint(&mut self.ctx.clone());
		}
	}
}

impl Drop for Mounted {
	fn drop(&mut self) {
		self.loops.stop();
		if let Some((observer, _)) = &self.observer {
			observer.disconnect();
		}
		self.engine.borrow_mut().release();
	}
}

/// The animation loop and the FPS sampler feeding it; they run and stop together.
#[derive(Clone)]
struct Loops {
	animation: FrameLoop,
	sampler: FrameLoop,
}

impl Loops {
	fn start(&self) -> Result<(), CanvasError> {
		self.sampler.start()?;
		self.animation.start()
	}

	fn stop(&self) {
		self.animation.stop();
		self.sampler.stop();
	}
}

/// Starts or stops the frame loops after a suspension trigger changes.
fn apply_trigger(engine: &RefCell<NetworkEngine>, loops: &Loops, reason: SuspendReason, active: bool) {
	let animating = {
		let mut engine = engine.borrow_mut();
		engine.suspend_if(reason, active);
		engine.should_animate()
	};
	if animating {
		if let Err(err) = loops.start() {
			warn!("could not resume animation: {}", err);
		}
	} else {
		loops.stop();
	}
}

fn canvas_size(
	window: &Window,
	canvas: &HtmlCanvasElement,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
) -> (f64, f64) {
	if fullscreen {
		let dim = |v: Result<JsValue, JsValue>, fallback: f64| {
			v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback)
		};
		return (dim(window.inner_width(), 800.0), dim(window.inner_height(), 600.0));
	}
	let parent = canvas.parent_element();
	(
		width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
		height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
	)
}

fn local_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn mount(
	canvas: &HtmlCanvasElement,
	source: &NetworkSource,
	config: EngineConfig,
	fullscreen: bool,
	width: Option<f64>,
	height: Option<f64>,
	on_select: Option<Callback<Option<String>>>,
) -> Result<Mounted, CanvasError> {
	let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
	let document = window.document().ok_or(CanvasError::NoDocument)?;

	let (w, h) = canvas_size(&window, canvas, fullscreen, width, height);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas
		.get_context("2d")?
		.ok_or(CanvasError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| CanvasError::ContextUnavailable)?;

	let mut engine = NetworkEngine::new(source, Bounds::new(w, h), config, js_sys::Date::now() as u64);
	if let Some(callback) = on_select {
		engine.on_select(move |id| callback.run(id));
	}
	engine.start();
	let engine = Rc::new(RefCell::new(engine));

	let fps = Rc::new(Cell::new(60.0));
	let sampler = {
		let fps = fps.clone();
		let mut monitor = FrameRateMonitor::default();
		FrameLoop::new(move |now| {
			if let Some(rate) = monitor.record(now) {
				fps.set(rate);
			}
			true
		})
	};

	let animation = {
		let (engine, fps, mut ctx) = (engine.clone(), fps.clone(), ctx.clone());
		FrameLoop::new(move |_| engine.borrow_mut().frame(&mut ctx, fps.get()) != FrameOutcome::Suspended)
	};
	let loops = Loops { animation, sampler };

	let mut listeners = Vec::new();

	{
		let (engine, loops, doc) = (engine.clone(), loops.clone(), document.clone());
		engine.borrow_mut().suspend_if(SuspendReason::Hidden, document.hidden());
		listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
			apply_trigger(&engine, &loops, SuspendReason::Hidden, doc.hidden());
		})?);
	}

	if let Some(query) = window.match_media(REDUCED_MOTION_QUERY)? {
		engine.borrow_mut().suspend_if(SuspendReason::ReducedMotion, query.matches());
		let (engine, loops, watched) = (engine.clone(), loops.clone(), query.clone());
		listeners.push(EventListener::new(&query, "change", move |_| {
			apply_trigger(&engine, &loops, SuspendReason::ReducedMotion, watched.matches());
		})?);
	}

	{
		let (engine, canvas, mut ctx) = (engine.clone(), canvas.clone(), ctx.clone());
		let resized = Debounced::new(RESIZE_DEBOUNCE_MS, move || {
			let Some(window) = web_sys::window() else {
				return;
			};
			let (w, h) = canvas_size(&window, &canvas, fullscreen, width, height);
			canvas.set_width(w as u32);
			canvas.set_height(h as u32);
			let mut engine = engine.borrow_mut();
			engine.resize(w, h);
			if !engine.should_animate() {
				engine.paint(&mut ctx);
			}
		});
		listeners.push(EventListener::new(&window, "resize", move |_| resized.trigger())?);
	}

	let observer = {
		let (engine, loops) = (engine.clone(), loops.clone());
		let callback = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
			let latest = entries
				.iter()
				.filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
				.last();
			if let Some(entry) = latest {
				apply_trigger(&engine, &loops, SuspendReason::Offscreen, !entry.is_intersecting());
			}
		});
		match IntersectionObserver::new(callback.as_ref().unchecked_ref()) {
			Ok(observer) => {
				observer.observe(canvas);
				Some((observer, callback))
			}
			Err(err) => {
				warn!("visibility tracking disabled: {}", CanvasError::from(err));
				None
			}
		}
	};

	if engine.borrow().should_animate() {
		loops.start()?;
	} else {
		engine.borrow().paint(&mut ctx.clone());
	}
	info!("network canvas mounted at {}x{}", w, h);

	Ok(Mounted {
		engine,
		ctx,
		loops,
		observer,
		_listeners: listeners,
	})
}

/// Animated network graph on a 2D canvas.
///
/// `on_select` receives the clicked node id, or `None` when a click misses.
#[component]
pub fn NetworkCanvas(
	#[prop(into)] source: Signal<NetworkSource>,
	#[prop(optional)] config: Option<EngineConfig>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = true)] interactive: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional, into)] on_select: Option<Callback<Option<String>>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let mounted = StoredValue::new_local(None::<Mounted>);
	let config = config.unwrap_or_default();

	Effect::new(move |_| {
		let source = source.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();

		let running = mounted.with_value(|m| {
			m.as_ref().map(|m| {
				m.engine.borrow_mut().reset(&source);
				m.repaint_if_idle();
			})
		});
		if running.is_some() {
			return;
		}
		match mount(&canvas, &source, config.clone(), fullscreen, width, height, on_select) {
			Ok(m) => mounted.set_value(Some(m)),
			Err(err) => warn!("network canvas not started: {}", err),
		}
	});

	on_cleanup(move || {
		if let Some(Some(_)) = mounted.try_update_value(Option::take) {
			info!("network canvas unmounted");
		}
	});

	let on_mousemove = move |ev: MouseEvent| {
		if !interactive {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_position(&canvas, &ev);
		mounted.with_value(|m| {
			if let Some(m) = m {
				let hovering = m.engine.borrow_mut().pointer_moved(x, y);
				let cursor = if hovering { "pointer" } else { "default" };
				let _ = web_sys::HtmlElement::style(&canvas).set_property("cursor", cursor);
			}
		});
	};

	let on_click = move |ev: MouseEvent| {
		if !interactive {
			return;
		}
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let (x, y) = local_position(&canvas, &ev);
		mounted.with_value(|m| {
			if let Some(m) = m {
				m.engine.borrow_mut().click(x, y);
				m.repaint_if_idle();
			}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		mounted.with_value(|m| {
			if let Some(m) = m {
				m.engine.borrow_mut().pointer_left();
			}
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="network-canvas"
			on:mousemove=on_mousemove
			on:click=on_click
			on:mouseleave=on_mouseleave
			style="display: block;"
		/>
	}
}
