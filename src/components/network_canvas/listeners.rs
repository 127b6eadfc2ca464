use std::cell::Cell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use super::error::CanvasError;

/// DOM event listener that unregisters itself when dropped.
pub struct EventListener {
	target: EventTarget,
	event: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl EventListener {
	pub fn new(
		target: &EventTarget,
		event: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, CanvasError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			event,
			callback,
		})
	}
}

impl Drop for EventListener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
	}
}

struct DebouncedInner {
	delay_ms: i32,
	pending: Cell<Option<i32>>,
	callback: Closure<dyn FnMut()>,
}

impl Drop for DebouncedInner {
	fn drop(&mut self) {
		if let (Some(handle), Some(window)) = (self.pending.take(), web_sys::window()) {
			window.clear_timeout_with_handle(handle);
		}
	}
}

/// Runs its callback once calls to [`trigger`](Self::trigger) stop for `delay_ms`.
#[derive(Clone)]
pub struct Debounced {
	inner: Rc<DebouncedInner>,
}

impl Debounced {
	pub fn new(delay_ms: i32, callback: impl FnMut() + 'static) -> Self {
		Self {
			inner: Rc::new(DebouncedInner {
				delay_ms,
				pending: Cell::new(None),
				callback: Closure::<dyn FnMut()>::new(callback),
			}),
		}
	}

	pub fn trigger(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(handle) = self.inner.pending.take() {
			window.clear_timeout_with_handle(handle);
		}
		match window.set_timeout_with_callback_and_timeout_and_arguments_0(
			self.inner.callback.as_ref().unchecked_ref(),
			self.inner.delay_ms,
		) {
			Ok(handle) => self.inner.pending.set(Some(handle)),
			Err(err) => warn!("debounce timer failed: {}", CanvasError::from(err)),
		}
	}
}
