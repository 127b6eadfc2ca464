use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::warn;
use wasm_bindgen::prelude::*;

use super::error::CanvasError;

struct FrameLoopInner {
	handle: Cell<Option<i32>>,
	callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoopInner {
	fn schedule(&self) -> Result<(), CanvasError> {
		if self.handle.get().is_some() {
			return Ok(());
		}
		let window = web_sys::window().ok_or(CanvasError::NoWindow)?;
		let callback = self.callback.borrow();
		let Some(callback) = callback.as_ref() else {
			return Ok(());
		};
		let handle = window.request_animation_frame(callback.as_ref().unchecked_ref())?;
		self.handle.set(Some(handle));
		Ok(())
	}

	fn cancel(&self) {
		if let (Some(handle), Some(window)) = (self.handle.take(), web_sys::window()) {
			let _ = window.cancel_animation_frame(handle);
		}
	}
}

impl Drop for FrameLoopInner {
	fn drop(&mut self) {
		self.cancel();
	}
}

/// A `requestAnimationFrame` loop. The frame callback receives the frame
/// timestamp in milliseconds and returns whether to keep running.
#[derive(Clone)]
pub struct FrameLoop {
	inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
	pub fn new(mut on_frame: impl FnMut(f64) -> bool + 'static) -> Self {
		let inner = Rc::new(FrameLoopInner {
			handle: Cell::new(None),
			callback: RefCell::new(None),
		});
		let weak: Weak<FrameLoopInner> = Rc::downgrade(&inner);
		*inner.callback.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
			let Some(inner) = weak.upgrade() else {
				return;
			};
			inner.handle.set(None);
			if on_frame(timestamp) {
				if let Err(err) = inner.schedule() {
					warn!("frame loop stopped: {}", err);
				}
			}
		}));
		Self { inner }
	}

	/// Schedules the next frame unless one is already pending.
	pub fn start(&self) -> Result<(), CanvasError> {
		self.inner.schedule()
	}

	pub fn stop(&self) {
		self.inner.cancel();
	}
}
