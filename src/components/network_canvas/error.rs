use thiserror::Error;
use wasm_bindgen::JsValue;

/// Host-environment failures that keep the canvas from starting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CanvasError {
	#[error("no browser window")]
	NoWindow,
	#[error("no document on window")]
	NoDocument,
	#[error("2d rendering context unavailable")]
	ContextUnavailable,
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for CanvasError {
	fn from(value: JsValue) -> Self {
		CanvasError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_missing_piece() {
		assert_eq!(CanvasError::ContextUnavailable.to_string(), "2d rendering context unavailable");
		assert_eq!(CanvasError::Js("boom".into()).to_string(), "javascript error: boom");
	}
}
