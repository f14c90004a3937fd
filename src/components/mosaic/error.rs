//! Failures of a single image load.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Everything that can end an image load early.
///
/// None of these are fatal to the component: the next upload starts over.
#[derive(Debug, Error)]
pub enum MosaicError {
	#[error("no browser window available")]
	NoWindow,
	#[error("DOM call failed: {0}")]
	Dom(String),
	#[error("2d canvas context unavailable")]
	ContextUnavailable,
	#[error("image has no pixels ({width}x{height})")]
	EmptyImage { width: u32, height: u32 },
	#[error("image could not be decoded: {0}")]
	Decode(String),
}

impl From<JsValue> for MosaicError {
	fn from(value: JsValue) -> Self {
		MosaicError::Dom(format!("{value:?}"))
	}
}
