//! Drawing surface abstraction and its canvas implementation.
//!
//! The simulation only decides where and in what color to draw; the
//! [`Surface`] trait is the seam to whatever actually rasterizes rectangles.

use web_sys::CanvasRenderingContext2d;

use super::types::Rgb;

/// Minimal set of drawing primitives the animation needs.
pub trait Surface {
	/// Fills the whole `width` x `height` area with `color`.
	fn clear(&mut self, width: f64, height: f64, color: Rgb);

	/// Fills an opaque axis-aligned rectangle.
	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb);

	/// Draws the fallback shown in place of particles after a failed load.
	fn draw_error_glyph(&mut self, width: f64, height: f64, color: Rgb);
}

/// [`Surface`] over a 2d canvas context.
///
/// Remembers the last fill color so runs of equally colored particles skip
/// redundant `fillStyle` writes.
pub struct CanvasSurface {
	ctx: CanvasRenderingContext2d,
	fill: Option<Rgb>,
}

impl CanvasSurface {
	pub fn new(ctx: CanvasRenderingContext2d) -> Self {
		Self { ctx, fill: None }
	}

	fn set_fill(&mut self, color: Rgb) {
		if self.fill != Some(color) {
			self.ctx.set_fill_style_str(color.hex().as_str());
			self.fill = Some(color);
		}
	}
}

impl Surface for CanvasSurface {
	fn clear(&mut self, width: f64, height: f64, color: Rgb) {
		self.set_fill(color);
		self.ctx.fill_rect(0.0, 0.0, width, height);
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
		self.set_fill(color);
		self.ctx.fill_rect(x, y, width, height);
	}

	fn draw_error_glyph(&mut self, width: f64, height: f64, color: Rgb) {
		let size = (width.min(height) * 0.4).max(12.0);
		self.set_fill(color);
		self.ctx.set_font(&format!("{size}px sans-serif"));
		self.ctx.set_text_align("center");
		self.ctx.set_text_baseline("middle");
		let _ = self.ctx.fill_text("\u{26a0}", width / 2.0, height / 2.0);
	}
}

/// A rectangle captured by [`RecordingSurface`].
#[cfg(test)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RecordedRect {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	pub color: Rgb,
}

/// Test double that records draw calls instead of rasterizing them.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingSurface {
	pub clears: usize,
	pub rects: Vec<RecordedRect>,
	pub error_glyphs: usize,
}

#[cfg(test)]
impl Surface for RecordingSurface {
	fn clear(&mut self, _width: f64, _height: f64, _color: Rgb) {
		self.clears += 1;
		self.rects.clear();
		self.error_glyphs = 0;
	}

	fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgb) {
		self.rects.push(RecordedRect {
			x,
			y,
			width,
			height,
			color,
		});
	}

	fn draw_error_glyph(&mut self, _width: f64, _height: f64, _color: Rgb) {
		self.error_glyphs += 1;
	}
}
