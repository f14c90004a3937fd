//! Canvas sizing and source-image placement.
//!
//! # Coordinate Spaces
//!
//! - **Display size**: logical (CSS) pixels the canvas occupies on the page.
//! - **Raster size**: physical pixels of the canvas backing store. This is the
//!   display size multiplied by the device pixel ratio, and it is the space
//!   particles live in.
//!
//! Before an image is loaded the canvas is a square no wider than the
//! configured maximum. Once an image is loaded the display width is pinned to
//! that maximum and the height follows the image's aspect ratio.

use super::config::GeometryConfig;
use super::error::MosaicError;

/// Resolved canvas dimensions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CanvasGeometry {
	pub raster_width: u32,
	pub raster_height: u32,
	pub display_width: f64,
	pub display_height: f64,
}

impl CanvasGeometry {
	pub fn raster_size(&self) -> (f64, f64) {
		(self.raster_width as f64, self.raster_height as f64)
	}
}

/// Where the source image is drawn inside the raster before sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
}

/// Computes canvas geometry for a given device pixel ratio.
#[derive(Clone, Debug)]
pub struct GeometryResolver {
	max_display: f64,
	pixel_ratio: f64,
}

impl GeometryResolver {
	pub fn new(config: &GeometryConfig, pixel_ratio: f64) -> Self {
		let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 {
			pixel_ratio
		} else {
			1.0
		};
		Self {
			max_display: config.max_display,
			pixel_ratio,
		}
	}

	pub fn pixel_ratio(&self) -> f64 {
		self.pixel_ratio
	}

	/// Square canvas used before any image exists.
	pub fn initial_square(&self, container_width: f64) -> CanvasGeometry {
		let side = container_width.max(0.0).min(self.max_display);
		self.scaled(side, side)
	}

	/// Canvas sized to an image: width pinned to the maximum, height follows
	/// the aspect ratio without a cap.
	pub fn fit_to_image(
		&self,
		image_width: u32,
		image_height: u32,
	) -> Result<CanvasGeometry, MosaicError> {
		if image_width == 0 || image_height == 0 {
			return Err(MosaicError::EmptyImage {
				width: image_width,
				height: image_height,
			});
		}
		let aspect = image_width as f64 / image_height as f64;
		Ok(self.scaled(self.max_display, self.max_display / aspect))
	}

	fn scaled(&self, display_width: f64, display_height: f64) -> CanvasGeometry {
		CanvasGeometry {
			raster_width: to_raster(display_width * self.pixel_ratio),
			raster_height: to_raster(display_height * self.pixel_ratio),
			display_width,
			display_height,
		}
	}
}

fn to_raster(v: f64) -> u32 {
	(v.round() as u32).max(1)
}

/// Aspect-preserving, centered placement of an image inside the canvas.
///
/// A proportionally wider image fills the canvas width and is letterboxed
/// top and bottom; otherwise it fills the height and is pillarboxed. The
/// whole image always fits, uncropped.
pub fn center_fit(image_aspect: f64, canvas_width: f64, canvas_height: f64) -> Placement {
	let canvas_aspect = canvas_width / canvas_height;
	if image_aspect > canvas_aspect {
		let height = canvas_width / image_aspect;
		Placement {
			x: 0.0,
			y: (canvas_height - height) / 2.0,
			width: canvas_width,
			height,
		}
	} else {
		let width = canvas_height * image_aspect;
		Placement {
			x: (canvas_width - width) / 2.0,
			y: 0.0,
			width,
			height: canvas_height,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn resolver(pixel_ratio: f64) -> GeometryResolver {
		GeometryResolver::new(&GeometryConfig::default(), pixel_ratio)
	}

	#[test]
	fn fit_to_image_caps_width_and_keeps_aspect() {
		let g = resolver(1.0).fit_to_image(400, 200).unwrap();
		assert_eq!((g.display_width, g.display_height), (320.0, 160.0));
		assert_eq!((g.raster_width, g.raster_height), (320, 160));
	}

	#[test]
	fn fit_to_image_leaves_tall_heights_uncapped() {
		let g = resolver(1.0).fit_to_image(100, 400).unwrap();
		assert_eq!((g.display_width, g.display_height), (320.0, 1280.0));
	}

	#[test]
	fn raster_scales_with_pixel_ratio() {
		let g = resolver(2.0).fit_to_image(400, 200).unwrap();
		assert_eq!((g.raster_width, g.raster_height), (640, 320));
		assert_eq!((g.display_width, g.display_height), (320.0, 160.0));
	}

	#[test]
	fn fit_to_image_rejects_empty_images() {
		assert!(matches!(
			resolver(1.0).fit_to_image(0, 10),
			Err(MosaicError::EmptyImage { width: 0, height: 10 })
		));
	}

	#[test]
	fn initial_square_is_bounded_by_container_and_maximum() {
		let small = resolver(1.5).initial_square(200.0);
		assert_eq!((small.display_width, small.display_height), (200.0, 200.0));
		assert_eq!((small.raster_width, small.raster_height), (300, 300));

		let wide = resolver(1.0).initial_square(1920.0);
		assert_eq!((wide.display_width, wide.display_height), (320.0, 320.0));
	}

	#[test]
	fn bogus_pixel_ratio_falls_back_to_one() {
		assert_eq!(resolver(0.0).pixel_ratio(), 1.0);
		assert_eq!(resolver(f64::NAN).pixel_ratio(), 1.0);
	}

	#[test]
	fn wider_image_letterboxes_evenly() {
		let p = center_fit(2.0, 300.0, 300.0);
		assert_eq!(p.x, 0.0);
		assert_eq!(p.width, 300.0);
		assert_eq!(p.height, 150.0);
		let bottom = 300.0 - (p.y + p.height);
		assert!(p.y > 0.0);
		assert_eq!(p.y, bottom);
	}

	#[test]
	fn taller_image_pillarboxes_evenly() {
		let p = center_fit(0.5, 300.0, 300.0);
		assert_eq!(p.y, 0.0);
		assert_eq!(p.height, 300.0);
		assert_eq!(p.width, 150.0);
		assert_eq!(p.x, 75.0);
	}

	#[test]
	fn matching_aspect_fills_exactly() {
		let p = center_fit(2.0, 320.0, 160.0);
		assert_eq!(
			p,
			Placement {
				x: 0.0,
				y: 0.0,
				width: 320.0,
				height: 160.0
			}
		);
	}
}
