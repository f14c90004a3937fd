//! Converts a rasterized image into sparse colored sample points.

use log::debug;

use super::config::SamplerConfig;
use super::types::{PixelBuffer, Rgb, SamplePoint};

/// Stride-grid pixel sampler with opacity and brightness thresholds.
#[derive(Clone, Debug, Default)]
pub struct Sampler {
	config: SamplerConfig,
}

impl Sampler {
	pub fn new(config: SamplerConfig) -> Self {
		Self { config }
	}

	/// Walks `buffer` on the stride grid and keeps each cell whose top-left
	/// pixel is opaque enough and bright enough.
	///
	/// Points come out in scan order (rows top to bottom, columns left to
	/// right). A zero-sized buffer gives no points; pixels whose bytes are
	/// missing are skipped.
	pub fn extract_points(&self, buffer: &PixelBuffer) -> Vec<SamplePoint> {
		let stride = self.config.stride.max(1) as usize;
		let mut points = Vec::new();

		for y in (0..buffer.height).step_by(stride) {
			for x in (0..buffer.width).step_by(stride) {
				let Some([r, g, b, a]) = buffer.rgba(x, y) else {
					continue;
				};
				let color = Rgb::new(r, g, b);
				if a > self.config.min_alpha && color.is_brighter_than(self.config.min_brightness) {
					points.push(SamplePoint { x, y, color });
				}
			}
		}

		debug!(
			"particle-mosaic: sampled {}x{} buffer at stride {} -> {} points",
			buffer.width,
			buffer.height,
			stride,
			points.len()
		);
		points
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn buffer(width: u32, height: u32, pixels: &[[u8; 4]]) -> PixelBuffer {
		PixelBuffer::new(width, height, pixels.iter().flatten().copied().collect())
	}

	fn sampler(stride: u32) -> Sampler {
		Sampler::new(SamplerConfig {
			stride,
			..SamplerConfig::default()
		})
	}

	#[test]
	fn keeps_only_opaque_bright_pixels() {
		let pixels = [
			[255, 255, 255, 255], // kept
			[0, 0, 0, 255],       // too dark
			[200, 10, 10, 100],   // alpha at threshold
			[30, 0, 3, 101],      // brightness 11, alpha 101
			[30, 0, 0, 255],      // brightness exactly 10
			[90, 90, 90, 0],      // transparent
		];
		let points = sampler(1).extract_points(&buffer(3, 2, &pixels));

		assert_eq!(
			points,
			vec![
				SamplePoint {
					x: 0,
					y: 0,
					color: Rgb::WHITE
				},
				SamplePoint {
					x: 0,
					y: 1,
					color: Rgb::new(30, 0, 3)
				},
			]
		);
	}

	#[test]
	fn every_returned_point_satisfies_both_thresholds() {
		let mut pixels = Vec::new();
		for i in 0..256u32 {
			let v = (i * 7 % 256) as u8;
			pixels.push([v, (i % 256) as u8, v / 2, (i * 13 % 256) as u8]);
		}
		let buf = buffer(16, 16, &pixels);
		let points = sampler(1).extract_points(&buf);

		assert!(!points.is_empty());
		for p in points {
			let [r, g, b, a] = buf.rgba(p.x, p.y).unwrap();
			assert!(a > 100);
			assert!((r as f64 + g as f64 + b as f64) / 3.0 > 10.0);
			assert_eq!(p.color, Rgb::new(r, g, b));
		}
	}

	#[test]
	fn default_stride_reads_top_left_of_each_cell() {
		let white = [255, 255, 255, 255];
		let buf = buffer(7, 4, &[white; 28]);
		let coords: Vec<_> = Sampler::default()
			.extract_points(&buf)
			.into_iter()
			.map(|p| (p.x, p.y))
			.collect();

		assert_eq!(coords, vec![(0, 0), (3, 0), (6, 0), (0, 3), (3, 3), (6, 3)]);
	}

	#[test]
	fn fractional_mean_just_above_threshold_is_kept() {
		// Channel sums 30, 31, 32 and 33: means 10, 10.33, 10.67 and 11.
		let pixels = [
			[30, 0, 0, 255],
			[31, 0, 0, 255],
			[32, 0, 0, 255],
			[11, 11, 11, 255],
		];
		let xs: Vec<_> = sampler(1)
			.extract_points(&buffer(4, 1, &pixels))
			.into_iter()
			.map(|p| p.x)
			.collect();

		assert_eq!(xs, vec![1, 2, 3]);
	}

	#[test]
	fn degenerate_buffers_yield_nothing() {
		assert!(sampler(1).extract_points(&PixelBuffer::default()).is_empty());

		// Claims 2x2 but only carries one pixel: the rest are skipped.
		let truncated = PixelBuffer::new(2, 2, vec![255, 255, 255, 255]);
		assert_eq!(sampler(1).extract_points(&truncated).len(), 1);
	}

	#[test]
	fn zero_stride_behaves_like_one() {
		let buf = buffer(2, 1, &[[255, 255, 255, 255]; 2]);
		assert_eq!(sampler(0).extract_points(&buf).len(), 2);
	}
}
