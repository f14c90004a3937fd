//! Fixed tuning constants for sampling, motion, sizing and the transition.
//!
//! Everything here is built through `Default`; nothing is exposed to the
//! end user.

use super::types::Rgb;

/// Sampling grid and pixel acceptance thresholds.
#[derive(Clone, Debug)]
pub struct SamplerConfig {
	/// Grid step in raster pixels, on both axes.
	pub stride: u32,
	/// A pixel must have alpha strictly greater than this.
	pub min_alpha: u8,
	/// A pixel must have `(r + g + b) / 3` strictly greater than this.
	pub min_brightness: u32,
}

impl Default for SamplerConfig {
	fn default() -> Self {
		Self {
			stride: 3,
			min_alpha: 100,
			min_brightness: 10,
		}
	}
}

/// Per-particle motion constants.
#[derive(Clone, Debug)]
pub struct MotionConfig {
	/// Bound on each velocity component in ambient mode.
	pub walk_speed: f64,
	/// Half-width of the per-frame velocity perturbation.
	pub walk_jitter: f64,
	/// Minimum easing rate.
	pub speed_min: f64,
	/// Width of the random range added to `speed_min`.
	pub speed_spread: f64,
	/// Side of the square drawn for each particle.
	pub particle_size: f64,
}

impl Default for MotionConfig {
	fn default() -> Self {
		Self {
			walk_speed: 0.8,
			walk_jitter: 0.05,
			speed_min: 0.04,
			speed_spread: 0.05,
			particle_size: 1.5,
		}
	}
}

/// Canvas sizing constants.
#[derive(Clone, Debug)]
pub struct GeometryConfig {
	/// Maximum display width in logical (CSS) pixels.
	pub max_display: f64,
}

impl Default for GeometryConfig {
	fn default() -> Self {
		Self { max_display: 320.0 }
	}
}

/// Surface colors.
#[derive(Clone, Debug)]
pub struct Palette {
	pub background: Rgb,
	pub error_glyph: Rgb,
}

impl Default for Palette {
	fn default() -> Self {
		Self {
			background: Rgb::BLACK,
			error_glyph: Rgb::new(0xe5, 0x39, 0x35),
		}
	}
}

/// Complete configuration for a mosaic canvas.
#[derive(Clone, Debug)]
pub struct MosaicConfig {
	pub sampler: SamplerConfig,
	pub motion: MotionConfig,
	pub geometry: GeometryConfig,
	pub palette: Palette,
	/// Delay before particles switch from ambient drift to assembling.
	pub transition_delay_ms: i32,
}

impl Default for MosaicConfig {
	fn default() -> Self {
		Self {
			sampler: SamplerConfig::default(),
			motion: MotionConfig::default(),
			geometry: GeometryConfig::default(),
			palette: Palette::default(),
			transition_delay_ms: 2000,
		}
	}
}
