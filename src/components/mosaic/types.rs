//! Value types shared by the sampler, the particles and the renderer.

/// Opaque 8-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

impl Rgb {
	pub const BLACK: Rgb = Rgb::new(0, 0, 0);
	pub const WHITE: Rgb = Rgb::new(255, 255, 255);

	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Sum of the three channels, in `0..=765`.
	pub fn channel_sum(self) -> u32 {
		self.r as u32 + self.g as u32 + self.b as u32
	}

	/// Whether the exact channel mean `(r + g + b) / 3` exceeds `threshold`.
	///
	/// Compared as `sum > 3 * threshold` so fractional means are not truncated.
	pub fn is_brighter_than(self, threshold: u32) -> bool {
		self.channel_sum() > threshold.saturating_mul(3)
	}

	/// Encodes the color as `#rrggbb` into a stack buffer.
	///
	/// The renderer sets a fill style for every particle, so this avoids a
	/// heap allocation per draw call.
	pub fn hex(self) -> HexColor {
		const DIGITS: &[u8; 16] = b"0123456789abcdef";
		let mut buf = [b'#'; 7];
		for (i, channel) in [self.r, self.g, self.b].into_iter().enumerate() {
			buf[1 + i * 2] = DIGITS[(channel >> 4) as usize];
			buf[2 + i * 2] = DIGITS[(channel & 0x0f) as usize];
		}
		HexColor(buf)
	}
}

/// A `#rrggbb` color string that lives on the stack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HexColor([u8; 7]);

impl HexColor {
	pub fn as_str(&self) -> &str {
		// Only ASCII hex digits and '#' are ever written.
		std::str::from_utf8(&self.0).unwrap_or("#000000")
	}
}

/// A filtered pixel location and its color, used once to seed a particle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SamplePoint {
	pub x: u32,
	pub y: u32,
	pub color: Rgb,
}

/// Row-major RGBA8 pixels, as read back from an offscreen canvas.
#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
	pub width: u32,
	pub height: u32,
	pub data: Vec<u8>,
}

impl PixelBuffer {
	pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
		Self {
			width,
			height,
			data,
		}
	}

	/// Returns `(r, g, b, a)` at `(x, y)`, or `None` when the coordinate is
	/// outside the buffer or the backing bytes are missing.
	pub fn rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
		if x >= self.width || y >= self.height {
			return None;
		}
		let idx = (y as usize * self.width as usize + x as usize) * 4;
		let px = self.data.get(idx..idx + 4)?;
		Some([px[0], px[1], px[2], px[3]])
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_encodes_each_channel() {
		assert_eq!(Rgb::new(255, 0, 16).hex().as_str(), "#ff0010");
		assert_eq!(Rgb::BLACK.hex().as_str(), "#000000");
	}

	#[test]
	fn brightness_compares_the_exact_mean() {
		assert_eq!(Rgb::WHITE.channel_sum(), 765);
		assert!(!Rgb::new(30, 0, 0).is_brighter_than(10));
		assert!(Rgb::new(31, 0, 0).is_brighter_than(10));
		assert!(Rgb::new(11, 11, 10).is_brighter_than(10));
		assert!(!Rgb::WHITE.is_brighter_than(255));
	}

	#[test]
	fn rgba_rejects_truncated_and_out_of_range_reads() {
		let buf = PixelBuffer::new(2, 1, vec![1, 2, 3, 4, 5, 6]);
		assert_eq!(buf.rgba(0, 0), Some([1, 2, 3, 4]));
		assert_eq!(buf.rgba(1, 0), None);
		assert_eq!(buf.rgba(0, 1), None);
	}
}
