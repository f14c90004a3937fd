//! Image particles and the pool that owns them.
//!
//! Each particle is seeded from exactly one sample point. In ambient mode it
//! random-walks its own velocity and wraps around the canvas edges; in
//! assembling mode it eases geometrically toward the point it came from.

use rand::Rng;
use rand::seq::SliceRandom;

use super::config::MotionConfig;
use super::render::Surface;
use super::state::AnimationMode;
use super::types::{Rgb, SamplePoint};

/// A single image particle.
#[derive(Clone, Debug)]
pub struct Particle {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	target_x: f64,
	target_y: f64,
	color: Rgb,
	/// Fraction of the remaining distance covered per assembling frame.
	speed: f64,
}

impl Particle {
	/// Scatters a new particle uniformly over the canvas, homing on `point`.
	pub fn new<R: Rng + ?Sized>(
		point: SamplePoint,
		width: f64,
		height: f64,
		motion: &MotionConfig,
		rng: &mut R,
	) -> Self {
		let half_walk = motion.walk_speed / 2.0;
		Self {
			x: uniform(rng, 0.0, width),
			y: uniform(rng, 0.0, height),
			vx: uniform(rng, -half_walk, half_walk),
			vy: uniform(rng, -half_walk, half_walk),
			target_x: point.x as f64,
			target_y: point.y as f64,
			color: point.color,
			speed: uniform(rng, 0.0, motion.speed_spread) + motion.speed_min,
		}
	}

	pub fn target(&self) -> (f64, f64) {
		(self.target_x, self.target_y)
	}

	pub fn color(&self) -> Rgb {
		self.color
	}

	pub fn speed(&self) -> f64 {
		self.speed
	}

	/// Euclidean distance from the current position to the target.
	pub fn distance_to_target(&self) -> f64 {
		(self.target_x - self.x).hypot(self.target_y - self.y)
	}

	/// Advances one frame in the given mode.
	pub fn advance<R: Rng + ?Sized>(
		&mut self,
		width: f64,
		height: f64,
		mode: AnimationMode,
		motion: &MotionConfig,
		rng: &mut R,
	) {
		match mode {
			AnimationMode::Ambient => self.drift(width, height, motion, rng),
			AnimationMode::Assembling => {
				self.x += (self.target_x - self.x) * self.speed;
				self.y += (self.target_y - self.y) * self.speed;
			}
		}
	}

	fn drift<R: Rng + ?Sized>(
		&mut self,
		width: f64,
		height: f64,
		motion: &MotionConfig,
		rng: &mut R,
	) {
		self.x = wrap(self.x + self.vx, width);
		self.y = wrap(self.y + self.vy, height);

		// Random walk on the velocity itself keeps trajectories smooth.
		let jitter = motion.walk_jitter;
		self.vx += uniform(rng, -jitter, jitter);
		self.vy += uniform(rng, -jitter, jitter);
		self.vx = self.vx.clamp(-motion.walk_speed, motion.walk_speed);
		self.vy = self.vy.clamp(-motion.walk_speed, motion.walk_speed);
	}

	/// Draws the particle as an opaque square at its current position.
	pub fn render<S: Surface + ?Sized>(&self, surface: &mut S, size: f64) {
		surface.fill_rect(self.x, self.y, size, size, self.color);
	}
}

/// Toroidal wrap: past the far edge resets to 0, before 0 resets to the edge.
fn wrap(v: f64, bound: f64) -> f64 {
	if v > bound {
		0.0
	} else if v < 0.0 {
		bound
	} else {
		v
	}
}

/// Uniform sample in `[lo, hi)`, tolerating an empty range.
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	if hi > lo { rng.gen_range(lo..hi) } else { lo }
}

/// Every particle for the current image.
///
/// Pools are never edited in place: a new image (or a resize before any image
/// exists) builds a fresh pool that replaces the old one.
#[derive(Clone, Debug, Default)]
pub struct ParticlePool {
	particles: Vec<Particle>,
}

impl ParticlePool {
	pub fn empty() -> Self {
		Self::default()
	}

	/// Shuffles `points` and builds one particle per point.
	///
	/// The shuffle breaks the scan-order correlation between draw order and
	/// position.
	pub fn build<R: Rng + ?Sized>(
		mut points: Vec<SamplePoint>,
		width: f64,
		height: f64,
		motion: &MotionConfig,
		rng: &mut R,
	) -> Self {
		points.shuffle(rng);
		let particles = points
			.into_iter()
			.map(|point| Particle::new(point, width, height, motion, &mut *rng))
			.collect();
		Self { particles }
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Particle> {
		self.particles.iter()
	}

	pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Particle> {
		self.particles.iter_mut()
	}
}
