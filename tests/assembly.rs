//! End-to-end runs of the sample -> pool -> driver pipeline without a browser.

use particle_mosaic::components::mosaic::config::SamplerConfig;
use particle_mosaic::{
	AnimationDriver, AnimationMode, MosaicConfig, ParticlePool, PixelBuffer, Rgb, Sampler, Surface,
};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Counts frames and keeps the rectangles drawn since the last clear.
#[derive(Default)]
struct FrameLog {
	frames: usize,
	rects: Vec<(f64, f64, Rgb)>,
}

impl Surface for FrameLog {
	fn clear(&mut self, _width: f64, _height: f64, _color: Rgb) {
		self.frames += 1;
		self.rects.clear();
	}

	fn fill_rect(&mut self, x: f64, y: f64, _width: f64, _height: f64, color: Rgb) {
		self.rects.push((x, y, color));
	}

	fn draw_error_glyph(&mut self, _width: f64, _height: f64, _color: Rgb) {}
}

const WHITE: [u8; 4] = [255, 255, 255, 255];
const BLACK: [u8; 4] = [0, 0, 0, 255];

/// 60 frames per second over the 2000ms transition delay.
const FRAMES_BEFORE_TRANSITION: usize = 120;

fn stride_one() -> Sampler {
	Sampler::new(SamplerConfig {
		stride: 1,
		..SamplerConfig::default()
	})
}

#[test]
fn two_by_two_image_assembles_onto_white_pixels() {
	let config = MosaicConfig::default();
	let mut rng = StdRng::seed_from_u64(42);

	let pixels: Vec<u8> = [WHITE, BLACK, WHITE, BLACK].concat();
	let points = stride_one().extract_points(&PixelBuffer::new(2, 2, pixels));
	let mut coords: Vec<_> = points.iter().map(|p| (p.x, p.y)).collect();
	coords.sort();
	assert_eq!(coords, vec![(0, 0), (0, 1)]);
	assert!(points.iter().all(|p| p.color == Rgb::WHITE));

	let pool = ParticlePool::build(points, 2.0, 2.0, &config.motion, &mut rng);
	assert_eq!(pool.len(), 2);

	let mut driver = AnimationDriver::new(&config, 2.0, 2.0);
	let ticket = driver.install_pool(pool, 2.0, 2.0);
	assert!(driver.start());

	let mut surface = FrameLog::default();
	for _ in 0..FRAMES_BEFORE_TRANSITION {
		driver.frame(&mut surface, &mut rng);
		assert_eq!(driver.mode(), AnimationMode::Ambient);
	}

	assert!(driver.fire_transition(ticket));
	for _ in 0..600 {
		driver.frame(&mut surface, &mut rng);
	}

	assert_eq!(surface.frames, FRAMES_BEFORE_TRANSITION + 600);
	assert_eq!(surface.rects.len(), 2);
	for particle in driver.pool().iter() {
		assert!(particle.distance_to_target() < 1e-6);
	}
}

#[test]
fn superseded_transition_never_reaches_the_new_pool() {
	let config = MosaicConfig::default();
	let mut rng = StdRng::seed_from_u64(7);
	let sampler = stride_one();
	let buffer = PixelBuffer::new(3, 1, [WHITE, WHITE, WHITE].concat());

	let mut driver = AnimationDriver::new(&config, 3.0, 1.0);
	let first = driver.install_pool(
		ParticlePool::build(sampler.extract_points(&buffer), 3.0, 1.0, &config.motion, &mut rng),
		3.0,
		1.0,
	);

	// Second upload arrives while the first delay is still running.
	driver.begin_load();
	let second = driver.install_pool(
		ParticlePool::build(sampler.extract_points(&buffer), 3.0, 1.0, &config.motion, &mut rng),
		3.0,
		1.0,
	);

	let mut surface = FrameLog::default();
	assert!(!driver.fire_transition(first));
	for _ in 0..50 {
		driver.frame(&mut surface, &mut rng);
		assert_eq!(driver.mode(), AnimationMode::Ambient);
	}

	assert!(driver.fire_transition(second));
	assert_eq!(driver.mode(), AnimationMode::Assembling);
}

#[test]
fn transparent_image_runs_an_empty_loop() {
	let config = MosaicConfig::default();
	let mut rng = StdRng::seed_from_u64(3);
	let buffer = PixelBuffer::new(4, 4, vec![0; 64]);

	let points = Sampler::default().extract_points(&buffer);
	assert!(points.is_empty());

	let mut driver = AnimationDriver::new(&config, 4.0, 4.0);
	let ticket = driver.install_pool(
		ParticlePool::build(points, 4.0, 4.0, &config.motion, &mut rng),
		4.0,
		4.0,
	);
	let mut surface = FrameLog::default();
	driver.frame(&mut surface, &mut rng);
	assert!(driver.fire_transition(ticket));
	driver.frame(&mut surface, &mut rng);

	assert_eq!(surface.frames, 2);
	assert!(surface.rects.is_empty());
}
