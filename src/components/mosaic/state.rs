//! Animation state machine and per-frame driver.
//!
//! Owns the particle pool, the global [`AnimationMode`] and the single pending
//! `Ambient -> Assembling` transition. The host supplies the clock: it calls
//! [`AnimationDriver::frame`] from its frame callback and hands the
//! [`TransitionTicket`] returned by [`AnimationDriver::install_pool`] back to
//! [`AnimationDriver::fire_transition`] once the delay has elapsed.
//!
//! Transitions:
//! - `Ambient --(pending ticket fires)--> Assembling`
//! - `* --(new pool installed)--> Ambient`, with any earlier ticket revoked
//!
//! A ticket that is no longer the pending one is ignored, so a timer left
//! over from a superseded load can never switch a newer pool.

use log::{debug, info};
use rand::Rng;

use super::config::{MosaicConfig, MotionConfig, Palette};
use super::particles::ParticlePool;
use super::render::Surface;

/// Motion behavior shared by every particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AnimationMode {
	/// Random-walk drift with edge wrap-around.
	#[default]
	Ambient,
	/// Easing toward each particle's own target.
	Assembling,
}

/// Identifies one scheduled `Ambient -> Assembling` transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionTicket(u64);

/// Single owned animation session.
pub struct AnimationDriver {
	pool: ParticlePool,
	mode: AnimationMode,
	width: f64,
	height: f64,
	pending: Option<TransitionTicket>,
	/// Set while a transition revoked by [`AnimationDriver::begin_load`] has
	/// not been replaced by a new pool.
	revoked: bool,
	issued: u64,
	running: bool,
	failed: bool,
	motion: MotionConfig,
	palette: Palette,
}

impl AnimationDriver {
	pub fn new(config: &MosaicConfig, width: f64, height: f64) -> Self {
		Self {
			pool: ParticlePool::empty(),
			mode: AnimationMode::Ambient,
			width,
			height,
			pending: None,
			revoked: false,
			issued: 0,
			running: false,
			failed: false,
			motion: config.motion.clone(),
			palette: config.palette.clone(),
		}
	}

	pub fn mode(&self) -> AnimationMode {
		self.mode
	}

	pub fn pool(&self) -> &ParticlePool {
		&self.pool
	}

	pub fn canvas_size(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn pending_transition(&self) -> Option<TransitionTicket> {
		self.pending
	}

	/// Marks the loop as running. Returns `true` if the caller must request
	/// the first frame, `false` if a loop is already active.
	pub fn start(&mut self) -> bool {
		!std::mem::replace(&mut self.running, true)
	}

	/// Stops the loop and revokes any pending transition.
	pub fn stop(&mut self) {
		self.running = false;
		self.pending = None;
	}

	/// Called first on every upload: revokes the pending transition before
	/// anything else happens. Returns whether one was pending.
	pub fn begin_load(&mut self) -> bool {
		let revoked = self.pending.take();
		if let Some(ticket) = revoked {
			debug!("particle-mosaic: revoked transition {:?} for new load", ticket);
		}
		self.revoked |= revoked.is_some();
		revoked.is_some()
	}

	/// Undoes [`begin_load`](Self::begin_load) after the load failed to decode.
	///
	/// The previous pool stays in place. If the transition it was waiting on
	/// was revoked by this or any overlapping load, a fresh one is issued so
	/// the pool still assembles.
	pub fn abort_load(&mut self) -> Option<TransitionTicket> {
		if !std::mem::take(&mut self.revoked) || self.pending.is_some() {
			return None;
		}
		Some(self.issue_ticket())
	}

	/// Swaps in a freshly built pool on a canvas of the given raster size.
	///
	/// Resets to [`AnimationMode::Ambient`] and returns the ticket for the new
	/// deferred transition. Any earlier ticket is revoked.
	pub fn install_pool(
		&mut self,
		pool: ParticlePool,
		width: f64,
		height: f64,
	) -> TransitionTicket {
		info!("particle-mosaic: installing pool of {} particles", pool.len());
		self.pool = pool;
		self.width = width;
		self.height = height;
		self.mode = AnimationMode::Ambient;
		self.failed = false;
		self.revoked = false;
		self.issue_ticket()
	}

	/// Replaces the pool with an empty one on a resized canvas. Used while no
	/// image has been loaded.
	pub fn reset_empty(&mut self, width: f64, height: f64) {
		self.pool = ParticlePool::empty();
		self.width = width;
		self.height = height;
		self.mode = AnimationMode::Ambient;
		self.pending = None;
		self.revoked = false;
		self.failed = false;
	}

	/// Drops the particles and shows the error glyph until the next load.
	pub fn show_error(&mut self, width: f64, height: f64) {
		self.reset_empty(width, height);
		self.failed = true;
	}

	/// Applies a transition whose delay has elapsed.
	///
	/// Returns `false` and leaves the mode alone when `ticket` was revoked.
	pub fn fire_transition(&mut self, ticket: TransitionTicket) -> bool {
		if self.pending != Some(ticket) {
			debug!("particle-mosaic: ignoring stale transition {:?}", ticket);
			return false;
		}
		self.pending = None;
		self.mode = AnimationMode::Assembling;
		info!("particle-mosaic: assembling {} particles", self.pool.len());
		true
	}

	/// Runs one frame: clear, then advance and draw every particle.
	pub fn frame<S, R>(&mut self, surface: &mut S, rng: &mut R)
	where
		S: Surface + ?Sized,
		R: Rng + ?Sized,
	{
		surface.clear(self.width, self.height, self.palette.background);

		if self.failed {
			surface.draw_error_glyph(self.width, self.height, self.palette.error_glyph);
			return;
		}

		let (width, height, mode) = (self.width, self.height, self.mode);
		let size = self.motion.particle_size;
		for particle in self.pool.iter_mut() {
			particle.advance(width, height, mode, &self.motion, rng);
			particle.render(surface, size);
		}
	}

	fn issue_ticket(&mut self) -> TransitionTicket {
		self.issued += 1;
		let ticket = TransitionTicket(self.issued);
		self.pending = Some(ticket);
		ticket
	}
}
