//! particle-mosaic: upload an image and watch it assemble from particles.
//!
//! This crate provides a WASM canvas component that samples an image into
//! colored points, scatters one particle per point in a drifting swirl, and
//! after a short delay eases every particle onto its point to rebuild the
//! picture as a mosaic.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info};

// Enables getrandom's browser entropy source for `rand` on wasm32.
use getrandom as _;

pub mod components;

pub use components::mosaic::{
	AnimationDriver, AnimationMode, MosaicCanvas, MosaicConfig, MosaicError, ParticlePool,
	PixelBuffer, Rgb, SamplePoint, Sampler, Surface,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("particle-mosaic: logging initialized");
}

/// Main application component.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Particle Mosaic" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="mosaic-page">
			<h1>"Particle Mosaic"</h1>
			<p class="subtitle">"Choose an image and watch the particles assemble it."</p>
			<MosaicCanvas />
		</main>
	}
}
