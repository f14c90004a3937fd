//! Particle mosaic component.
//!
//! Turns an uploaded image into a canvas of particles:
//! - The image is drawn centered into a raster sized from its aspect ratio
//! - Opaque, non-black pixels on a stride grid become sample points
//! - Each point seeds one particle, scattered at random over the canvas
//! - Particles drift with a random walk, then ease onto their sample points
//!
//! The algorithmic parts ([`Sampler`], [`ParticlePool`], [`GeometryResolver`],
//! [`AnimationDriver`]) have no browser dependency; [`MosaicCanvas`] wires
//! them to a canvas, `requestAnimationFrame` and `setTimeout`.
//!
//! # Example
//!
//! ```ignore
//! use particle_mosaic::MosaicCanvas;
//!
//! view! { <MosaicCanvas /> }
//! ```

mod component;
pub mod config;
pub mod error;
pub mod geometry;
pub mod particles;
pub mod render;
pub mod sampler;
pub mod state;
pub mod types;

pub use component::MosaicCanvas;
pub use config::MosaicConfig;
pub use error::MosaicError;
pub use geometry::{CanvasGeometry, GeometryResolver, Placement, center_fit};
pub use particles::{Particle, ParticlePool};
pub use render::Surface;
pub use sampler::Sampler;
pub use state::{AnimationDriver, AnimationMode, TransitionTicket};
pub use types::{PixelBuffer, Rgb, SamplePoint};
