//! Leptos component wrapping the particle mosaic canvas.
//!
//! The component owns one [`MosaicSession`] shared by every browser callback:
//! the `requestAnimationFrame` loop, the deferred transition timer, the
//! window resize listener and the file input. Only one frame request and one
//! transition timer are ever outstanding.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	CanvasRenderingContext2d, Event, File, HtmlCanvasElement, HtmlImageElement, HtmlInputElement,
	Url, Window,
};

use super::config::MosaicConfig;
use super::error::MosaicError;
use super::geometry::{CanvasGeometry, GeometryResolver, center_fit};
use super::particles::ParticlePool;
use super::render::CanvasSurface;
use super::sampler::Sampler;
use super::state::{AnimationDriver, TransitionTicket};
use super::types::{PixelBuffer, SamplePoint};

type Shared = Rc<RefCell<Option<MosaicSession>>>;
type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A scheduled `setTimeout` and the callback it will run.
struct TransitionTimer {
	id: i32,
	_callback: Closure<dyn FnMut()>,
}

/// Everything the browser callbacks share: surface, pool, mode and handles.
struct MosaicSession {
	canvas: HtmlCanvasElement,
	surface: Option<CanvasSurface>,
	driver: AnimationDriver,
	sampler: Sampler,
	config: MosaicConfig,
	geometry: CanvasGeometry,
	/// Last successfully decoded image, re-sampled when the raster size changes.
	image: Option<HtmlImageElement>,
	timer: Option<TransitionTimer>,
	frame_request: Option<i32>,
	/// Bumped on each upload so a slower, older decode cannot land last.
	load_seq: u64,
	rng: StdRng,
}

impl MosaicSession {
	fn new(canvas: HtmlCanvasElement, config: MosaicConfig) -> Self {
		let resolver = resolver(&config);
		let container = container_width(&canvas, config.geometry.max_display);
		let geometry = resolver.initial_square(container);
		let (w, h) = geometry.raster_size();
		let mut session = Self {
			driver: AnimationDriver::new(&config, w, h),
			sampler: Sampler::new(config.sampler.clone()),
			canvas,
			surface: None,
			config,
			geometry,
			image: None,
			timer: None,
			frame_request: None,
			load_seq: 0,
			rng: StdRng::from_entropy(),
		};
		if let Err(e) = session.resize_surface(geometry) {
			warn!("particle-mosaic: canvas not ready: {}", e);
		}
		session
	}

	/// Applies `geometry` to the visible canvas and re-acquires its context.
	///
	/// Resizing a canvas resets its context state, so the surface (and its
	/// cached fill color) is rebuilt every time. The surface is in place
	/// before the display size is styled, so a styling error leaves a
	/// drawable canvas behind.
	fn resize_surface(&mut self, geometry: CanvasGeometry) -> Result<(), MosaicError> {
		self.geometry = geometry;
		self.canvas.set_width(geometry.raster_width);
		self.canvas.set_height(geometry.raster_height);
		self.surface = None;
		self.surface = Some(CanvasSurface::new(context_2d(&self.canvas)?));
		style_display_size(&self.canvas, &geometry)
	}

	fn cancel_timer(&mut self) {
		if let Some(timer) = self.timer.take() {
			if let Some(window) = web_sys::window() {
				window.clear_timeout_with_handle(timer.id);
			}
		}
	}

	/// Square canvas with no particles, used until the first image loads.
	fn reset_to_square(&mut self) {
		self.cancel_timer();
		let container = container_width(&self.canvas, self.config.geometry.max_display);
		let geometry = resolver(&self.config).initial_square(container);
		if let Err(e) = self.resize_surface(geometry) {
			warn!("particle-mosaic: resize failed: {}", e);
		}
		let (w, h) = geometry.raster_size();
		self.driver.reset_empty(w, h);
	}

	/// Sizes the canvas to `image`, samples it and installs a fresh pool.
	fn load_image(&mut self, image: HtmlImageElement) -> Result<TransitionTicket, MosaicError> {
		let geometry =
			resolver(&self.config).fit_to_image(image.natural_width(), image.natural_height())?;
		self.resize_surface(geometry)?;

		let points = sample_image(&image, &geometry, &self.sampler)?;
		let (w, h) = geometry.raster_size();
		info!(
			"particle-mosaic: {}x{} image -> {} particles on {}x{} raster",
			image.natural_width(),
			image.natural_height(),
			points.len(),
			geometry.raster_width,
			geometry.raster_height
		);
		let pool = ParticlePool::build(points, w, h, &self.config.motion, &mut self.rng);
		self.image = Some(image);
		Ok(self.driver.install_pool(pool, w, h))
	}

	fn fail_load(&mut self, err: &MosaicError) {
		error!("particle-mosaic: load failed: {}", err);
		self.cancel_timer();
		let (w, h) = self.geometry.raster_size();
		self.driver.show_error(w, h);
	}

	fn render_frame(&mut self) {
		if let Some(surface) = self.surface.as_mut() {
			self.driver.frame(surface, &mut self.rng);
		}
	}
}

fn resolver(config: &MosaicConfig) -> GeometryResolver {
	let pixel_ratio = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
	GeometryResolver::new(&config.geometry, pixel_ratio)
}

fn container_width(canvas: &HtmlCanvasElement, fallback: f64) -> f64 {
	canvas
		.parent_element()
		.map(|p| p.client_width() as f64)
		.filter(|w| *w > 0.0)
		.unwrap_or(fallback)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MosaicError> {
	canvas
		.get_context("2d")?
		.ok_or(MosaicError::ContextUnavailable)?
		.dyn_into()
		.map_err(|_| MosaicError::ContextUnavailable)
}

/// Sets the CSS size of `canvas`; the raster size is set separately.
fn style_display_size(
	canvas: &HtmlCanvasElement,
	geometry: &CanvasGeometry,
) -> Result<(), MosaicError> {
	// Called through `HtmlElement` so leptos' `ElementExt::style` is not picked.
	let style = web_sys::HtmlElement::style(canvas);
	style.set_property("width", &format!("{}px", geometry.display_width))?;
	style.set_property("height", &format!("{}px", geometry.display_height))?;
	Ok(())
}

/// Draws `image` centered into an offscreen canvas of the raster size and
/// samples the result.
fn sample_image(
	image: &HtmlImageElement,
	geometry: &CanvasGeometry,
	sampler: &Sampler,
) -> Result<Vec<SamplePoint>, MosaicError> {
	let document = web_sys::window()
		.and_then(|w| w.document())
		.ok_or(MosaicError::NoWindow)?;
	let offscreen: HtmlCanvasElement = document
		.create_element("canvas")?
		.dyn_into()
		.map_err(|_| MosaicError::Dom("created element is not a canvas".into()))?;
	offscreen.set_width(geometry.raster_width);
	offscreen.set_height(geometry.raster_height);
	let ctx = context_2d(&offscreen)?;

	let (w, h) = geometry.raster_size();
	let aspect = image.natural_width() as f64 / image.natural_height() as f64;
	let placement = center_fit(aspect, w, h);
	ctx.draw_image_with_html_image_element_and_dw_and_dh(
		image,
		placement.x,
		placement.y,
		placement.width,
		placement.height,
	)?;

	let data = ctx.get_image_data(0.0, 0.0, w, h)?;
	let buffer = PixelBuffer::new(data.width(), data.height(), data.data().0);
	Ok(sampler.extract_points(&buffer))
}

async fn decode_image(url: &str) -> Result<HtmlImageElement, MosaicError> {
	let image = HtmlImageElement::new()?;
	image.set_src(url);
	JsFuture::from(image.decode())
		.await
		.map_err(|e| MosaicError::Decode(format!("{e:?}")))?;
	Ok(image)
}

/// Arms the one-shot transition for `ticket`, replacing any earlier timer.
fn schedule_transition(shared: &Shared, session: &mut MosaicSession, ticket: TransitionTicket) {
	session.cancel_timer();
	let Some(window) = web_sys::window() else {
		return;
	};

	let weak = Rc::downgrade(shared);
	let callback: Closure<dyn FnMut()> = Closure::new(move || {
		let Some(shared) = weak.upgrade() else {
			return;
		};
		if let Some(ref mut s) = *shared.borrow_mut() {
			s.driver.fire_transition(ticket);
		}
	});

	match window.set_timeout_with_callback_and_timeout_and_arguments_0(
		callback.as_ref().unchecked_ref(),
		session.config.transition_delay_ms,
	) {
		Ok(id) => {
			debug!(
				"particle-mosaic: transition {:?} due in {}ms",
				ticket, session.config.transition_delay_ms
			);
			session.timer = Some(TransitionTimer {
				id,
				_callback: callback,
			});
		}
		Err(e) => warn!("particle-mosaic: failed to schedule transition: {:?}", e),
	}
}

fn request_frame(shared: &Shared, animate: &FrameCallback) {
	let Some(window) = web_sys::window() else {
		return;
	};
	let Some(ref cb) = *animate.borrow() else {
		return;
	};
	match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
		Ok(id) => {
			if let Some(ref mut s) = *shared.borrow_mut() {
				s.frame_request = Some(id);
			}
		}
		Err(e) => warn!("particle-mosaic: requestAnimationFrame failed: {:?}", e),
	}
}

/// Cancels any outstanding frame and requests a new one, so two loops never
/// draw into the same canvas.
fn restart_loop(shared: &Shared, animate: &FrameCallback) {
	if let Some(ref mut s) = *shared.borrow_mut() {
		if let Some(id) = s.frame_request.take() {
			if let Some(window) = web_sys::window() {
				let _ = window.cancel_animation_frame(id);
			}
		}
		s.driver.start();
	}
	request_frame(shared, animate);
}

fn handle_resize(shared: &Shared, animate: &FrameCallback) {
	{
		let mut guard = shared.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		match s.image.clone() {
			None => s.reset_to_square(),
			Some(image) => {
				let resized = resolver(&s.config)
					.fit_to_image(image.natural_width(), image.natural_height());
				match resized {
					Ok(g)
						if (g.raster_width, g.raster_height)
							== (s.geometry.raster_width, s.geometry.raster_height) =>
					{
						return;
					}
					Ok(_) => {
						debug!("particle-mosaic: raster size changed, re-sampling");
						s.cancel_timer();
						s.driver.begin_load();
						match s.load_image(image) {
							Ok(ticket) => schedule_transition(shared, s, ticket),
							Err(e) => s.fail_load(&e),
						}
					}
					Err(e) => s.fail_load(&e),
				}
			}
		}
	}
	restart_loop(shared, animate);
}

/// Runs the whole pipeline for a chosen file.
///
/// The pending transition is revoked before decoding starts. A decode
/// failure leaves the previous pool running; any later failure replaces the
/// particles with the error glyph. The object URL is always revoked.
fn start_upload(shared: &Shared, animate: &FrameCallback, file: File) {
	let seq = {
		let mut guard = shared.borrow_mut();
		let Some(s) = guard.as_mut() else {
			return;
		};
		s.cancel_timer();
		s.load_seq += 1;
		s.driver.begin_load();
		s.load_seq
	};
	info!("particle-mosaic: loading {} ({} bytes)", file.name(), file.size());

	let url = match Url::create_object_url_with_blob(&file) {
		Ok(url) => url,
		Err(e) => {
			warn!("particle-mosaic: cannot read file: {:?}", e);
			if let Some(ref mut s) = *shared.borrow_mut() {
				if let Some(ticket) = s.driver.abort_load() {
					schedule_transition(shared, s, ticket);
				}
			}
			return;
		}
	};

	let (shared, animate) = (shared.clone(), animate.clone());
	spawn_local(async move {
		let decoded = decode_image(&url).await;
		let _ = Url::revoke_object_url(&url);

		let needs_frame = {
			let mut guard = shared.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			if s.load_seq != seq {
				debug!("particle-mosaic: dropping superseded load #{}", seq);
				return;
			}
			match decoded.and_then(|image| s.load_image(image)) {
				Ok(ticket) => schedule_transition(&shared, s, ticket),
				Err(e @ MosaicError::Decode(_)) => {
					warn!("particle-mosaic: {}", e);
					if let Some(ticket) = s.driver.abort_load() {
						schedule_transition(&shared, s, ticket);
					}
				}
				Err(e) => s.fail_load(&e),
			}
			s.driver.start()
		};
		if needs_frame {
			request_frame(&shared, &animate);
		}
	});
}

/// Renders the particle mosaic canvas and its "choose image" control.
///
/// The canvas starts as an empty square no wider than its container. Picking
/// an image scatters its sampled pixels as drifting particles, which start
/// assembling the picture after a fixed delay.
#[component]
pub fn MosaicCanvas() -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Shared = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if context_init.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window): Option<Window> = web_sys::window() else {
			error!("particle-mosaic: {}", MosaicError::NoWindow);
			return;
		};

		*context_init.borrow_mut() = Some(MosaicSession::new(canvas, MosaicConfig::default()));

		let (context_resize, animate_resize) = (context_init.clone(), animate_init.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			handle_resize(&context_resize, &animate_resize);
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let keep_running = {
				let mut guard = context_anim.borrow_mut();
				let Some(s) = guard.as_mut() else {
					return;
				};
				s.frame_request = None;
				if s.canvas.is_connected() {
					s.render_frame();
				} else {
					info!("particle-mosaic: canvas detached, stopping");
					s.cancel_timer();
					s.driver.stop();
				}
				s.driver.is_running()
			};
			if keep_running {
				request_frame(&context_anim, &animate_inner);
			}
		}));

		let needs_frame = context_init
			.borrow_mut()
			.as_mut()
			.is_some_and(|s| s.driver.start());
		if needs_frame {
			request_frame(&context_init, &animate_init);
		}
	});

	let (context_up, animate_up) = (context.clone(), animate.clone());
	let on_change = move |ev: Event| {
		let Some(input) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
		else {
			return;
		};
		let file = input.files().and_then(|files| files.get(0));
		// Clear so picking the same file again still fires `change`.
		input.set_value("");
		if let Some(file) = file {
			start_upload(&context_up, &animate_up, file);
		}
	};

	view! {
		<div class="particle-mosaic">
			<canvas node_ref=canvas_ref class="particle-mosaic-canvas" style="display: block;" />
			<label class="particle-mosaic-upload">
				"Choose image"
				<input type="file" accept="image/*" style="display: none;" on:change=on_change />
			</label>
		</div>
	}
}
