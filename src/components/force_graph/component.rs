//! Leptos component wrapping the arc graph canvas.
//!
//! Creates a canvas plus a tooltip overlay, converts native mouse events into
//! [`PointerEvent`]s for the state, and drives the simulation and renderer from
//! a `requestAnimationFrame` loop. The loop cancels the simulation and stops
//! rescheduling itself once the canvas is detached from the document.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, error};
use wasm_bindgen::prelude::*;
use web_sys::{
	CanvasRenderingContext2d, HtmlCanvasElement, HtmlDivElement, MouseEvent, WheelEvent, Window,
};

use super::config::EngineConfig;
use super::geometry::Point;
use super::interaction::{PointerEvent, PointerKind, Propagation};
use super::render;
use super::scheduler::FrameStatus;
use super::state::ForceGraphState;
use super::theme::Theme;
use super::tooltip::Tooltip;
use super::types::GraphData;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `MouseEvent.button` of the main (usually left) button.
const PRIMARY_BUTTON: i16 = 0;

/// Renders an interactive arc graph on a canvas element.
///
/// The component sizes itself to its parent container by default; set
/// `fullscreen = true` to fill the window and follow its size. Explicit
/// `width`/`height` override automatic sizing. A new `data` value rebuilds the
/// layout from scratch.
#[component]
pub fn ForceGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: EngineConfig,
	#[prop(optional)] theme: Option<Theme>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let tooltip_ref = NodeRef::<leptos::html::Div>::new();
	let context: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let resize_cb: FrameCallback = Rc::new(RefCell::new(None));
	let theme = theme.unwrap_or_else(|| config.theme_preset());
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let graph_data = data.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_width() as f64)
						.filter(|w| *w > 0.0)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					parent
						.as_ref()
						.map(|p| p.client_height() as f64)
						.filter(|h| *h > 0.0)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let state = match ForceGraphState::new(&graph_data, &config, w, h) {
			Ok(state) => state,
			Err(e) => {
				error!("arc-graph: cannot start layout: {e}");
				return;
			}
		};
		if let Some(mut previous) = context_init.borrow_mut().replace(state) {
			previous.cancel();
		}

		// Later runs only swap the state; the loops below keep running.
		if animate_init.borrow().is_some() {
			return;
		}

		let Some(ctx) = context_2d(&canvas) else {
			error!("arc-graph: canvas has no 2d context");
			return;
		};

		if fullscreen {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(state) = context_resize.borrow_mut().as_mut() {
					state.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (context_anim, animate_inner, resize_inner) =
			(context_init.clone(), animate_init.clone(), resize_cb_init.clone());
		let theme = theme.clone();
		let mut last_frame = js_sys::Date::now();
		let mut shown_html = String::new();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if !canvas.is_connected() {
				if let Some(state) = context_anim.borrow_mut().as_mut() {
					state.cancel();
				}
				let resize = resize_inner.borrow();
				if let (Some(window), Some(cb)) = (web_sys::window(), resize.as_ref()) {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				debug!("arc-graph: canvas detached, frame loop stopped");
				return;
			}

			let now = js_sys::Date::now();
			let dt = ((now - last_frame) / 1000.0).clamp(0.0, 0.1);
			last_frame = now;

			if let Some(state) = context_anim.borrow_mut().as_mut() {
				if state.frame(dt) != FrameStatus::Cancelled {
					render::render(state, &ctx, &theme);
				}
				if let Some(div) = tooltip_ref.get_untracked() {
					let div: HtmlDivElement = div.into();
					sync_tooltip(&div, state.tooltip(), &mut shown_html);
				}
			}

			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let dispatch = {
		let context = context.clone();
		move |ev: &MouseEvent, kind: PointerKind| {
			let Some(canvas) = canvas_ref.get_untracked() else {
				return;
			};
			let canvas: HtmlCanvasElement = canvas.into();
			let event = pointer_event(&canvas, ev, kind);
			if let Some(state) = context.borrow_mut().as_mut() {
				if state.handle_pointer(&event) == Propagation::Stop {
					ev.prevent_default();
					ev.stop_propagation();
				}
			}
		}
	};

	let on_mousedown = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if ev.button() == PRIMARY_BUTTON {
				dispatch(&ev, PointerKind::Down)
			}
		}
	};
	let on_mousemove = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| dispatch(&ev, PointerKind::Move)
	};
	let on_mouseup = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| {
			if ev.button() == PRIMARY_BUTTON {
				dispatch(&ev, PointerKind::Up)
			}
		}
	};
	let on_mouseenter = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| dispatch(&ev, PointerKind::Enter)
	};
	let on_mouseleave = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| dispatch(&ev, PointerKind::Leave)
	};
	let on_dblclick = {
		let dispatch = dispatch.clone();
		move |ev: MouseEvent| dispatch(&ev, PointerKind::DoubleClick)
	};
	let on_wheel = move |ev: WheelEvent| {
		let delta_y = ev.delta_y();
		dispatch(&ev, PointerKind::Wheel { delta_y })
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseenter=on_mouseenter
			on:mouseleave=on_mouseleave
			on:dblclick=on_dblclick
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
		<div
			node_ref=tooltip_ref
			class="tooltip"
			style="position: absolute; opacity: 0; pointer-events: none;"
		/>
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

fn pointer_event(canvas: &HtmlCanvasElement, ev: &MouseEvent, kind: PointerKind) -> PointerEvent {
	let rect = canvas.get_bounding_client_rect();
	PointerEvent::new(
		kind,
		Point::new(
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		),
		Point::new(ev.page_x() as f64, ev.page_y() as f64),
	)
}

/// Mirrors the tooltip state onto its overlay element.
fn sync_tooltip(div: &HtmlDivElement, tooltip: &Tooltip, shown_html: &mut String) {
	// Leptos' ElementExt::style shadows the DOM getter.
	let style = web_sys::HtmlElement::style(div);
	let _ = style.set_property("opacity", &tooltip.opacity().to_string());
	if tooltip.opacity() <= 0.0 {
		return;
	}

	let position = tooltip.position();
	let _ = style.set_property("left", &format!("{}px", position.x));
	let _ = style.set_property("top", &format!("{}px", position.y));
	if let Some(content) = tooltip.content() {
		let html = content.to_html();
		if html != *shown_html {
			div.set_inner_html(&html);
			*shown_html = html;
		}
	}
}
