//! Leptos component hosting the graph engine on a canvas.
//!
//! The component owns a [`GraphState`] and a [`CanvasRenderer`], forwards
//! pointer and wheel events to the engine, maps DOM pointer capture onto
//! [`InputCapture`], and redraws every animation frame.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, PointerEvent, WheelEvent};

use super::filter::VisibilityFilter;
use super::interaction::{CaptureError, GraphEvent, InputCapture, PointerId};
use super::render::{CanvasRenderer, Renderer};
use super::state::GraphState;
use super::theme::Theme;
use super::types::{GraphData, GraphNode, LayoutMode, Point, Size};

/// Bundles the engine with the renderer drawing it.
struct GraphContext {
	state: GraphState,
	renderer: CanvasRenderer,
}

type SharedContext = Rc<RefCell<Option<GraphContext>>>;

/// DOM pointer capture on the canvas element.
struct CanvasCapture<'a>(&'a HtmlCanvasElement);

impl InputCapture for CanvasCapture<'_> {
	fn acquire(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
		self.0
			.set_pointer_capture(pointer)
			.map_err(|e| CaptureError::Rejected(format!("{e:?}")))
	}

	fn release(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
		self.0
			.release_pointer_capture(pointer)
			.map_err(|_| CaptureError::NotCaptured(pointer))
	}
}

/// Engine events resolved to node data, ready for host callbacks.
enum Notification {
	Hover(Option<GraphNode>),
	Select(GraphNode),
}

fn resolve(state: &GraphState, events: Vec<GraphEvent>) -> Vec<Notification> {
	events
		.into_iter()
		.filter_map(|event| match event {
			GraphEvent::Hover(id) => Some(Notification::Hover(
				id.and_then(|id| state.node(&id).cloned()),
			)),
			GraphEvent::Select { node_id, .. } => {
				state.node(&node_id).cloned().map(Notification::Select)
			}
		})
		.collect()
}

fn pointer_position(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> Point {
	let rect = canvas.get_bounding_client_rect();
	Point::new(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

fn container_size(canvas: &HtmlCanvasElement, height: Option<f64>) -> Size {
	let parent = canvas.parent_element();
	Size::new(
		parent
			.as_ref()
			.map(|p| p.client_width() as f64)
			.filter(|w| *w > 0.0)
			.unwrap_or(800.0),
		height.unwrap_or_else(|| {
			parent
				.as_ref()
				.map(|p| p.client_height() as f64)
				.filter(|h| *h > 0.0)
				.unwrap_or(600.0)
		}),
	)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Renders an interactive dependency graph.
///
/// `data` and `layout` regenerate positions (and re-fit the view) when they
/// change; `filter` only changes emphasis. The canvas takes the width of its
/// parent and `height` pixels of height, or the parent's height when unset.
/// `on_hover` fires with the node under the pointer (or `None`), `on_select`
/// with a clicked node whether the click selected or deselected it.
#[component]
pub fn DependencyGraph(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(into)] layout: Signal<LayoutMode>,
	#[prop(into, default = Signal::stored(VisibilityFilter::default()))]
	filter: Signal<VisibilityFilter>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] on_hover: Option<Callback<Option<GraphNode>>>,
	#[prop(optional)] on_select: Option<Callback<GraphNode>>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: SharedContext = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init, resize_cb_init) =
		(context.clone(), animate.clone(), resize_cb.clone());

	let notify = move |notifications: Vec<Notification>| {
		for notification in notifications {
			match notification {
				Notification::Hover(node) => {
					if let Some(cb) = on_hover {
						cb.run(node);
					}
				}
				Notification::Select(node) => {
					if let Some(cb) = on_select {
						cb.run(node);
					}
				}
			}
		}
	};

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let size = container_size(&canvas, height);
		canvas.set_width(size.width as u32);
		canvas.set_height(size.height as u32);

		let Some(ctx) = context_2d(&canvas) else {
			warn!("syntax-graph: canvas 2d context unavailable");
			return;
		};

		let mut initial = data.get_untracked();
		initial.layout = layout.get_untracked();
		let mut state = GraphState::new(&initial, size);
		state.set_filter(filter.get_untracked());
		let renderer = CanvasRenderer::new(ctx, Theme::default(), state.scale_config().clone());
		*context_init.borrow_mut() = Some(GraphContext { state, renderer });

		let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
		*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
			let size = container_size(&canvas_resize, height);
			canvas_resize.set_width(size.width as u32);
			canvas_resize.set_height(size.height as u32);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(size);
			}
		}));
		if let Some(ref cb) = *resize_cb_init.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut c) = *context_anim.borrow_mut() {
				let frame = c.state.frame();
				c.renderer.render(&frame);
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref())
			{
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let context_graph = context.clone();
	Effect::new(move |_| {
		let mut graph = data.get();
		graph.layout = layout.get();
		let notifications = match *context_graph.borrow_mut() {
			Some(ref mut c) => {
				let events = c.state.set_data(graph);
				resolve(&c.state, events)
			}
			None => Vec::new(),
		};
		notify(notifications);
	});

	let context_filter = context.clone();
	Effect::new(move |_| {
		let filter = filter.get();
		if let Some(ref mut c) = *context_filter.borrow_mut() {
			c.state.set_filter(filter);
		}
	});

	let context_pd = context.clone();
	let on_pointerdown = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let at = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_pd.borrow_mut() {
			c.state
				.pointer_down(ev.pointer_id(), at, &mut CanvasCapture(&canvas));
		}
	};

	let context_pm = context.clone();
	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let at = pointer_position(&canvas, &ev);
		let notifications = match *context_pm.borrow_mut() {
			Some(ref mut c) => {
				let events = c.state.pointer_move(ev.pointer_id(), at);
				resolve(&c.state, events)
			}
			None => Vec::new(),
		};
		notify(notifications);
	};

	let context_pu = context.clone();
	let on_pointerup = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let notifications = match *context_pu.borrow_mut() {
			Some(ref mut c) => {
				let events = c
					.state
					.pointer_up(ev.pointer_id(), &mut CanvasCapture(&canvas));
				resolve(&c.state, events)
			}
			None => Vec::new(),
		};
		notify(notifications);
	};

	let context_pc = context.clone();
	let on_pointercancel = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		if let Some(ref mut c) = *context_pc.borrow_mut() {
			c.state
				.pointer_cancel(ev.pointer_id(), &mut CanvasCapture(&canvas));
		}
	};

	let context_pl = context.clone();
	let on_pointerleave = move |_: PointerEvent| {
		let notifications = match *context_pl.borrow_mut() {
			Some(ref mut c) => {
				let events = c.state.pointer_leave();
				resolve(&c.state, events)
			}
			None => Vec::new(),
		};
		notify(notifications);
	};

	let context_wh = context.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let at = pointer_position(&canvas, &ev);
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.wheel(ev.delta_y(), at);
		}
	};

	let (context_zi, context_zo, context_fit) = (context.clone(), context.clone(), context.clone());
	let on_zoom_in = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zi.borrow_mut() {
			c.state.zoom_in();
		}
	};
	let on_zoom_out = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_zo.borrow_mut() {
			c.state.zoom_out();
		}
	};
	let on_fit = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_fit.borrow_mut() {
			c.state.fit_to_view();
		}
	};

	view! {
		<div class="dependency-graph" style="position: relative; width: 100%;">
			<canvas
				node_ref=canvas_ref
				class="dependency-graph-canvas"
				on:pointerdown=on_pointerdown
				on:pointermove=on_pointermove
				on:pointerup=on_pointerup
				on:pointercancel=on_pointercancel
				on:pointerleave=on_pointerleave
				on:wheel=on_wheel
				style="display: block; cursor: grab; touch-action: none;"
			/>
			<div class="graph-controls" style="position: absolute; top: 8px; right: 8px;">
				<button on:click=on_zoom_in title="Zoom in">"+"</button>
				<button on:click=on_zoom_out title="Zoom out">"−"</button>
				<button on:click=on_fit title="Fit to view">"Fit"</button>
			</div>
		</div>
	}
}
