//! Pointer state machine: panning the canvas, dragging a node, clicking and
//! hovering.
//!
//! Where the pointer goes down decides the session for its whole lifetime:
//! background starts a pan, a node starts a drag. Only one session exists at a
//! time and it belongs to the pointer that opened it. Transitions return
//! [`GraphEvent`]s instead of invoking callbacks, so the host decides how to
//! surface hover and selection changes.

use log::debug;
use thiserror::Error;

use super::types::{Point, Positions};
use super::viewport::Viewport;

/// Pointer identifier as reported by the host's input system.
pub type PointerId = i32;

/// Screen distance a pointer must travel before a press on a node counts as
/// a drag instead of a click.
pub const DRAG_THRESHOLD: f64 = 3.0;

/// Zoom step applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f64 = 0.1;

/// Failure to acquire or release exclusive pointer capture.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
	/// Release was requested for a pointer that holds no capture.
	#[error("pointer {0} is not captured")]
	NotCaptured(PointerId),
	/// The host refused to grant or drop capture.
	#[error("pointer capture rejected: {0}")]
	Rejected(String),
}

/// Exclusive input capture provided by the host.
///
/// While a session holds capture, every event of that pointer is routed to the
/// graph even outside its bounds. Release failures are logged and ignored by
/// the controller.
pub trait InputCapture {
	/// Route every later event of `pointer` to the graph.
	fn acquire(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
	/// Give `pointer` back to normal hit testing.
	fn release(&mut self, pointer: PointerId) -> Result<(), CaptureError>;
}

/// Capture for hosts without a native primitive: records which pointer holds
/// the session.
#[derive(Clone, Debug, Default)]
pub struct CaptureFlag {
	holder: Option<PointerId>,
}

impl CaptureFlag {
	/// Pointer currently holding capture.
	pub fn holder(&self) -> Option<PointerId> {
		self.holder
	}
}

impl InputCapture for CaptureFlag {
	fn acquire(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
		self.holder = Some(pointer);
		Ok(())
	}

	fn release(&mut self, pointer: PointerId) -> Result<(), CaptureError> {
		if self.holder == Some(pointer) {
			self.holder = None;
			Ok(())
		} else {
			Err(CaptureError::NotCaptured(pointer))
		}
	}
}

/// The active input session.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Session {
	/// No pointer is pressed; moves only track hover.
	#[default]
	Idle,
	/// The background was pressed; moves translate the view.
	Panning {
		/// View pan when the session started or was last rebased.
		pan_origin: Point,
		/// Screen position matching `pan_origin`.
		pointer_origin: Point,
	},
	/// A node was pressed; moves carry it along in world space.
	Dragging {
		/// Node being dragged.
		node_id: String,
		/// World position of the node matching `pointer_origin`.
		node_origin: Point,
		/// Screen position where the drag was anchored.
		pointer_origin: Point,
		/// Set once the pointer has travelled past [`DRAG_THRESHOLD`].
		dragged: bool,
	},
}

/// Notifications for the host.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	/// The pointer entered a node, or left all nodes (`None`).
	Hover(Option<String>),
	/// A node was clicked. `selected` is false when the click cleared it.
	Select {
		/// Clicked node.
		node_id: String,
		/// Whether the node is selected after the click.
		selected: bool,
	},
}

/// Owns the session, hover and selection state.
#[derive(Clone, Debug)]
pub struct InteractionController {
	session: Session,
	pointer: Option<PointerId>,
	last_pointer: Point,
	hovered: Option<String>,
	selected: Option<String>,
	drag_threshold: f64,
}

impl Default for InteractionController {
	fn default() -> Self {
		Self {
			session: Session::Idle,
			pointer: None,
			last_pointer: Point::default(),
			hovered: None,
			selected: None,
			drag_threshold: DRAG_THRESHOLD,
		}
	}
}

impl InteractionController {
	/// The active session.
	pub fn session(&self) -> &Session {
		&self.session
	}

	/// True when no pan or drag is in progress.
	pub fn is_idle(&self) -> bool {
		self.session == Session::Idle
	}

	/// Node under the pointer, as last reported.
	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	/// The selected node, if any.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Start a pan or drag session. Returns false when a pointer already owns
	/// a session, in which case nothing changes.
	pub fn pointer_down(
		&mut self,
		pointer: PointerId,
		at: Point,
		hit: Option<&str>,
		viewport: &Viewport,
		positions: &Positions,
		capture: &mut dyn InputCapture,
	) -> bool {
		if !self.is_idle() || self.pointer.is_some() {
			return false;
		}

		let node = hit.and_then(|id| positions.get(id).map(|p| (id, *p)));
		self.session = match node {
			Some((id, origin)) => Session::Dragging {
				node_id: id.to_string(),
				node_origin: origin,
				pointer_origin: at,
				dragged: false,
			},
			None => Session::Panning {
				pan_origin: viewport.pan,
				pointer_origin: at,
			},
		};
		self.pointer = Some(pointer);
		self.last_pointer = at;

		if let Err(e) = capture.acquire(pointer) {
			debug!("syntax-graph: capture unavailable, tracking session manually: {e}");
		}
		true
	}

	/// Advance the active session, or track hover when idle.
	///
	/// `hit` is the node under the pointer and only matters while idle.
	pub fn pointer_move(
		&mut self,
		pointer: PointerId,
		at: Point,
		hit: Option<&str>,
		viewport: &mut Viewport,
		positions: &mut Positions,
	) -> Vec<GraphEvent> {
		if self.pointer.is_some_and(|p| p != pointer) {
			return Vec::new();
		}
		if self.pointer.is_some() {
			self.last_pointer = at;
		}

		match &mut self.session {
			Session::Idle => self.set_hover(hit).into_iter().collect(),
			Session::Panning {
				pan_origin,
				pointer_origin,
			} => {
				let pan = *pan_origin + (at - *pointer_origin);
				if pan.is_finite() {
					viewport.pan = pan;
				}
				Vec::new()
			}
			Session::Dragging {
				node_id,
				node_origin,
				pointer_origin,
				dragged,
			} => {
				if at.distance(*pointer_origin) > self.drag_threshold {
					*dragged = true;
				}
				let target = *node_origin + (at - *pointer_origin) / viewport.scale;
				if let Some(position) = positions.get_mut(node_id.as_str())
					&& target.is_finite()
				{
					*position = target;
				}
				Vec::new()
			}
		}
	}

	/// End the session. A press on a node that never became a drag toggles
	/// its selection.
	pub fn pointer_up(
		&mut self,
		pointer: PointerId,
		capture: &mut dyn InputCapture,
	) -> Vec<GraphEvent> {
		match self.finish(pointer, capture) {
			Some(Session::Dragging {
				node_id,
				dragged: false,
				..
			}) => vec![self.toggle_selection(&node_id)],
			_ => Vec::new(),
		}
	}

	/// End the session without treating it as a click (pointer cancel, lost
	/// capture).
	pub fn cancel(&mut self, pointer: PointerId, capture: &mut dyn InputCapture) {
		self.finish(pointer, capture);
	}

	/// The pointer left the canvas. Clears hover unless a session is active.
	pub fn pointer_leave(&mut self) -> Vec<GraphEvent> {
		if self.is_idle() {
			self.set_hover(None).into_iter().collect()
		} else {
			Vec::new()
		}
	}

	/// Zoom one wheel notch around `anchor`. Leaves the session untouched.
	pub fn wheel(&self, delta_y: f64, anchor: Point, viewport: &mut Viewport) {
		let factor = if delta_y > 0.0 {
			-WHEEL_ZOOM_STEP
		} else {
			WHEEL_ZOOM_STEP
		};
		viewport.zoom(factor, anchor);
	}

	/// Select `node_id`, or deselect it if it is already selected.
	pub fn toggle_selection(&mut self, node_id: &str) -> GraphEvent {
		let selected = self.selected.as_deref() != Some(node_id);
		self.selected = selected.then(|| node_id.to_string());
		GraphEvent::Select {
			node_id: node_id.to_string(),
			selected,
		}
	}

	/// Drop the selection without emitting an event.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// Drop hover and selection that refer to nodes no longer laid out.
	/// Returns `Hover(None)` when the hovered node went away.
	pub fn retain_known(&mut self, positions: &Positions) -> Option<GraphEvent> {
		if self
			.selected
			.as_ref()
			.is_some_and(|id| !positions.contains_key(id))
		{
			self.selected = None;
		}
		if self
			.hovered
			.as_ref()
			.is_some_and(|id| !positions.contains_key(id))
		{
			return self.set_hover(None);
		}
		None
	}

	/// Re-anchor the active session on new positions and view, so the next
	/// move continues from where things are now. A drag whose node vanished
	/// stops steering; its pointer still ends it without a click.
	pub fn rebase(&mut self, viewport: &Viewport, positions: &Positions) {
		let at = self.last_pointer;
		let stale = match &mut self.session {
			Session::Idle => false,
			Session::Panning {
				pan_origin,
				pointer_origin,
			} => {
				*pan_origin = viewport.pan;
				*pointer_origin = at;
				false
			}
			Session::Dragging {
				node_id,
				node_origin,
				pointer_origin,
				..
			} => match positions.get(node_id.as_str()) {
				Some(position) => {
					*node_origin = *position;
					*pointer_origin = at;
					false
				}
				None => true,
			},
		};
		if stale {
			self.session = Session::Idle;
		}
	}

	fn set_hover(&mut self, node: Option<&str>) -> Option<GraphEvent> {
		if self.hovered.as_deref() == node {
			return None;
		}
		self.hovered = node.map(str::to_string);
		Some(GraphEvent::Hover(self.hovered.clone()))
	}

	fn finish(&mut self, pointer: PointerId, capture: &mut dyn InputCapture) -> Option<Session> {
		if self.pointer != Some(pointer) {
			return None;
		}
		self.pointer = None;
		if let Err(e) = capture.release(pointer) {
			debug!("syntax-graph: ignoring capture release failure: {e}");
		}
		Some(std::mem::take(&mut self.session))
	}
}
