//! The graph engine: layout, viewport, interaction and filter state in one
//! explicit object.
//!
//! The host feeds it data and input events and reads a [`RenderFrame`] back
//! after every mutation. Nothing here touches the DOM, so the whole engine
//! runs headless under test.

use std::collections::HashSet;

use log::debug;

use super::filter::{VisibilityFilter, compute_visibility, visible_edges};
use super::interaction::{GraphEvent, InputCapture, InteractionController, PointerId, Session};
use super::layout::{LayoutConfig, compute_layout};
use super::render::{EdgeFrame, NodeFrame, RenderFrame};
use super::scale::{ScaleConfig, ScaledValues};
use super::types::{GraphData, GraphEdge, GraphNode, LayoutMode, Point, Positions, Size};
use super::viewport::{FIT_PADDING, Viewport};

/// Zoom step used by the zoom buttons.
pub const BUTTON_ZOOM_STEP: f64 = 0.2;

/// Core graph state combining layout, view transform, interaction and
/// filtering.
pub struct GraphState {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	mode: LayoutMode,
	layout_config: LayoutConfig,
	positions: Positions,
	viewport: Viewport,
	size: Size,
	interaction: InteractionController,
	filter: VisibilityFilter,
	visible_nodes: HashSet<String>,
	visible_edges: HashSet<String>,
	scale: ScaleConfig,
}

impl GraphState {
	/// Lay out `data` for a viewport of `size` and fit the view to it.
	pub fn new(data: &GraphData, size: Size) -> Self {
		let mut state = Self {
			nodes: data.nodes.clone(),
			edges: data.edges.clone(),
			mode: data.layout,
			layout_config: data.config.clone(),
			positions: Positions::new(),
			viewport: Viewport::default(),
			size,
			interaction: InteractionController::default(),
			filter: VisibilityFilter::default(),
			visible_nodes: HashSet::new(),
			visible_edges: HashSet::new(),
			scale: ScaleConfig::default(),
		};
		state.regenerate();
		state
	}

	/// Replace graph, layout mode and layout config in one go, laying out at
	/// most once. Nothing is regenerated when all three are unchanged, so
	/// drags survive redundant updates.
	pub fn set_data(&mut self, data: GraphData) -> Vec<GraphEvent> {
		let GraphData {
			nodes,
			edges,
			layout,
			config,
			..
		} = data;
		let mut changed = false;
		if self.nodes != nodes || self.edges != edges {
			self.nodes = nodes;
			self.edges = edges;
			changed = true;
		}
		if self.mode != layout {
			self.mode = layout;
			changed = true;
		}
		if self.layout_config != config {
			self.layout_config = config;
			changed = true;
		}
		if !changed {
			return Vec::new();
		}
		self.regenerate()
	}

	/// Replace nodes and edges. Positions are regenerated only if the graph
	/// actually changed.
	pub fn set_graph(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Vec<GraphEvent> {
		if self.nodes == nodes && self.edges == edges {
			return Vec::new();
		}
		self.nodes = nodes;
		self.edges = edges;
		self.regenerate()
	}

	/// Switch layout algorithm and regenerate positions.
	pub fn set_layout_mode(&mut self, mode: LayoutMode) -> Vec<GraphEvent> {
		if self.mode == mode {
			return Vec::new();
		}
		self.mode = mode;
		self.regenerate()
	}

	/// Replace the layout tuning and regenerate positions.
	pub fn set_layout_config(&mut self, config: LayoutConfig) -> Vec<GraphEvent> {
		if self.layout_config == config {
			return Vec::new();
		}
		self.layout_config = config;
		self.regenerate()
	}

	/// Apply a new filter. Positions and view are untouched.
	pub fn set_filter(&mut self, filter: VisibilityFilter) {
		self.filter = filter;
		self.refresh_visibility();
	}

	/// Track a new viewport size. Positions and transform are left alone.
	pub fn resize(&mut self, size: Size) {
		self.size = size;
	}

	/// Translate the view by a screen-space delta.
	pub fn pan_by(&mut self, delta: Point) {
		self.viewport.pan_by(delta);
	}

	/// Zoom in one button step around the viewport center.
	pub fn zoom_in(&mut self) {
		self.viewport.zoom(BUTTON_ZOOM_STEP, self.size.center());
	}

	/// Zoom out one button step around the viewport center.
	pub fn zoom_out(&mut self) {
		self.viewport.zoom(-BUTTON_ZOOM_STEP, self.size.center());
	}

	/// Frame every node in the viewport.
	pub fn fit_to_view(&mut self) {
		self.viewport
			.fit_to_view(&self.positions, self.size, FIT_PADDING);
	}

	/// Deselect without emitting an event.
	pub fn clear_selection(&mut self) {
		self.interaction.clear_selection();
	}

	/// Node under a screen point, preferring the closest when pick areas
	/// overlap.
	pub fn node_at(&self, screen: Point) -> Option<&str> {
		let hit_radius = ScaledValues::new(&self.scale, self.viewport.scale).hit_radius;
		self.positions
			.iter()
			.map(|(id, p)| (id, self.viewport.world_to_screen(*p).distance(screen)))
			.filter(|(_, d)| *d < hit_radius)
			.min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(b.0)))
			.map(|(id, _)| id.as_str())
	}

	/// Press at a screen point. Returns false if a session is already active.
	pub fn pointer_down(
		&mut self,
		pointer: PointerId,
		at: Point,
		capture: &mut dyn InputCapture,
	) -> bool {
		let hit = self.node_at(at).map(str::to_string);
		self.interaction.pointer_down(
			pointer,
			at,
			hit.as_deref(),
			&self.viewport,
			&self.positions,
			capture,
		)
	}

	/// Move the pointer to a screen point.
	pub fn pointer_move(&mut self, pointer: PointerId, at: Point) -> Vec<GraphEvent> {
		let hit = if self.interaction.is_idle() {
			self.node_at(at).map(str::to_string)
		} else {
			None
		};
		self.interaction.pointer_move(
			pointer,
			at,
			hit.as_deref(),
			&mut self.viewport,
			&mut self.positions,
		)
	}

	/// Lift the pointer, reporting a selection change for a click.
	pub fn pointer_up(
		&mut self,
		pointer: PointerId,
		capture: &mut dyn InputCapture,
	) -> Vec<GraphEvent> {
		self.interaction.pointer_up(pointer, capture)
	}

	/// Abort the pointer's session without selecting.
	pub fn pointer_cancel(&mut self, pointer: PointerId, capture: &mut dyn InputCapture) {
		self.interaction.cancel(pointer, capture);
	}

	/// The pointer left the canvas.
	pub fn pointer_leave(&mut self) -> Vec<GraphEvent> {
		self.interaction.pointer_leave()
	}

	/// Zoom one wheel notch around the cursor.
	pub fn wheel(&mut self, delta_y: f64, at: Point) {
		self.interaction.wheel(delta_y, at, &mut self.viewport);
	}

	/// Node by id.
	pub fn node(&self, id: &str) -> Option<&GraphNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Nodes as supplied.
	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	/// Edges as supplied, dangling ones included.
	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	/// Current layout algorithm.
	pub fn mode(&self) -> LayoutMode {
		self.mode
	}

	/// World positions keyed by node id.
	pub fn positions(&self) -> &Positions {
		&self.positions
	}

	/// Current view transform.
	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	/// Viewport size in screen pixels.
	pub fn size(&self) -> Size {
		self.size
	}

	/// The active pointer session.
	pub fn session(&self) -> &Session {
		self.interaction.session()
	}

	/// The selected node id.
	pub fn selected(&self) -> Option<&str> {
		self.interaction.selected()
	}

	/// The hovered node id.
	pub fn hovered(&self) -> Option<&str> {
		self.interaction.hovered()
	}

	/// Ids passing the current filter.
	pub fn visible_nodes(&self) -> &HashSet<String> {
		&self.visible_nodes
	}

	/// Base sizes used for hit testing and drawing.
	pub fn scale_config(&self) -> &ScaleConfig {
		&self.scale
	}

	/// Screen-space snapshot for a renderer. Dangling edges are left out.
	pub fn frame(&self) -> RenderFrame<'_> {
		let mut seen = HashSet::new();
		let nodes = self
			.nodes
			.iter()
			.filter(|n| seen.insert(n.id.as_str()))
			.filter_map(|node| {
				let world = self.positions.get(&node.id)?;
				Some(NodeFrame {
					node,
					screen: self.viewport.world_to_screen(*world),
					visible: self.visible_nodes.contains(&node.id),
					selected: self.selected() == Some(node.id.as_str()),
					hovered: self.hovered() == Some(node.id.as_str()),
				})
			})
			.collect();

		let edges = self
			.edges
			.iter()
			.filter_map(|edge| {
				let from = self.positions.get(&edge.source)?;
				let to = self.positions.get(&edge.target)?;
				Some(EdgeFrame {
					edge,
					from: self.viewport.world_to_screen(*from),
					to: self.viewport.world_to_screen(*to),
					visible: self.visible_edges.contains(&edge.id),
				})
			})
			.collect();

		RenderFrame {
			size: self.size,
			zoom: self.viewport.scale,
			filtering: self.filter.is_active(),
			nodes,
			edges,
		}
	}

	fn regenerate(&mut self) -> Vec<GraphEvent> {
		self.positions = compute_layout(
			&self.nodes,
			&self.edges,
			self.mode,
			self.size,
			&self.layout_config,
		);
		let events = self.interaction.retain_known(&self.positions);
		self.refresh_visibility();
		self.fit_to_view();
		self.interaction.rebase(&self.viewport, &self.positions);
		debug!(
			"syntax-graph: fitted view to {} nodes (scale {:.2})",
			self.positions.len(),
			self.viewport.scale
		);
		events.into_iter().collect()
	}

	fn refresh_visibility(&mut self) {
		self.visible_nodes = compute_visibility(&self.nodes, &self.filter);
		self.visible_edges = visible_edges(&self.edges, &self.visible_nodes);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::dependency_graph::interaction::CaptureFlag;

	fn sentence() -> GraphData {
		GraphData {
			nodes: vec![
				GraphNode::new("a", "Gallia", Some("noun")),
				GraphNode::new("b", "est", Some("verb")),
				GraphNode::new("c", "omnis", Some("adjective")),
			],
			edges: vec![
				GraphEdge::new("e1", "a", "b", Some("subject")),
				GraphEdge::new("e2", "c", "a", Some("modifier")),
				GraphEdge::new("e3", "b", "ghost", None),
			],
			layout: LayoutMode::Circle,
			..GraphData::default()
		}
	}

	#[test]
	fn test_new_state_fits_view() {
		let state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		assert_eq!(state.positions().len(), 3);
		assert!(state.viewport().scale >= 0.4 && state.viewport().scale <= 2.0);
		assert!(state.viewport().pan.is_finite());
	}

	#[test]
	fn test_empty_state_is_usable() {
		let mut state = GraphState::new(&GraphData::default(), Size::new(800.0, 400.0));
		state.fit_to_view();
		state.zoom_in();
		let viewport = state.viewport();
		assert!((viewport.scale - 1.2).abs() < 1e-12);
		assert!(viewport.pan.distance(Point::new(-80.0, -40.0)) < 1e-9);
		assert!(state.frame().nodes.is_empty());
		assert!(state.node_at(Point::new(400.0, 200.0)).is_none());
	}

	#[test]
	fn test_frame_skips_dangling_edges() {
		let state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let frame = state.frame();
		let ids: Vec<_> = frame.edges.iter().map(|e| e.edge.id.as_str()).collect();
		assert_eq!(ids, ["e1", "e2"]);
		assert_eq!(state.edges().len(), 3);
	}

	#[test]
	fn test_node_at_uses_screen_positions() {
		let state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let screen = state.viewport().world_to_screen(state.positions()["b"]);
		assert_eq!(state.node_at(screen), Some("b"));
		assert_eq!(state.node_at(screen + Point::new(5.0, -5.0)), Some("b"));
		assert_eq!(state.node_at(Point::new(-500.0, -500.0)), None);
	}

	#[test]
	fn test_click_on_node_selects_it() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let mut capture = CaptureFlag::default();
		let at = state.viewport().world_to_screen(state.positions()["a"]);

		assert!(state.pointer_down(1, at, &mut capture));
		let events = state.pointer_up(1, &mut capture);
		assert_eq!(
			events,
			vec![GraphEvent::Select {
				node_id: "a".into(),
				selected: true
			}]
		);
		assert_eq!(state.selected(), Some("a"));
		assert!(state.frame().nodes.iter().any(|n| n.node.id == "a" && n.selected));
	}

	#[test]
	fn test_filter_only_changes_visibility() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let positions = state.positions().clone();
		let viewport = *state.viewport();

		state.set_filter(VisibilityFilter::new(["noun", "verb"], ""));
		assert_eq!(state.positions(), &positions);
		assert_eq!(state.viewport(), &viewport);

		let frame = state.frame();
		assert!(frame.filtering);
		let visible: Vec<_> = frame
			.nodes
			.iter()
			.filter(|n| n.visible)
			.map(|n| n.node.id.as_str())
			.collect();
		assert_eq!(visible, ["a", "b"]);
		let edges: Vec<_> = frame
			.edges
			.iter()
			.map(|e| (e.edge.id.as_str(), e.visible))
			.collect();
		assert_eq!(edges, [("e1", true), ("e2", false)]);
	}

	#[test]
	fn test_layout_change_regenerates_and_keeps_same_graph_stable() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let mut capture = CaptureFlag::default();
		let at = state.viewport().world_to_screen(state.positions()["a"]);
		state.pointer_down(1, at, &mut capture);
		state.pointer_move(1, at + Point::new(40.0, 0.0));
		state.pointer_up(1, &mut capture);
		let dragged = state.positions().clone();

		let data = sentence();
		state.set_graph(data.nodes.clone(), data.edges.clone());
		assert_eq!(state.positions(), &dragged);

		state.set_layout_mode(LayoutMode::Grid);
		assert_eq!(state.mode(), LayoutMode::Grid);
		assert_ne!(state.positions(), &dragged);
		assert_eq!(state.positions().len(), 3);
	}

	#[test]
	fn test_removed_selection_is_cleared() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let mut capture = CaptureFlag::default();
		let at = state.viewport().world_to_screen(state.positions()["c"]);
		state.pointer_down(1, at, &mut capture);
		state.pointer_up(1, &mut capture);
		assert_eq!(state.selected(), Some("c"));

		let data = sentence();
		state.set_graph(data.nodes[..2].to_vec(), data.edges);
		assert_eq!(state.selected(), None);
		assert_eq!(state.positions().len(), 2);
	}

	#[test]
	fn test_removing_hovered_node_reports_hover_end() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let at = state.viewport().world_to_screen(state.positions()["c"]);
		assert_eq!(state.pointer_move(1, at), vec![GraphEvent::Hover(Some("c".into()))]);

		let data = sentence();
		let events = state.set_graph(data.nodes[..2].to_vec(), data.edges);
		assert_eq!(events, vec![GraphEvent::Hover(None)]);
		assert_eq!(state.hovered(), None);
	}

	#[test]
	fn test_set_data_applies_everything_at_once() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let mut capture = CaptureFlag::default();
		let at = state.viewport().world_to_screen(state.positions()["a"]);
		state.pointer_down(1, at, &mut capture);
		state.pointer_move(1, at + Point::new(40.0, 0.0));
		state.pointer_up(1, &mut capture);
		let dragged = state.positions().clone();
		assert!(state.set_data(sentence()).is_empty());
		assert_eq!(state.positions(), &dragged);

		let mut data = sentence();
		data.nodes.pop();
		data.layout = LayoutMode::Grid;
		data.config.grid_min_spacing = 150.0;
		state.set_data(data.clone());
		let fresh = GraphState::new(&data, Size::new(800.0, 400.0));
		assert_eq!(state.mode(), LayoutMode::Grid);
		assert_eq!(state.positions(), fresh.positions());
		assert_eq!(state.viewport(), fresh.viewport());
	}

	#[test]
	fn test_drag_survives_regeneration() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let mut capture = CaptureFlag::default();
		let at = state.viewport().world_to_screen(state.positions()["a"]);
		state.pointer_down(1, at, &mut capture);
		state.pointer_move(1, at + Point::new(10.0, 0.0));

		state.set_layout_mode(LayoutMode::Grid);
		let regenerated = state.positions()["a"];
		let scale = state.viewport().scale;
		state.pointer_move(1, at + Point::new(10.0, 20.0));
		let expected = regenerated + Point::new(0.0, 20.0) / scale;
		assert!(state.positions()["a"].distance(expected) < 1e-9);
		assert!(state.pointer_up(1, &mut capture).is_empty());
	}

	#[test]
	fn test_pan_by_moves_every_node_on_screen() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let before = state.frame().nodes[0].screen;
		state.pan_by(Point::new(-20.0, 10.0));
		let after = state.frame().nodes[0].screen;
		assert!(after.distance(before + Point::new(-20.0, 10.0)) < 1e-9);
	}

	#[test]
	fn test_zoom_buttons_anchor_on_center() {
		let mut state = GraphState::new(&sentence(), Size::new(800.0, 400.0));
		let center = state.size().center();
		let before = state.viewport().screen_to_world(center);
		state.zoom_in();
		state.zoom_out();
		let after = state.viewport().screen_to_world(center);
		assert!(before.distance(after) < 1e-9);
	}
}
