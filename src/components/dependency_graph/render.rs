//! Renderer interface and the canvas 2D implementation.
//!
//! A [`RenderFrame`] is everything a renderer needs: screen positions for
//! nodes and edge endpoints plus emphasis flags. Drawing order:
//! 1. Background
//! 2. Edges (filtered-out edges dimmed and dashed), then edge labels
//! 3. Nodes, with hover and selection rings, then node labels

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::{Color, Theme};
use super::types::{GraphEdge, GraphNode, Point, Size};

/// A node as it should appear on screen this frame.
#[derive(Clone, Debug)]
pub struct NodeFrame<'a> {
	/// The node being drawn.
	pub node: &'a GraphNode,
	/// Center in screen pixels.
	pub screen: Point,
	/// False when the active filter hides this node.
	pub visible: bool,
	/// Draw the selection ring.
	pub selected: bool,
	/// Draw the hover ring.
	pub hovered: bool,
}

/// An edge between two laid-out nodes, in screen coordinates.
#[derive(Clone, Debug)]
pub struct EdgeFrame<'a> {
	/// The edge being drawn.
	pub edge: &'a GraphEdge,
	/// Source node center in screen pixels.
	pub from: Point,
	/// Target node center in screen pixels.
	pub to: Point,
	/// False when either endpoint is filtered out.
	pub visible: bool,
}

/// Snapshot of the graph in screen space.
#[derive(Clone, Debug)]
pub struct RenderFrame<'a> {
	/// Canvas size in screen pixels.
	pub size: Size,
	/// Current zoom factor, for zoom-dependent sizing.
	pub zoom: f64,
	/// Whether a filter is active, i.e. whether `visible` flags matter.
	pub filtering: bool,
	/// Laid-out nodes in input order.
	pub nodes: Vec<NodeFrame<'a>>,
	/// Edges with both endpoints laid out.
	pub edges: Vec<EdgeFrame<'a>>,
}

/// Something that can draw a frame.
pub trait Renderer {
	/// Draw `frame`, replacing whatever was drawn before.
	fn render(&mut self, frame: &RenderFrame<'_>);
}

/// Draws frames onto an HTML canvas.
pub struct CanvasRenderer {
	ctx: CanvasRenderingContext2d,
	theme: Theme,
	scale: ScaleConfig,
}

impl CanvasRenderer {
	/// Renderer drawing into `ctx` with the given styling.
	pub fn new(ctx: CanvasRenderingContext2d, theme: Theme, scale: ScaleConfig) -> Self {
		Self { ctx, theme, scale }
	}
}

impl Renderer for CanvasRenderer {
	fn render(&mut self, frame: &RenderFrame<'_>) {
		let scale = ScaledValues::new(&self.scale, frame.zoom);

		self.ctx.set_fill_style_str(&self.theme.background.to_css());
		self.ctx
			.fill_rect(0.0, 0.0, frame.size.width, frame.size.height);

		for edge in &frame.edges {
			draw_edge(&self.ctx, &self.theme, &scale, edge);
		}
		let _ = self.ctx.set_line_dash(&js_sys::Array::new());
		for edge in &frame.edges {
			draw_edge_label(&self.ctx, &self.theme, &scale, edge);
		}
		for node in &frame.nodes {
			draw_node(&self.ctx, &self.theme, &scale, node);
		}
	}
}

fn draw_edge(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	edge: &EdgeFrame,
) {
	let delta = edge.to - edge.from;
	let dist = delta.length();
	if dist < scale.node_radius * 2.0 {
		return;
	}
	let unit = delta / dist;
	let alpha = if edge.visible { 1.0 } else { theme.dimmed_alpha };
	let color = theme.edge.with_alpha(theme.edge.a * alpha);

	if edge.visible {
		let _ = ctx.set_line_dash(&js_sys::Array::new());
	} else {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(6.0),
			&JsValue::from_f64(4.0),
		));
	}

	let start = edge.from + unit * scale.node_radius;
	let tip = edge.to - unit * scale.node_radius;
	let back = tip - unit * scale.arrow_size;

	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(scale.edge_width);
	ctx.begin_path();
	ctx.move_to(start.x, start.y);
	ctx.line_to(back.x, back.y);
	ctx.stroke();

	let side = Point::new(-unit.y, unit.x) * (scale.arrow_size * 0.5);
	ctx.set_fill_style_str(&color.to_css());
	ctx.begin_path();
	ctx.move_to(tip.x, tip.y);
	ctx.line_to(back.x + side.x, back.y + side.y);
	ctx.line_to(back.x - side.x, back.y - side.y);
	ctx.close_path();
	ctx.fill();
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	edge: &EdgeFrame,
) {
	let Some(label) = &edge.edge.label else {
		return;
	};
	if !edge.visible {
		return;
	}
	let mid = (edge.from + edge.to) / 2.0;
	ctx.set_fill_style_str(&theme.edge_label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	let _ = ctx.fill_text(label, mid.x, mid.y - 4.0);
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	theme: &Theme,
	scale: &ScaledValues,
	frame: &NodeFrame,
) {
	let Point { x, y } = frame.screen;
	let radius = scale.node_radius;
	let base = theme.node_color(frame.node.kind.as_deref());

	ctx.set_global_alpha(if frame.visible { 1.0 } else { theme.dimmed_alpha });

	if let Ok(gradient) =
		ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
	{
		let _ = gradient.add_color_stop(0.0, &base.lighten(0.4).to_css());
		let _ = gradient.add_color_stop(0.7, &base.to_css());
		let _ = gradient.add_color_stop(1.0, &base.darken(0.2).to_css());
		#[allow(deprecated)]
		ctx.set_fill_style(&gradient);
	} else {
		ctx.set_fill_style_str(&base.to_css());
	}
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.fill();

	if frame.selected {
		ring(ctx, x, y, radius + 4.0, theme.selection, 2.5);
	}
	if frame.hovered {
		ring(ctx, x, y, radius + 2.0, theme.hover, 1.5);
	}

	ctx.set_fill_style_str(&theme.label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&frame.node.label, x, y + radius + 14.0);
	ctx.set_global_alpha(1.0);
}

fn ring(ctx: &CanvasRenderingContext2d, x: f64, y: f64, radius: f64, color: Color, width: f64) {
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
	ctx.set_stroke_style_str(&color.to_css());
	ctx.set_line_width(width);
	ctx.stroke();
}
