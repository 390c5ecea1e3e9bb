//! syntax-graph: interactive dependency-graph visualization for sentence
//! analysis.
//!
//! This crate provides a headless graph engine (layout, pan/zoom, pointer
//! interaction, filtering) and a WASM canvas component that hosts it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::dependency_graph::{
	DependencyGraph, GraphData, GraphEdge, GraphEvent, GraphNode, GraphState, LayoutConfig,
	LayoutMode, Point, Positions, Size, Viewport, VisibilityFilter,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("syntax-graph: logging initialized");
}

/// Parse a graph document, logging instead of failing on malformed input.
pub fn parse_graph_data(json: &str) -> Option<GraphData> {
	match serde_json::from_str::<GraphData>(json) {
		Ok(data) => {
			info!(
				"syntax-graph: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("syntax-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...], layout?, height? }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	parse_graph_data(&json_text)
}

/// Main application component.
/// Loads the analysed sentence from the DOM and renders its dependency graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let (layout, height) = (graph_data.layout, graph_data.height);
	let graph_signal = Signal::derive(move || graph_data.clone());

	let on_hover = Callback::new(|node: Option<GraphNode>| {
		if let Some(node) = node {
			info!("syntax-graph: hover {} ({})", node.label, node.id);
		}
	});
	let on_select = Callback::new(|node: GraphNode| {
		info!("syntax-graph: clicked {} ({})", node.label, node.id);
	});

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Sentence Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="graph-page">
			<DependencyGraph
				data=graph_signal
				layout=Signal::stored(layout)
				height=height
				on_hover=on_hover
				on_select=on_select
			/>
			<p class="subtitle">
				"Drag to move words or pan the view. Scroll to zoom. Click a word to select it."
			</p>
		</div>
	}
}
