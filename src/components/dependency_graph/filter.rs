//! Type and text filters deciding which nodes and edges are emphasized.
//!
//! Visibility is advisory: hidden nodes keep their positions and stay
//! interactive, the renderer only dims them.

use std::collections::HashSet;

use super::types::{GraphEdge, GraphNode};

/// Filter state supplied by the host's filter chips and search box.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibilityFilter {
	/// Node types to keep. Empty keeps every type.
	pub types: HashSet<String>,
	/// Case-insensitive substring matched against labels. Empty matches all.
	pub search: String,
}

impl VisibilityFilter {
	/// Filter keeping `types` whose labels contain `search`.
	pub fn new<I, S>(types: I, search: &str) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			types: types.into_iter().map(Into::into).collect(),
			search: search.to_string(),
		}
	}

	/// Whether the filter hides anything at all.
	pub fn is_active(&self) -> bool {
		!self.types.is_empty() || !self.search.is_empty()
	}

	fn matches(&self, node: &GraphNode, needle: &str) -> bool {
		let type_ok = self.types.is_empty()
			|| node
				.kind
				.as_ref()
				.is_some_and(|kind| self.types.contains(kind));
		type_ok && (needle.is_empty() || node.label.to_lowercase().contains(needle))
	}
}

/// Ids of the nodes that pass `filter`.
pub fn compute_visibility(nodes: &[GraphNode], filter: &VisibilityFilter) -> HashSet<String> {
	let needle = filter.search.to_lowercase();
	nodes
		.iter()
		.filter(|node| filter.matches(node, &needle))
		.map(|node| node.id.clone())
		.collect()
}

/// Ids of the edges whose endpoints are both visible.
pub fn visible_edges(edges: &[GraphEdge], visible_nodes: &HashSet<String>) -> HashSet<String> {
	edges
		.iter()
		.filter(|e| visible_nodes.contains(&e.source) && visible_nodes.contains(&e.target))
		.map(|e| e.id.clone())
		.collect()
}
