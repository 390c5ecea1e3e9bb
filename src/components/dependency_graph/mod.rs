//! Interactive dependency-graph visualization.
//!
//! The engine is split into small pieces that the [`GraphState`] ties
//! together:
//! - [`layout`]: circle, grid and force-directed node placement
//! - [`viewport`]: pan/zoom transform and fit-to-view
//! - [`interaction`]: pointer state machine for panning, dragging, clicking
//!   and hovering
//! - [`filter`]: type and text visibility filters
//!
//! [`DependencyGraph`] hosts the engine on a canvas inside a Leptos view.
//!
//! # Example
//!
//! ```
//! use syntax_graph::{GraphData, GraphEdge, GraphNode, GraphState, LayoutMode, Size};
//!
//! let data = GraphData {
//!     nodes: vec![
//!         GraphNode::new("a", "Gallia", Some("noun")),
//!         GraphNode::new("b", "est", Some("verb")),
//!     ],
//!     edges: vec![GraphEdge::new("e1", "a", "b", Some("subject"))],
//!     layout: LayoutMode::Circle,
//!     ..GraphData::default()
//! };
//!
//! let state = GraphState::new(&data, Size::new(800.0, 400.0));
//! assert_eq!(state.positions().len(), 2);
//! ```

mod component;
pub mod filter;
pub mod interaction;
pub mod layout;
pub mod render;
pub mod scale;
mod state;
pub mod theme;
mod types;
pub mod viewport;

pub use component::DependencyGraph;
pub use filter::{VisibilityFilter, compute_visibility, visible_edges};
pub use interaction::{CaptureError, CaptureFlag, GraphEvent, InputCapture, PointerId, Session};
pub use layout::{LayoutConfig, compute_layout};
pub use render::{EdgeFrame, NodeFrame, RenderFrame, Renderer};
pub use state::GraphState;
pub use theme::Theme;
pub use types::{GraphData, GraphEdge, GraphNode, LayoutMode, Point, Positions, Size};
pub use viewport::Viewport;
