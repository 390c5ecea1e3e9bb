//! Graph data structures handed to the engine by the host, plus the small
//! geometry types shared by layout, viewport and interaction.

use std::collections::HashMap;
use std::ops::{Add, Div, Mul, Sub};

use serde::Deserialize;

use super::layout::LayoutConfig;

/// A word or phrase in the analysed sentence.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier. Edges reference nodes through it.
	pub id: String,
	/// Display text, also matched by the search filter.
	pub label: String,
	/// Grammatical category (e.g. "noun", "verb"). Drives coloring and the
	/// type filter.
	#[serde(rename = "type", default)]
	pub kind: Option<String>,
}

impl GraphNode {
	/// Build a node from borrowed parts.
	pub fn new(id: &str, label: &str, kind: Option<&str>) -> Self {
		Self {
			id: id.to_string(),
			label: label.to_string(),
			kind: kind.map(str::to_string),
		}
	}
}

/// A grammatical relation between two nodes.
///
/// `source`/`target` may name ids that are not in the node list; such edges
/// are kept but ignored by layout and rendering.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphEdge {
	/// Unique edge id.
	pub id: String,
	/// Id of the head word.
	pub source: String,
	/// Id of the dependent word.
	pub target: String,
	/// Relation name (e.g. "subject").
	#[serde(default)]
	pub label: Option<String>,
}

impl GraphEdge {
	/// Build an edge from borrowed parts.
	pub fn new(id: &str, source: &str, target: &str, label: Option<&str>) -> Self {
		Self {
			id: id.to_string(),
			source: source.to_string(),
			target: target.to_string(),
			label: label.map(str::to_string),
		}
	}
}

/// How node positions are generated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
	/// Evenly spaced on a circle.
	Circle,
	/// Row-major grid.
	Grid,
	/// Spring and repulsion relaxation.
	#[default]
	Force,
}

/// Complete graph document as supplied by the host page.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphData {
	/// Words.
	pub nodes: Vec<GraphNode>,
	/// Dependency relations between words.
	pub edges: Vec<GraphEdge>,
	/// Initial layout mode.
	pub layout: LayoutMode,
	/// Viewport height in CSS pixels. The host container decides when absent.
	pub height: Option<f64>,
	/// Overrides for the layout solver.
	pub config: LayoutConfig,
}

/// A point or vector in either world or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, growing downwards.
	pub y: f64,
}

impl Point {
	/// Point from coordinates.
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Euclidean length as a vector.
	pub fn length(self) -> f64 {
		(self.x * self.x + self.y * self.y).sqrt()
	}

	/// Euclidean distance to `other`.
	pub fn distance(self, other: Point) -> f64 {
		(self - other).length()
	}

	/// True when neither coordinate is NaN or infinite.
	pub fn is_finite(self) -> bool {
		self.x.is_finite() && self.y.is_finite()
	}
}

impl Add for Point {
	type Output = Point;

	fn add(self, rhs: Point) -> Point {
		Point::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl Sub for Point {
	type Output = Point;

	fn sub(self, rhs: Point) -> Point {
		Point::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl Mul<f64> for Point {
	type Output = Point;

	fn mul(self, rhs: f64) -> Point {
		Point::new(self.x * rhs, self.y * rhs)
	}
}

impl Div<f64> for Point {
	type Output = Point;

	fn div(self, rhs: f64) -> Point {
		Point::new(self.x / rhs, self.y / rhs)
	}
}

/// Viewport dimensions in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Size {
	/// Width in pixels.
	pub width: f64,
	/// Height in pixels.
	pub height: f64,
}

impl Size {
	/// Size from dimensions.
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Midpoint of the area.
	pub fn center(self) -> Point {
		Point::new(self.width / 2.0, self.height / 2.0)
	}
}

/// World-space position of every node, keyed by node id.
pub type Positions = HashMap<String, Point>;
