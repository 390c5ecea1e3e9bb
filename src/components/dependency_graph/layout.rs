//! Node placement: circle, grid and force-directed layouts.
//!
//! The force layout starts from the circle arrangement and relaxes it with a
//! fixed number of steps of pairwise `1/d²` repulsion plus linear springs
//! along edges. There is no velocity or cooling: every step moves nodes by the
//! summed force directly, so the outcome depends only on the input ordering.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use log::debug;
use serde::Deserialize;

use super::types::{GraphEdge, GraphNode, LayoutMode, Point, Positions, Size};

/// Tunable parameters for the layout solvers.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
	/// Relaxation steps run by the force layout.
	pub iterations: usize,
	/// Repulsion strength; force magnitude is `repulsion / d²`.
	pub repulsion: f64,
	/// Spring constant applied to `(d - rest_length)`.
	pub spring: f64,
	/// Target edge length in world units.
	pub rest_length: f64,
	/// Floor on squared distance in the repulsion term.
	pub min_distance_sq: f64,
	/// Smallest cell size of the grid layout.
	pub grid_min_spacing: f64,
	/// Circle radius as a fraction of the smaller viewport side.
	pub circle_radius_ratio: f64,
	/// Largest distance a node may move in one relaxation step.
	pub max_step: f64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			iterations: 200,
			repulsion: 1000.0,
			spring: 0.05,
			rest_length: 120.0,
			min_distance_sq: 25.0,
			grid_min_spacing: 80.0,
			circle_radius_ratio: 0.33,
			max_step: 100.0,
		}
	}
}

/// Compute a position for every distinct node id.
///
/// Edges whose endpoints are not both present are ignored. Duplicate node ids
/// keep the slot of their first occurrence.
pub fn compute_layout(
	nodes: &[GraphNode],
	edges: &[GraphEdge],
	mode: LayoutMode,
	size: Size,
	config: &LayoutConfig,
) -> Positions {
	let ids = distinct_ids(nodes);
	if ids.is_empty() {
		return Positions::new();
	}

	let points = match mode {
		LayoutMode::Circle => circle_points(ids.len(), size, config),
		LayoutMode::Grid => grid_points(ids.len(), size, config),
		LayoutMode::Force => {
			let mut points = circle_points(ids.len(), size, config);
			let springs = springs(&ids, edges);
			for _ in 0..config.iterations {
				relax_step(&mut points, &springs, config);
			}
			points
		}
	};

	debug!(
		"syntax-graph: {:?} layout for {} nodes, {} edges",
		mode,
		ids.len(),
		edges.len()
	);

	ids.into_iter()
		.map(str::to_string)
		.zip(points)
		.collect()
}

fn distinct_ids(nodes: &[GraphNode]) -> Vec<&str> {
	let mut seen = HashSet::new();
	nodes
		.iter()
		.map(|n| n.id.as_str())
		.filter(|id| seen.insert(*id))
		.collect()
}

/// Evenly spaced points on a circle around the viewport center.
pub fn circle_points(count: usize, size: Size, config: &LayoutConfig) -> Vec<Point> {
	let center = size.center();
	let radius = config.circle_radius_ratio * size.width.min(size.height);
	(0..count)
		.map(|i| {
			let angle = 2.0 * PI * i as f64 / count as f64;
			Point::new(
				center.x + radius * angle.cos(),
				center.y + radius * angle.sin(),
			)
		})
		.collect()
}

/// Row-major grid with `ceil(sqrt(n))` columns, each node centered in its cell.
pub fn grid_points(count: usize, size: Size, config: &LayoutConfig) -> Vec<Point> {
	if count == 0 {
		return Vec::new();
	}
	let cols = (count as f64).sqrt().ceil() as usize;
	let spacing_x = config.grid_min_spacing.max(size.width / cols as f64);
	let spacing_y = config.grid_min_spacing.max(size.height / cols as f64);
	(0..count)
		.map(|i| {
			let (row, col) = (i / cols, i % cols);
			Point::new(
				(col as f64 + 0.5) * spacing_x,
				(row as f64 + 0.5) * spacing_y,
			)
		})
		.collect()
}

/// Resolve edges to index pairs, dropping dangling edges and self-loops.
pub fn springs(ids: &[&str], edges: &[GraphEdge]) -> Vec<(usize, usize)> {
	let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
	edges
		.iter()
		.filter_map(|e| {
			let src = *index.get(e.source.as_str())?;
			let tgt = *index.get(e.target.as_str())?;
			(src != tgt).then_some((src, tgt))
		})
		.collect()
}

/// Spreads coincident pairs over the circle without repeating directions.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// One relaxation step of the force layout, applied in place.
pub fn relax_step(points: &mut [Point], springs: &[(usize, usize)], config: &LayoutConfig) {
	let n = points.len();
	let mut forces = vec![Point::default(); n];

	for i in 0..n {
		for j in (i + 1)..n {
			let delta = points[i] - points[j];
			let dist_sq = delta.x * delta.x + delta.y * delta.y;
			// Coincident nodes have no direction; each pair gets its own.
			let dir = if dist_sq > f64::EPSILON {
				delta / dist_sq.sqrt()
			} else {
				let angle = GOLDEN_ANGLE * (i * n + j) as f64;
				Point::new(angle.cos(), angle.sin())
			};
			let push = dir * (config.repulsion / dist_sq.max(config.min_distance_sq));
			forces[i] = forces[i] + push;
			forces[j] = forces[j] - push;
		}
	}

	for &(src, tgt) in springs {
		let delta = points[tgt] - points[src];
		let dist = delta.length();
		if dist <= f64::EPSILON {
			continue;
		}
		let pull = delta / dist * ((dist - config.rest_length) * config.spring);
		forces[src] = forces[src] + pull;
		forces[tgt] = forces[tgt] - pull;
	}

	for (point, force) in points.iter_mut().zip(forces) {
		let len = force.length();
		let step = if len > config.max_step {
			force * (config.max_step / len)
		} else {
			force
		};
		*point = *point + step;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> GraphNode {
		GraphNode::new(id, id, None)
	}

	fn close(a: Point, b: Point) -> bool {
		a.distance(b) < 1e-9
	}

	#[test]
	fn test_empty_graph_has_no_positions() {
		for mode in [LayoutMode::Circle, LayoutMode::Grid, LayoutMode::Force] {
			let positions =
				compute_layout(&[], &[], mode, Size::new(800.0, 400.0), &LayoutConfig::default());
			assert!(positions.is_empty());
		}
	}

	#[test]
	fn test_circle_layout_places_nodes_on_radius() {
		let nodes = vec![node("a"), node("b"), node("c"), node("d")];
		let positions = compute_layout(
			&nodes,
			&[],
			LayoutMode::Circle,
			Size::new(800.0, 400.0),
			&LayoutConfig::default(),
		);
		assert!(close(positions["a"], Point::new(532.0, 200.0)));
		assert!(close(positions["b"], Point::new(400.0, 332.0)));
		assert!(close(positions["c"], Point::new(268.0, 200.0)));
		assert!(close(positions["d"], Point::new(400.0, 68.0)));
	}

	#[test]
	fn test_grid_layout_is_row_major() {
		let nodes: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(node).collect();
		let positions = compute_layout(
			&nodes,
			&[],
			LayoutMode::Grid,
			Size::new(600.0, 300.0),
			&LayoutConfig::default(),
		);
		// 3 columns: 600/3 = 200 wide, max(80, 300/3) = 100 tall.
		assert!(close(positions["a"], Point::new(100.0, 50.0)));
		assert!(close(positions["c"], Point::new(500.0, 50.0)));
		assert!(close(positions["d"], Point::new(100.0, 150.0)));
		assert!(close(positions["e"], Point::new(300.0, 150.0)));
	}

	#[test]
	fn test_grid_spacing_respects_minimum() {
		let nodes: Vec<_> = ["a", "b", "c", "d"].into_iter().map(node).collect();
		let positions = compute_layout(
			&nodes,
			&[],
			LayoutMode::Grid,
			Size::new(100.0, 100.0),
			&LayoutConfig::default(),
		);
		assert!(close(positions["a"], Point::new(40.0, 40.0)));
		assert!(close(positions["d"], Point::new(120.0, 120.0)));
	}

	#[test]
	fn test_dangling_edges_do_not_affect_force_layout() {
		let nodes = vec![node("a"), node("b"), node("c")];
		let edges = vec![GraphEdge::new("e1", "a", "b", None)];
		let mut with_dangling = edges.clone();
		with_dangling.push(GraphEdge::new("e2", "a", "ghost", None));
		with_dangling.push(GraphEdge::new("e3", "ghost", "c", None));

		let size = Size::new(640.0, 480.0);
		let config = LayoutConfig::default();
		let clean = compute_layout(&nodes, &edges, LayoutMode::Force, size, &config);
		let noisy = compute_layout(&nodes, &with_dangling, LayoutMode::Force, size, &config);
		assert_eq!(clean, noisy);
	}

	#[test]
	fn test_force_layout_is_deterministic() {
		let nodes: Vec<_> = ["a", "b", "c", "d"].into_iter().map(node).collect();
		let edges = vec![
			GraphEdge::new("e1", "a", "b", None),
			GraphEdge::new("e2", "b", "c", None),
			GraphEdge::new("e3", "c", "a", None),
		];
		let size = Size::new(500.0, 500.0);
		let config = LayoutConfig::default();
		let first = compute_layout(&nodes, &edges, LayoutMode::Force, size, &config);
		let second = compute_layout(&nodes, &edges, LayoutMode::Force, size, &config);
		assert_eq!(first, second);
	}

	#[test]
	fn test_coincident_nodes_are_pushed_apart() {
		let mut points = vec![Point::new(10.0, 10.0), Point::new(10.0, 10.0)];
		relax_step(&mut points, &[], &LayoutConfig::default());
		assert!(points[0].distance(points[1]) > 0.0);
		assert!(points.iter().all(|p| p.is_finite()));
	}

	#[test]
	fn test_zero_size_force_layout_spreads_in_two_dimensions() {
		let nodes: Vec<_> = ["a", "b", "c", "d", "e"].into_iter().map(node).collect();
		let positions = compute_layout(
			&nodes,
			&[],
			LayoutMode::Force,
			Size::new(0.0, 0.0),
			&LayoutConfig::default(),
		);
		let points: Vec<_> = positions.values().copied().collect();
		assert!(points.iter().all(|p| p.is_finite()));
		assert!(points.iter().any(|p| (p.y - points[0].y).abs() > 1.0));
		assert!(points.iter().any(|p| (p.x - points[0].x).abs() > 1.0));
		for (k, p) in points.iter().enumerate() {
			for q in &points[k + 1..] {
				assert!(p.distance(*q) > 1e-6);
			}
		}
	}

	#[test]
	fn test_duplicate_ids_collapse() {
		let nodes = vec![node("a"), node("a"), node("b")];
		let positions = compute_layout(
			&nodes,
			&[],
			LayoutMode::Circle,
			Size::new(200.0, 200.0),
			&LayoutConfig::default(),
		);
		assert_eq!(positions.len(), 2);
	}

	#[test]
	fn test_self_loops_are_not_springs() {
		let ids = ["a", "b"];
		let edges = vec![
			GraphEdge::new("e1", "a", "a", None),
			GraphEdge::new("e2", "a", "b", None),
		];
		assert_eq!(springs(&ids, &edges), vec![(0, 1)]);
	}
}
