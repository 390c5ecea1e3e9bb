//! Zoom-dependent sizing of graph visuals.
//!
//! Frames are drawn in screen space, so every value here resolves to screen
//! pixels for a given zoom level `k`.
//!
//! - [`ScaleBehavior::World`]: grows and shrinks with zoom.
//! - [`ScaleBehavior::Screen`]: constant pixel size.
//! - [`ScaleBehavior::Clamped`]: follows zoom within pixel bounds.

/// How a visual size responds to zoom.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleBehavior {
	/// Grows and shrinks with zoom.
	World,
	/// Fixed pixel size.
	Screen,
	/// Follows zoom between two pixel sizes.
	Clamped {
		/// Smallest on-screen size.
		min_screen: f64,
		/// Largest on-screen size.
		max_screen: f64,
	},
}

impl ScaleBehavior {
	/// Screen size in pixels of a value that measures `base` at zoom 1.
	pub fn screen_size(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base * k,
			ScaleBehavior::Screen => base,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => (base * k).clamp(*min_screen, *max_screen),
		}
	}
}

/// Sizing configuration for nodes, labels and edges.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	/// Node radius at zoom 1.
	pub node_radius: f64,
	/// How `node_radius` follows zoom.
	pub node_behavior: ScaleBehavior,
	/// Pick radius at zoom 1. Larger than the drawn radius so small nodes stay
	/// easy to grab.
	pub hit_radius: f64,
	/// How `hit_radius` follows zoom.
	pub hit_behavior: ScaleBehavior,
	/// Label font size at zoom 1.
	pub label_size: f64,
	/// How `label_size` follows zoom.
	pub label_behavior: ScaleBehavior,
	/// Edge stroke width at zoom 1.
	pub edge_width: f64,
	/// How `edge_width` follows zoom.
	pub edge_behavior: ScaleBehavior,
	/// Arrow head length at zoom 1.
	pub arrow_size: f64,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node_radius: 18.0,
			node_behavior: ScaleBehavior::Clamped {
				min_screen: 8.0,
				max_screen: 40.0,
			},
			hit_radius: 22.0,
			hit_behavior: ScaleBehavior::Clamped {
				min_screen: 12.0,
				max_screen: f64::INFINITY,
			},
			label_size: 13.0,
			label_behavior: ScaleBehavior::Clamped {
				min_screen: 10.0,
				max_screen: 22.0,
			},
			edge_width: 1.5,
			edge_behavior: ScaleBehavior::Screen,
			arrow_size: 8.0,
		}
	}
}

/// Sizes resolved for one zoom level. Build once per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledValues {
	/// Drawn node radius in pixels.
	pub node_radius: f64,
	/// Pick radius in pixels.
	pub hit_radius: f64,
	/// CSS font shorthand for labels.
	pub label_font: String,
	/// Edge stroke width in pixels.
	pub edge_width: f64,
	/// Arrow head length in pixels.
	pub arrow_size: f64,
}

impl ScaledValues {
	/// Resolve every size for zoom factor `k`.
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node_radius = config.node_behavior.screen_size(config.node_radius, k);
		let label_size = config.label_behavior.screen_size(config.label_size, k);
		Self {
			node_radius,
			hit_radius: config.hit_behavior.screen_size(config.hit_radius, k),
			label_font: format!("{label_size}px sans-serif"),
			edge_width: config.edge_behavior.screen_size(config.edge_width, k),
			arrow_size: ScaleBehavior::Clamped {
				min_screen: 4.0,
				max_screen: node_radius,
			}
			.screen_size(config.arrow_size, k),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_behaviors() {
		assert_eq!(ScaleBehavior::World.screen_size(10.0, 2.0), 20.0);
		assert_eq!(ScaleBehavior::Screen.screen_size(10.0, 2.0), 10.0);
		let clamped = ScaleBehavior::Clamped {
			min_screen: 5.0,
			max_screen: 15.0,
		};
		assert_eq!(clamped.screen_size(10.0, 0.1), 5.0);
		assert_eq!(clamped.screen_size(10.0, 1.2), 12.0);
		assert_eq!(clamped.screen_size(10.0, 2.5), 15.0);
	}

	#[test]
	fn test_hit_radius_never_below_floor() {
		let config = ScaleConfig::default();
		let zoomed_out = ScaledValues::new(&config, 0.4);
		assert_eq!(zoomed_out.hit_radius, 12.0);
		assert!(zoomed_out.hit_radius >= zoomed_out.node_radius);
		assert_eq!(zoomed_out.label_font, "10px sans-serif");
	}
}
