//! Pan and zoom transform between world and screen coordinates.
//!
//! `screen = world * scale + pan`. Interactive zoom is bounded to
//! [`MIN_SCALE`]..[`MAX_SCALE`]; fit-to-view uses the tighter
//! [`MAX_FIT_SCALE`] ceiling so small graphs are not blown up.

use super::types::{Point, Positions, Size};

/// Smallest zoom factor.
pub const MIN_SCALE: f64 = 0.4;
/// Largest zoom factor reachable by zooming.
pub const MAX_SCALE: f64 = 2.5;
/// Largest zoom factor chosen by [`Viewport::fit_to_view`].
pub const MAX_FIT_SCALE: f64 = 2.0;
/// Default padding (screen pixels) left around the graph when fitting.
pub const FIT_PADDING: f64 = 40.0;

/// Pan and zoom applied to the entire graph view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	/// Screen-space translation.
	pub pan: Point,
	/// Zoom factor (1.0 = 100%).
	pub scale: f64,
}

impl Default for Viewport {
	fn default() -> Self {
		Self {
			pan: Point::default(),
			scale: 1.0,
		}
	}
}

impl Viewport {
	/// Map a world position to screen pixels.
	pub fn world_to_screen(&self, p: Point) -> Point {
		p * self.scale + self.pan
	}

	/// Map screen pixels back to a world position.
	pub fn screen_to_world(&self, p: Point) -> Point {
		(p - self.pan) / self.scale
	}

	/// Translate the view by a screen-space delta.
	pub fn pan_by(&mut self, delta: Point) {
		if delta.is_finite() {
			self.pan = self.pan + delta;
		}
	}

	/// Multiply the scale by `1 + delta_factor`, keeping the world point under
	/// `anchor` fixed on screen.
	pub fn zoom(&mut self, delta_factor: f64, anchor: Point) {
		if !delta_factor.is_finite() || !anchor.is_finite() {
			return;
		}
		let world = self.screen_to_world(anchor);
		let scale = (self.scale * (1.0 + delta_factor)).clamp(MIN_SCALE, MAX_SCALE);
		self.pan = anchor - world * scale;
		self.scale = scale;
	}

	/// Scale and center the view so every position fits inside `size`.
	///
	/// Does nothing when there are no positions.
	pub fn fit_to_view(&mut self, positions: &Positions, size: Size, padding: f64) {
		let Some((min, max)) = bounds(positions) else {
			return;
		};
		let extent_x = (max.x - min.x).max(1.0);
		let extent_y = (max.y - min.y).max(1.0);
		let fit = ((size.width - padding) / extent_x).min((size.height - padding) / extent_y);
		// NaN from a non-finite size falls back to the floor.
		let scale = if fit.is_nan() {
			MIN_SCALE
		} else {
			fit.clamp(MIN_SCALE, MAX_FIT_SCALE)
		};
		let center = (min + max) / 2.0;
		let pan = size.center() - center * scale;
		if pan.is_finite() {
			self.pan = pan;
			self.scale = scale;
		}
	}
}

/// Axis-aligned bounding box of all positions as `(min, max)`.
pub fn bounds(positions: &Positions) -> Option<(Point, Point)> {
	let mut points = positions.values();
	let first = *points.next()?;
	Some(points.fold((first, first), |(min, max), p| {
		(
			Point::new(min.x.min(p.x), min.y.min(p.y)),
			Point::new(max.x.max(p.x), max.y.max(p.y)),
		)
	}))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn positions(points: &[(f64, f64)]) -> Positions {
		points
			.iter()
			.enumerate()
			.map(|(i, &(x, y))| (format!("n{i}"), Point::new(x, y)))
			.collect()
	}

	#[test]
	fn test_world_screen_round_trip() {
		let viewport = Viewport {
			pan: Point::new(37.5, -12.25),
			scale: 1.7,
		};
		let p = Point::new(123.4, -56.7);
		let back = viewport.screen_to_world(viewport.world_to_screen(p));
		assert!(back.distance(p) < 1e-9);
	}

	#[test]
	fn test_zoom_clamps_scale() {
		let mut viewport = Viewport::default();
		for _ in 0..50 {
			viewport.zoom(0.5, Point::new(10.0, 10.0));
		}
		assert_eq!(viewport.scale, MAX_SCALE);
		for _ in 0..50 {
			viewport.zoom(-0.5, Point::new(10.0, 10.0));
		}
		assert_eq!(viewport.scale, MIN_SCALE);
		viewport.zoom(-5.0, Point::new(10.0, 10.0));
		assert_eq!(viewport.scale, MIN_SCALE);
	}

	#[test]
	fn test_zoom_ignores_non_finite_input() {
		let mut viewport = Viewport::default();
		viewport.zoom(f64::NAN, Point::new(1.0, 1.0));
		viewport.zoom(0.2, Point::new(f64::INFINITY, 0.0));
		assert_eq!(viewport, Viewport::default());
	}

	#[test]
	fn test_pan_adds_screen_delta() {
		let mut viewport = Viewport {
			pan: Point::new(5.0, 5.0),
			scale: 2.0,
		};
		viewport.pan_by(Point::new(10.0, -3.0));
		assert_eq!(viewport.pan, Point::new(15.0, 2.0));
		assert_eq!(viewport.scale, 2.0);
	}

	#[test]
	fn test_fit_to_view_centers_bounds() {
		let mut viewport = Viewport::default();
		let size = Size::new(800.0, 400.0);
		viewport.fit_to_view(&positions(&[(0.0, 0.0), (360.0, 180.0)]), size, FIT_PADDING);
		// min(760/360, 360/180) = 2.0
		assert_eq!(viewport.scale, 2.0);
		let center = viewport.world_to_screen(Point::new(180.0, 90.0));
		assert!(center.distance(size.center()) < 1e-9);
	}

	#[test]
	fn test_fit_to_view_empty_is_noop() {
		let mut viewport = Viewport {
			pan: Point::new(3.0, 4.0),
			scale: 1.5,
		};
		viewport.fit_to_view(&Positions::new(), Size::new(800.0, 600.0), FIT_PADDING);
		assert_eq!(viewport.pan, Point::new(3.0, 4.0));
		assert_eq!(viewport.scale, 1.5);
	}

	#[test]
	fn test_fit_to_view_single_point_uses_unit_extent() {
		let mut viewport = Viewport::default();
		let points = positions(&[(50.0, 50.0), (50.0, 50.0)]);
		viewport.fit_to_view(&points, Size::new(300.0, 300.0), FIT_PADDING);
		assert_eq!(viewport.scale, MAX_FIT_SCALE);
		assert!(viewport.pan.is_finite());
	}

	#[test]
	fn test_fit_to_view_large_graph_hits_floor() {
		let mut viewport = Viewport::default();
		let points = positions(&[(-5000.0, 0.0), (5000.0, 10.0)]);
		viewport.fit_to_view(&points, Size::new(400.0, 400.0), FIT_PADDING);
		assert_eq!(viewport.scale, MIN_SCALE);
	}
}
