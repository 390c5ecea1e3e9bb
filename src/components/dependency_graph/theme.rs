//! Visual theming: node colors by grammatical category and canvas styling.

use std::collections::HashMap;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Opacity from 0.0 to 1.0.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit opacity.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with a different opacity.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f) as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		let down = |c: u8| (c as f64 * f) as u8;
		Self {
			r: down(self.r),
			g: down(self.g),
			b: down(self.b),
			a: self.a,
		}
	}

	/// CSS color string, hex when opaque.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Canvas fill.
	pub background: Color,
	/// Edge stroke and arrow heads.
	pub edge: Color,
	/// Relation names drawn on edges.
	pub edge_label: Color,
	/// Word labels under nodes.
	pub label: Color,
	/// Ring drawn around the selected node.
	pub selection: Color,
	/// Ring drawn around the hovered node.
	pub hover: Color,
	/// Alpha multiplier for nodes and edges hidden by the filter.
	pub dimmed_alpha: f64,
	/// Colors for known grammatical categories.
	pub kinds: HashMap<String, Color>,
	/// Fallback colors for other categories, picked by a stable hash.
	pub palette: Vec<Color>,
	/// Color of untyped nodes.
	pub untyped: Color,
}

impl Theme {
	/// Dark theme used by the study app.
	pub fn default_theme() -> Self {
		let kinds = [
			("noun", Color::rgb(94, 129, 172)),
			("proper_noun", Color::rgb(108, 142, 173)),
			("pronoun", Color::rgb(129, 161, 193)),
			("verb", Color::rgb(191, 97, 106)),
			("auxiliary", Color::rgb(180, 120, 100)),
			("adjective", Color::rgb(163, 190, 140)),
			("adverb", Color::rgb(143, 188, 187)),
			("preposition", Color::rgb(208, 135, 112)),
			("conjunction", Color::rgb(180, 142, 173)),
			("determiner", Color::rgb(235, 203, 139)),
			("particle", Color::rgb(136, 160, 175)),
		]
		.into_iter()
		.map(|(k, c)| (k.to_string(), c))
		.collect();

		Self {
			background: Color::rgb(22, 27, 34),
			edge: Color::rgba(140, 160, 180, 0.6),
			edge_label: Color::rgba(200, 210, 220, 0.8),
			label: Color::rgba(255, 255, 255, 0.9),
			selection: Color::rgb(255, 214, 102),
			hover: Color::rgba(255, 255, 255, 0.8),
			dimmed_alpha: 0.2,
			kinds,
			palette: vec![
				Color::rgb(100, 148, 160),
				Color::rgb(130, 120, 150),
				Color::rgb(170, 145, 115),
				Color::rgb(119, 158, 165),
				Color::rgb(165, 115, 90),
				Color::rgb(120, 130, 160),
			],
			untyped: Color::rgb(143, 163, 180),
		}
	}

	/// Color for a node of the given grammatical category.
	pub fn node_color(&self, kind: Option<&str>) -> Color {
		let Some(kind) = kind else {
			return self.untyped;
		};
		let key = kind.to_lowercase();
		if let Some(color) = self.kinds.get(&key) {
			return *color;
		}
		if self.palette.is_empty() {
			return self.untyped;
		}
		// FNV-1a keeps the fallback stable across runs.
		let hash = key
			.bytes()
			.fold(0x811c_9dc5u32, |h, b| (h ^ b as u32).wrapping_mul(0x0100_0193));
		self.palette[hash as usize % self.palette.len()]
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
