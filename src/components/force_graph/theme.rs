//! Colors and visual styles.

/// RGBA color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Moves towards white by `factor` (0 = unchanged, 1 = white).
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let up = |c: u8| (c as f64 + (255.0 - c as f64) * f).round() as u8;
		Self {
			r: up(self.r),
			g: up(self.g),
			b: up(self.b),
			a: self.a,
		}
	}

	/// Parses `#rgb` or `#rrggbb`, as found in a node's `color` attribute.
	pub fn parse_hex(text: &str) -> Option<Self> {
		let hex = text.trim().strip_prefix('#')?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok();
		match hex.len() {
			3 => {
				let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
				Some(Self::rgb(digits.next()??, digits.next()??, digits.next()??))
			}
			6 => Some(Self::rgb(
				channel(hex.get(0..2)?)?,
				channel(hex.get(2..4)?)?,
				channel(hex.get(4..6)?)?,
			)),
			_ => None,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct BackgroundStyle {
	pub color: Color,
	/// Outer color of the radial gradient.
	pub color_secondary: Color,
	pub use_gradient: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct EdgeStyle {
	pub color: Color,
	/// Stroke of the edge under the pointer.
	pub focus_color: Color,
	pub arrow_color: Color,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: Color,
	pub border_color: Color,
	/// Border width in screen pixels (0 = none).
	pub border_width: f64,
	/// Ring drawn around pinned nodes.
	pub pin_color: Color,
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
}

impl Theme {
	/// Light theme with grey nodes and edges (default).
	pub fn ledger() -> Self {
		Self {
			name: "ledger",
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				color_secondary: Color::rgb(244, 245, 247),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgb(147, 149, 152),
				focus_color: Color::rgb(70, 72, 76),
				arrow_color: Color::rgb(147, 149, 152),
			},
			node: NodeStyle {
				fill: Color::rgb(204, 204, 204),
				border_color: Color::rgb(160, 160, 160),
				border_width: 1.0,
				pin_color: Color::rgb(25, 118, 210),
				label_color: Color::rgb(60, 60, 60),
			},
		}
	}

	/// Dark variant.
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(25, 28, 38),
				color_secondary: Color::rgb(18, 20, 28),
				use_gradient: true,
			},
			edge: EdgeStyle {
				color: Color::rgba(120, 140, 170, 0.6),
				focus_color: Color::rgb(200, 210, 225),
				arrow_color: Color::rgba(120, 140, 170, 0.8),
			},
			node: NodeStyle {
				fill: Color::rgb(115, 135, 155),
				border_color: Color::rgba(255, 255, 255, 0.0),
				border_width: 0.0,
				pin_color: Color::rgb(235, 170, 90),
				label_color: Color::rgb(200, 205, 215),
			},
		}
	}

	/// Looks a preset up by name.
	pub fn by_name(name: &str) -> Option<Self> {
		match name {
			"ledger" => Some(Self::ledger()),
			"midnight" => Some(Self::midnight()),
			_ => None,
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::ledger()
	}
}
