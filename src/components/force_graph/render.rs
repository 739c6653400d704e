//! Drawing the graph onto a [`Surface`].
//!
//! Passes, back to front:
//! 1. Background (screen space)
//! 2. Edge paths and arrowheads (world space, under the viewport transform)
//! 3. Nodes, pin rings and labels

use std::f64::consts::TAU;

use web_sys::CanvasRenderingContext2d;

use super::geometry::{ArcPath, Point};
use super::graph::{EdgeIdx, NodeIdx};
use super::interaction::Hover;
use super::scale::ScaledValues;
use super::state::ForceGraphState;
use super::theme::{BackgroundStyle, Color, Theme};

/// Stroke for a circle outline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
	pub color: Color,
	pub width: f64,
}

/// The drawing primitives the renderer needs. Coordinates are world units
/// once [`Surface::transform`] has been applied.
pub trait Surface {
	fn background(&self, width: f64, height: f64, style: &BackgroundStyle);
	fn save(&self);
	fn restore(&self);
	/// `screen = world * scale + (tx, ty)` until the matching `restore`.
	fn transform(&self, tx: f64, ty: f64, scale: f64);
	fn set_alpha(&self, alpha: f64);
	fn circle(&self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<Stroke>);
	fn stroke_path(&self, path: &ArcPath, color: Color, width: f64);
	/// Filled triangle with its point at `tip`, facing `direction` (unit).
	fn arrow(&self, tip: Point, direction: (f64, f64), size: f64, color: Color);
	fn text(&self, text: &str, at: Point, font: &str, color: Color);
}

/// Renders one frame.
pub fn render<S: Surface>(state: &ForceGraphState, surface: &S, theme: &Theme) {
	let scaled = state.scaled();
	let viewport = state.controller().viewport();

	surface.background(state.width, state.height, &theme.background);

	surface.save();
	surface.transform(viewport.translate_x, viewport.translate_y, viewport.scale);
	draw_edges(state, surface, &scaled, theme);
	draw_nodes(state, surface, &scaled, theme);
	surface.restore();
}

fn draw_edges<S: Surface>(
	state: &ForceGraphState,
	surface: &S,
	scaled: &ScaledValues,
	theme: &Theme,
) {
	let graph = state.graph();
	let controller = state.controller();
	let arcs = state.arcs();

	for (i, path) in arcs.iter().enumerate() {
		let idx = EdgeIdx(i);
		let opacity = controller.edge_opacity(idx, graph);
		let focused = controller.hover() == Hover::Edge(idx);
		let (color, width) = if focused {
			(theme.edge.focus_color, scaled.edge_line_width * 2.0)
		} else {
			(theme.edge.color, scaled.edge_line_width)
		};

		surface.set_alpha(opacity);
		surface.stroke_path(path, color, width);

		// Overlapping endpoints leave nowhere to put an arrowhead.
		let span = path.point_at(0.0).distance(path.point_at(1.0));
		if !scaled.cull_arrows && span > scaled.node_radius + scaled.arrow_size {
			let (tip, direction) = path.arrow_tip(scaled.node_radius);
			surface.set_alpha(opacity * scaled.arrow_alpha);
			let arrow_color = if focused { color } else { theme.edge.arrow_color };
			surface.arrow(tip, direction, scaled.arrow_size, arrow_color);
		}
	}
	surface.set_alpha(1.0);
}

fn draw_nodes<S: Surface>(
	state: &ForceGraphState,
	surface: &S,
	scaled: &ScaledValues,
	theme: &Theme,
) {
	let graph = state.graph();
	let adjacency = state.adjacency();
	let controller = state.controller();
	let style = &theme.node;
	let border = (style.border_width > 0.0).then(|| Stroke {
		color: style.border_color,
		width: style.border_width / scaled.k,
	});

	for (i, node) in state.nodes().iter().enumerate() {
		let idx = NodeIdx(i);
		let info = state.node_info(idx);
		let center = node.position();
		let opacity = controller.node_opacity(idx, graph, adjacency);

		let mut fill = info.and_then(|n| n.fill).unwrap_or(style.fill);
		if controller.hover() == Hover::Node(idx) {
			fill = fill.lighten(0.35);
		}

		surface.set_alpha(opacity);
		surface.circle(center, scaled.node_radius, Some(fill), border);

		if node.is_pinned() {
			surface.circle(
				center,
				scaled.node_radius + 3.0 / scaled.k,
				None,
				Some(Stroke {
					color: style.pin_color,
					width: 1.5 / scaled.k,
				}),
			);
		}

		if let Some(label) = info.and_then(|n| n.label.as_deref()) {
			if scaled.label_alpha > 0.0 {
				surface.set_alpha(opacity * scaled.label_alpha);
				let at = Point::new(center.x, center.y + scaled.node_radius + 12.0 / scaled.k);
				surface.text(label, at, &scaled.label_font, style.label_color);
			}
		}
	}
	surface.set_alpha(1.0);
}

impl Surface for CanvasRenderingContext2d {
	fn background(&self, width: f64, height: f64, style: &BackgroundStyle) {
		let gradient = style
			.use_gradient
			.then(|| {
				let (cx, cy) = (width / 2.0, height / 2.0);
				let gradient = self
					.create_radial_gradient(cx, cy, 0.0, cx, cy, width.max(height) * 0.8)
					.ok()?;
				gradient.add_color_stop(0.0, &style.color.to_css()).ok()?;
				gradient
					.add_color_stop(1.0, &style.color_secondary.to_css())
					.ok()?;
				Some(gradient)
			})
			.flatten();

		if let Some(gradient) = gradient {
			self.set_fill_style(&gradient);
		} else {
			self.set_fill_style_str(&style.color.to_css());
		}
		self.fill_rect(0.0, 0.0, width, height);
	}

	fn save(&self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&self) {
		CanvasRenderingContext2d::restore(self);
	}

	fn transform(&self, tx: f64, ty: f64, scale: f64) {
		let _ = self.translate(tx, ty);
		let _ = self.scale(scale, scale);
	}

	fn set_alpha(&self, alpha: f64) {
		self.set_global_alpha(alpha);
	}

	fn circle(&self, center: Point, radius: f64, fill: Option<Color>, stroke: Option<Stroke>) {
		self.begin_path();
		let _ = self.arc(center.x, center.y, radius, 0.0, TAU);
		if let Some(fill) = fill {
			self.set_fill_style_str(&fill.to_css());
			self.fill();
		}
		if let Some(stroke) = stroke {
			self.set_stroke_style_str(&stroke.color.to_css());
			self.set_line_width(stroke.width);
			self.stroke();
		}
	}

	fn stroke_path(&self, path: &ArcPath, color: Color, width: f64) {
		self.begin_path();
		match *path {
			ArcPath::Straight { from, to } => {
				self.move_to(from.x, from.y);
				self.line_to(to.x, to.y);
			}
			ArcPath::Circular {
				center,
				radius,
				start_angle,
				end_angle,
				clockwise,
				..
			} => {
				let _ = self.arc_with_anticlockwise(
					center.x,
					center.y,
					radius,
					start_angle,
					end_angle,
					!clockwise,
				);
			}
		}
		self.set_stroke_style_str(&color.to_css());
		self.set_line_width(width);
		self.stroke();
	}

	fn arrow(&self, tip: Point, (ux, uy): (f64, f64), size: f64, color: Color) {
		let (back_x, back_y) = (tip.x - ux * size, tip.y - uy * size);
		let (px, py) = (-uy * size * 0.5, ux * size * 0.5);

		self.set_fill_style_str(&color.to_css());
		self.begin_path();
		self.move_to(tip.x, tip.y);
		self.line_to(back_x + px, back_y + py);
		self.line_to(back_x - px, back_y - py);
		self.close_path();
		self.fill();
	}

	fn text(&self, text: &str, at: Point, font: &str, color: Color) {
		self.set_font(font);
		self.set_text_align("center");
		self.set_fill_style_str(&color.to_css());
		let _ = self.fill_text(text, at.x, at.y);
	}
}

#[cfg(test)]
mod tests {
	use std::cell::RefCell;

	use super::*;
	use crate::components::force_graph::config::EngineConfig;
	use crate::components::force_graph::interaction::{PointerEvent, PointerKind};
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	#[derive(Clone, Debug, PartialEq)]
	enum Op {
		Background,
		Save,
		Restore,
		Transform(f64),
		Alpha(f64),
		Circle { fill: Option<Color> },
		Path { straight: bool, color: Color },
		Arrow,
		Text(String),
	}

	#[derive(Default)]
	struct Recorder {
		ops: RefCell<Vec<Op>>,
	}

	impl Recorder {
		fn push(&self, op: Op) {
			self.ops.borrow_mut().push(op);
		}

		fn ops(&self) -> Vec<Op> {
			self.ops.borrow().clone()
		}
	}

	impl Surface for Recorder {
		fn background(&self, _: f64, _: f64, _: &BackgroundStyle) {
			self.push(Op::Background);
		}
		fn save(&self) {
			self.push(Op::Save);
		}
		fn restore(&self) {
			self.push(Op::Restore);
		}
		fn transform(&self, _: f64, _: f64, scale: f64) {
			self.push(Op::Transform(scale));
		}
		fn set_alpha(&self, alpha: f64) {
			self.push(Op::Alpha(alpha));
		}
		fn circle(&self, _: Point, _: f64, fill: Option<Color>, _: Option<Stroke>) {
			self.push(Op::Circle { fill });
		}
		fn stroke_path(&self, path: &ArcPath, color: Color, _: f64) {
			self.push(Op::Path {
				straight: path.is_straight(),
				color,
			});
		}
		fn arrow(&self, _: Point, _: (f64, f64), _: f64, _: Color) {
			self.push(Op::Arrow);
		}
		fn text(&self, text: &str, _: Point, _: &str, _: Color) {
			self.push(Op::Text(text.to_owned()));
		}
	}

	fn settled_state() -> ForceGraphState {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("a").with("label", "Alpha"),
				GraphNode::new("b"),
				GraphNode::new("c"),
			],
			edges: vec![
				GraphEdge::new("a", "b"),
				GraphEdge::new("b", "a"),
				GraphEdge::new("b", "c"),
			],
		};
		let mut state =
			ForceGraphState::new(&data, &EngineConfig::default(), 800.0, 600.0).unwrap();
		state.simulation_mut().run(10_000);
		state
	}

	#[test]
	fn draws_background_then_edges_then_nodes_inside_the_transform() {
		let state = settled_state();
		let surface = Recorder::default();
		render(&state, &surface, &Theme::default());
		let ops = surface.ops();

		assert_eq!(ops[0], Op::Background);
		assert_eq!(ops[1], Op::Save);
		assert_eq!(ops[2], Op::Transform(1.0));
		assert_eq!(ops.last(), Some(&Op::Restore));

		let first_circle = ops.iter().position(|op| matches!(op, Op::Circle { .. })).unwrap();
		let last_path = ops.iter().rposition(|op| matches!(op, Op::Path { .. })).unwrap();
		assert!(last_path < first_circle);

		let paths: Vec<bool> = ops
			.iter()
			.filter_map(|op| match op {
				Op::Path { straight, .. } => Some(*straight),
				_ => None,
			})
			.collect();
		// Two-edge group bows both ways, the lone edge stays straight.
		assert_eq!(paths, vec![false, false, true]);
		assert_eq!(ops.iter().filter(|op| **op == Op::Arrow).count(), 3);
		assert_eq!(ops.iter().filter(|op| matches!(op, Op::Circle { .. })).count(), 3);
		assert!(ops.contains(&Op::Text("Alpha".into())));
	}

	#[test]
	fn node_color_attribute_overrides_theme_fill() {
		let data = GraphData {
			nodes: vec![GraphNode::new("x").with("color", "#102030")],
			edges: Vec::new(),
		};
		let state = ForceGraphState::new(&data, &EngineConfig::default(), 400.0, 400.0).unwrap();
		let surface = Recorder::default();
		render(&state, &surface, &Theme::default());
		assert!(surface.ops().contains(&Op::Circle {
			fill: Some(Color::rgb(16, 32, 48))
		}));
	}

	#[test]
	fn hovering_an_edge_dims_unrelated_marks() {
		let mut state = settled_state();
		let arc = state.arcs()[2];
		let on_edge = arc.point_at(0.5);
		state.handle_pointer(&PointerEvent::at(PointerKind::Move, on_edge.x, on_edge.y));

		let surface = Recorder::default();
		let theme = Theme::default();
		render(&state, &surface, &theme);
		let ops = surface.ops();

		let focused = ops
			.iter()
			.filter(|op| matches!(op, Op::Path { color, .. } if *color == theme.edge.focus_color))
			.count();
		assert_eq!(focused, 1);
		assert!(ops.contains(&Op::Alpha(0.1)));
	}
}
