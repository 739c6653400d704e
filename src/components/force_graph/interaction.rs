//! Pointer-driven interaction: hover focus, drag-to-pin and zoom/pan.
//!
//! Every handler receives the [`PointerEvent`] it reacts to; the controller
//! never reads ambient event state. Handlers that reference a node or edge
//! which no longer exists are ignored.

use log::debug;
use serde::Deserialize;

use super::adjacency::AdjacencyIndex;
use super::error::{ConfigError, ensure_positive, ensure_range};
use super::geometry::Point;
use super::graph::{EdgeIdx, Graph, NodeIdx};
use super::scheduler::Simulation;

/// What happens to a node's pin when its drag ends.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PinPolicy {
	/// The node rejoins the simulation on release.
	#[default]
	ReleaseOnDrop,
	/// The node stays where it was dropped until double-clicked.
	KeepPinned,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct InteractionConfig {
	/// Opacity of marks outside the focused neighborhood.
	pub dim_opacity: f64,
	pub min_scale: f64,
	pub max_scale: f64,
	/// Zoom multiplier per wheel notch.
	pub zoom_step: f64,
	/// Alpha target held while at least one node is dragged.
	pub drag_alpha_target: f64,
	/// Alpha target restored when the last drag ends.
	pub release_alpha_target: f64,
	pub pin_policy: PinPolicy,
}

impl Default for InteractionConfig {
	fn default() -> Self {
		Self {
			dim_opacity: 0.1,
			min_scale: 0.1,
			max_scale: 10.0,
			zoom_step: 1.1,
			drag_alpha_target: 0.3,
			release_alpha_target: 0.0,
			pin_policy: PinPolicy::ReleaseOnDrop,
		}
	}
}

impl InteractionConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		ensure_range("interaction.dim_opacity", self.dim_opacity, 0.0, 1.0)?;
		ensure_positive("interaction.min_scale", self.min_scale)?;
		ensure_positive("interaction.max_scale", self.max_scale)?;
		if self.min_scale >= self.max_scale {
			return Err(ConfigError::InvertedScaleExtent {
				min: self.min_scale,
				max: self.max_scale,
			});
		}
		ensure_range("interaction.zoom_step", self.zoom_step, 1.0, 4.0)?;
		ensure_range("interaction.drag_alpha_target", self.drag_alpha_target, 0.0, 1.0)?;
		ensure_range(
			"interaction.release_alpha_target",
			self.release_alpha_target,
			0.0,
			1.0,
		)
	}
}

/// Pan and zoom applied to the whole drawing group.
///
/// `screen = world * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
	pub scale: f64,
	pub translate_x: f64,
	pub translate_y: f64,
	min_scale: f64,
	max_scale: f64,
}

impl Viewport {
	pub fn new(min_scale: f64, max_scale: f64) -> Self {
		Self {
			scale: 1.0_f64.clamp(min_scale, max_scale),
			translate_x: 0.0,
			translate_y: 0.0,
			min_scale,
			max_scale,
		}
	}

	pub fn screen_to_world(&self, p: Point) -> Point {
		Point::new(
			(p.x - self.translate_x) / self.scale,
			(p.y - self.translate_y) / self.scale,
		)
	}

	pub fn world_to_screen(&self, p: Point) -> Point {
		Point::new(
			p.x * self.scale + self.translate_x,
			p.y * self.scale + self.translate_y,
		)
	}

	/// Scales by `factor` keeping the world point under `anchor` fixed.
	pub fn zoom_at(&mut self, anchor: Point, factor: f64) {
		if !factor.is_finite() || factor <= 0.0 {
			return;
		}
		let scale = (self.scale * factor).clamp(self.min_scale, self.max_scale);
		let ratio = scale / self.scale;
		self.translate_x = anchor.x - (anchor.x - self.translate_x) * ratio;
		self.translate_y = anchor.y - (anchor.y - self.translate_y) * ratio;
		self.scale = scale;
	}

	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.translate_x += dx;
		self.translate_y += dy;
	}
}

/// Kind of pointer input delivered by the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerKind {
	Enter,
	Leave,
	Down,
	Move,
	Up,
	Wheel { delta_y: f64 },
	DoubleClick,
}

/// A pointer event in both surface-local and page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
	pub kind: PointerKind,
	/// Relative to the drawing surface, in screen pixels.
	pub local: Point,
	/// Relative to the page; used to place overlays.
	pub page: Point,
}

impl PointerEvent {
	pub fn new(kind: PointerKind, local: Point, page: Point) -> Self {
		Self { kind, local, page }
	}

	/// Event whose page coordinates equal its local ones.
	pub fn at(kind: PointerKind, x: f64, y: f64) -> Self {
		Self::new(kind, Point::new(x, y), Point::new(x, y))
	}
}

/// Whether an event should continue to lower-priority handlers (pan/zoom).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Propagation {
	Continue,
	Stop,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Hover {
	#[default]
	Unfocused,
	Node(NodeIdx),
	Edge(EdgeIdx),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Drag {
	#[default]
	Idle,
	Dragging(NodeIdx),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
enum Pan {
	#[default]
	Idle,
	Panning {
		last: Point,
	},
}

/// Owns hover, drag and viewport state for one graph view.
#[derive(Clone, Debug)]
pub struct InteractionController {
	config: InteractionConfig,
	hover: Hover,
	drag: Drag,
	pan: Pan,
	viewport: Viewport,
	active_drags: usize,
}

impl InteractionController {
	pub fn new(config: InteractionConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self {
			viewport: Viewport::new(config.min_scale, config.max_scale),
			config,
			hover: Hover::Unfocused,
			drag: Drag::Idle,
			pan: Pan::Idle,
			active_drags: 0,
		})
	}

	pub fn config(&self) -> &InteractionConfig {
		&self.config
	}

	pub fn hover(&self) -> Hover {
		self.hover
	}

	pub fn drag(&self) -> Drag {
		self.drag
	}

	pub fn viewport(&self) -> &Viewport {
		&self.viewport
	}

	pub fn viewport_mut(&mut self) -> &mut Viewport {
		&mut self.viewport
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.drag, Drag::Dragging(_))
	}

	pub fn is_panning(&self) -> bool {
		matches!(self.pan, Pan::Panning { .. })
	}

	pub fn active_drags(&self) -> usize {
		self.active_drags
	}

	/// Focuses a node. Returns `true` when the focus changed.
	pub fn focus_node(&mut self, node: NodeIdx, graph: &Graph) -> bool {
		if graph.node(node).is_none() {
			debug!("arc-graph: ignoring hover on missing node {}", node.0);
			return false;
		}
		self.set_hover(Hover::Node(node))
	}

	/// Focuses an edge. Returns `true` when the focus changed.
	pub fn focus_edge(&mut self, edge: EdgeIdx, graph: &Graph) -> bool {
		if graph.edge(edge).is_none() {
			debug!("arc-graph: ignoring hover on missing edge {}", edge.0);
			return false;
		}
		self.set_hover(Hover::Edge(edge))
	}

	/// Restores full opacity. Returns `true` when something was focused.
	pub fn unfocus(&mut self) -> bool {
		self.set_hover(Hover::Unfocused)
	}

	fn set_hover(&mut self, hover: Hover) -> bool {
		if self.hover == hover {
			return false;
		}
		self.hover = hover;
		true
	}

	pub fn node_opacity(&self, node: NodeIdx, graph: &Graph, adjacency: &AdjacencyIndex) -> f64 {
		let lit = match self.hover {
			Hover::Unfocused => true,
			Hover::Node(focus) => adjacency.are_neighbors(focus, node),
			Hover::Edge(edge) => graph
				.edge(edge)
				.is_some_and(|e| e.source == node || e.target == node),
		};
		if lit { 1.0 } else { self.config.dim_opacity }
	}

	pub fn edge_opacity(&self, edge: EdgeIdx, graph: &Graph) -> f64 {
		let lit = match self.hover {
			Hover::Unfocused => true,
			Hover::Node(focus) => graph
				.edge(edge)
				.is_some_and(|e| e.source == focus || e.target == focus),
			Hover::Edge(focus) => focus == edge,
		};
		if lit { 1.0 } else { self.config.dim_opacity }
	}

	/// Starts dragging `node`. Pins it where it is and reheats the layout when
	/// this is the first active drag.
	///
	/// Returns [`Propagation::Stop`] so the same event does not start a pan.
	/// A press while a drag is already in progress is swallowed.
	pub fn drag_start(
		&mut self,
		node: NodeIdx,
		event: &PointerEvent,
		sim: &mut Simulation,
	) -> Propagation {
		if let Drag::Dragging(current) = self.drag {
			debug!(
				"arc-graph: ignoring press on node {} while node {} is dragged",
				node.0, current.0
			);
			return Propagation::Stop;
		}
		let Some(position) = sim.engine().position(node) else {
			debug!(
				"arc-graph: ignoring drag on missing node {} at ({:.0}, {:.0})",
				node.0, event.local.x, event.local.y
			);
			return Propagation::Continue;
		};

		self.active_drags += 1;
		if self.active_drags == 1 {
			sim.reheat(self.config.drag_alpha_target);
		}
		sim.engine_mut().pin(node, position.x, position.y);
		self.drag = Drag::Dragging(node);
		self.pan = Pan::Idle;
		Propagation::Stop
	}

	/// Moves the dragged node to the pointer. Returns `false` when not dragging.
	pub fn drag_move(&mut self, event: &PointerEvent, sim: &mut Simulation) -> bool {
		let Drag::Dragging(node) = self.drag else {
			return false;
		};
		let world = self.viewport.screen_to_world(event.local);
		sim.engine_mut().pin(node, world.x, world.y)
	}

	/// Ends the current drag, cooling the layout when it was the last one.
	pub fn drag_end(&mut self, event: &PointerEvent, sim: &mut Simulation) -> bool {
		let Drag::Dragging(node) = self.drag else {
			return false;
		};
		self.drag = Drag::Idle;
		self.active_drags = self.active_drags.saturating_sub(1);
		if self.active_drags == 0 {
			sim.cool(self.config.release_alpha_target);
		}

		match self.config.pin_policy {
			PinPolicy::ReleaseOnDrop => {
				sim.engine_mut().unpin(node);
			}
			PinPolicy::KeepPinned => {
				let world = self.viewport.screen_to_world(event.local);
				sim.engine_mut().pin(node, world.x, world.y);
			}
		}
		true
	}

	/// Frees a pinned node (double-click). Returns `false` for missing nodes.
	pub fn release_pin(&mut self, node: NodeIdx, sim: &mut Simulation) -> bool {
		if self.drag == Drag::Dragging(node) {
			return false;
		}
		let released = sim.engine_mut().unpin(node);
		if released {
			sim.resume();
		}
		released
	}

	pub fn pan_start(&mut self, event: &PointerEvent) {
		if !self.is_dragging() {
			self.pan = Pan::Panning { last: event.local };
		}
	}

	pub fn pan_move(&mut self, event: &PointerEvent) -> bool {
		let Pan::Panning { last } = self.pan else {
			return false;
		};
		self.viewport
			.pan_by(event.local.x - last.x, event.local.y - last.y);
		self.pan = Pan::Panning { last: event.local };
		true
	}

	pub fn pan_end(&mut self) {
		self.pan = Pan::Idle;
	}

	/// Zooms around the pointer. One wheel notch scales by `zoom_step`.
	pub fn zoom(&mut self, event: &PointerEvent) -> bool {
		let PointerKind::Wheel { delta_y } = event.kind else {
			return false;
		};
		if delta_y == 0.0 || !delta_y.is_finite() {
			return false;
		}
		let factor = if delta_y > 0.0 {
			1.0 / self.config.zoom_step
		} else {
			self.config.zoom_step
		};
		self.viewport.zoom_at(event.local, factor);
		true
	}
}
