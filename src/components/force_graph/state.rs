//! Everything one graph view owns, wired together.
//!
//! Built once per graph load. The static parts (arena, adjacency, arc slots)
//! never change afterwards; the simulation and interaction state are advanced
//! by the frame loop and by pointer events.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use log::info;

use super::adjacency::AdjacencyIndex;
use super::config::EngineConfig;
use super::error::{ConfigError, GraphError};
use super::geometry::{ArcPath, GeometryTable, Point};
use super::graph::{EdgeIdx, Graph, NodeIdx};
use super::interaction::{InteractionController, PointerEvent, PointerKind, Propagation};
use super::scale::{ScaleConfig, ScaledValues};
use super::scheduler::{FrameStatus, Simulation};
use super::simulation::{ForceLayoutEngine, SimNode};
use super::theme::Color;
use super::tooltip::{Tooltip, TooltipContent};
use super::types::{GraphData, attribute_text};

/// Alpha a resize kicks the layout back up to.
const RESIZE_ALPHA: f64 = 0.3;

/// Per-node display data derived from attributes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeInfo {
	pub label: Option<String>,
	/// Overrides the theme fill when the node has a `color` attribute.
	pub fill: Option<Color>,
}

/// What lies under a screen position. Nodes are drawn over edges and win.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
	Node(NodeIdx),
	Edge(EdgeIdx),
	Background,
}

pub struct ForceGraphState {
	graph: Graph,
	adjacency: AdjacencyIndex,
	geometry: GeometryTable,
	node_info: Vec<NodeInfo>,
	simulation: Simulation,
	controller: InteractionController,
	tooltip: Tooltip,
	/// Edge paths for the latest positions, rewritten by the tick listener.
	arcs: Rc<RefCell<Vec<ArcPath>>>,
	problems: Vec<GraphError>,
	scale: ScaleConfig,
	pub width: f64,
	pub height: f64,
}

impl ForceGraphState {
	pub fn new(
		data: &GraphData,
		config: &EngineConfig,
		width: f64,
		height: f64,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		let (graph, problems) = Graph::build(data);
		let adjacency = AdjacencyIndex::build(graph.edges());
		let geometry = GeometryTable::resolve(graph.edges(), &config.geometry);
		let endpoints = graph.edge_endpoints();

		let engine = ForceLayoutEngine::new(
			graph.node_count(),
			&endpoints,
			config.simulation.clone(),
			width,
			height,
		)?;
		let mut simulation = Simulation::new(engine);
		let arcs = Rc::new(RefCell::new(resolve_arcs(
			&geometry,
			&endpoints,
			simulation.engine().nodes(),
		)));
		{
			let arcs = Rc::clone(&arcs);
			let geometry = geometry.clone();
			simulation.on_tick(Box::new(move |nodes| {
				*arcs.borrow_mut() = resolve_arcs(&geometry, &endpoints, nodes);
			}));
		}

		let node_info = graph
			.nodes()
			.iter()
			.map(|node| NodeInfo {
				label: attribute_text(&node.attributes, "label")
					.or_else(|| attribute_text(&node.attributes, "name")),
				fill: attribute_text(&node.attributes, "color")
					.and_then(|c| Color::parse_hex(&c)),
			})
			.collect();

		info!(
			"arc-graph: {} nodes, {} edges, {} linked pairs, largest parallel group {}",
			graph.node_count(),
			graph.edge_count(),
			adjacency.pair_count(),
			geometry.max_group_size()
		);

		Ok(Self {
			controller: InteractionController::new(config.interaction.clone())?,
			graph,
			adjacency,
			geometry,
			node_info,
			simulation,
			tooltip: Tooltip::default(),
			arcs,
			problems,
			scale: ScaleConfig::default(),
			width,
			height,
		})
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn adjacency(&self) -> &AdjacencyIndex {
		&self.adjacency
	}

	pub fn geometry(&self) -> &GeometryTable {
		&self.geometry
	}

	pub fn node_info(&self, idx: NodeIdx) -> Option<&NodeInfo> {
		self.node_info.get(idx.0)
	}

	pub fn nodes(&self) -> &[SimNode] {
		self.simulation.engine().nodes()
	}

	pub fn simulation(&self) -> &Simulation {
		&self.simulation
	}

	pub fn simulation_mut(&mut self) -> &mut Simulation {
		&mut self.simulation
	}

	pub fn controller(&self) -> &InteractionController {
		&self.controller
	}

	pub fn tooltip(&self) -> &Tooltip {
		&self.tooltip
	}

	pub fn arcs(&self) -> Ref<'_, Vec<ArcPath>> {
		self.arcs.borrow()
	}

	/// Dangling edges and duplicate ids dropped while loading.
	pub fn problems(&self) -> &[GraphError] {
		&self.problems
	}

	pub fn scale_config(&self) -> &ScaleConfig {
		&self.scale
	}

	pub fn scaled(&self) -> ScaledValues {
		ScaledValues::new(&self.scale, self.controller.viewport().scale)
	}

	/// One animation frame: at most one simulation tick, then the tooltip fade.
	pub fn frame(&mut self, dt: f64) -> FrameStatus {
		let status = self.simulation.frame();
		self.tooltip.tick(dt);
		status
	}

	/// Stops the simulation for good.
	pub fn cancel(&mut self) {
		self.simulation.cancel();
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		if width == self.width && height == self.height {
			return;
		}
		self.width = width;
		self.height = height;
		let engine = self.simulation.engine_mut();
		engine.set_center(Point::new(width / 2.0, height / 2.0));
		if engine.alpha() < RESIZE_ALPHA {
			engine.set_alpha(RESIZE_ALPHA);
		}
		self.simulation.resume();
	}

	/// Closest node within hit radius of a screen position.
	pub fn node_at_position(&self, screen: Point) -> Option<NodeIdx> {
		let world = self.controller.viewport().screen_to_world(screen);
		let radius = self.scaled().node_hit_radius;
		self.nodes()
			.iter()
			.enumerate()
			.map(|(i, node)| (i, node.position().distance(world)))
			.filter(|&(_, d)| d < radius)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| NodeIdx(i))
	}

	/// Closest edge within tolerance of a screen position.
	pub fn edge_at_position(&self, screen: Point) -> Option<EdgeIdx> {
		let world = self.controller.viewport().screen_to_world(screen);
		let scaled = self.scaled();
		self.arcs()
			.iter()
			.enumerate()
			.map(|(i, arc)| (i, arc.distance_to(world, scaled.edge_hit_samples)))
			.filter(|&(_, d)| d <= scaled.edge_hit_tolerance)
			.min_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(i, _)| EdgeIdx(i))
	}

	pub fn hit_test(&self, screen: Point) -> HitTarget {
		if let Some(node) = self.node_at_position(screen) {
			HitTarget::Node(node)
		} else if let Some(edge) = self.edge_at_position(screen) {
			HitTarget::Edge(edge)
		} else {
			HitTarget::Background
		}
	}

	/// Routes one pointer event. [`Propagation::Stop`] means the host should
	/// stop the native event from reaching anything else (page scroll, text
	/// selection).
	pub fn handle_pointer(&mut self, event: &PointerEvent) -> Propagation {
		match event.kind {
			PointerKind::Down => match self.hit_test(event.local) {
				HitTarget::Node(node) => {
					self.tooltip.hide();
					self.controller
						.drag_start(node, event, &mut self.simulation)
				}
				HitTarget::Edge(_) | HitTarget::Background => {
					self.controller.pan_start(event);
					Propagation::Continue
				}
			},
			PointerKind::Move => {
				if self.controller.drag_move(event, &mut self.simulation) {
					return Propagation::Stop;
				}
				if !self.controller.pan_move(event) {
					self.update_hover(event);
				}
				Propagation::Continue
			}
			PointerKind::Up => {
				let dropped = self.controller.drag_end(event, &mut self.simulation);
				self.controller.pan_end();
				if dropped {
					self.update_hover(event);
					Propagation::Stop
				} else {
					Propagation::Continue
				}
			}
			PointerKind::Enter => {
				self.update_hover(event);
				Propagation::Continue
			}
			PointerKind::Leave => {
				self.controller.drag_end(event, &mut self.simulation);
				self.controller.pan_end();
				self.controller.unfocus();
				self.tooltip.hide();
				Propagation::Continue
			}
			PointerKind::Wheel { .. } => {
				self.controller.zoom(event);
				Propagation::Stop
			}
			PointerKind::DoubleClick => match self.hit_test(event.local) {
				HitTarget::Node(node) => {
					self.controller.release_pin(node, &mut self.simulation);
					Propagation::Stop
				}
				HitTarget::Edge(_) | HitTarget::Background => Propagation::Continue,
			},
		}
	}

	fn update_hover(&mut self, event: &PointerEvent) {
		match self.hit_test(event.local) {
			HitTarget::Node(idx) => {
				if self.controller.focus_node(idx, &self.graph) {
					if let Some(node) = self.graph.node(idx) {
						self.tooltip
							.show_node(TooltipContent::for_node(node), event.page);
					}
				} else {
					self.tooltip.follow(event.page);
				}
			}
			HitTarget::Edge(idx) => {
				if self.controller.focus_edge(idx, &self.graph) {
					if let Some(edge) = self.graph.edge(idx) {
						self.tooltip
							.show_edge(TooltipContent::for_edge(edge, &self.graph), event.page);
					}
				} else {
					self.tooltip.follow(event.page);
				}
			}
			HitTarget::Background => {
				if self.controller.unfocus() {
					self.tooltip.hide();
				}
			}
		}
	}
}

/// Edge paths for the given node positions, indexed by [`EdgeIdx`].
fn resolve_arcs(
	geometry: &GeometryTable,
	endpoints: &[(NodeIdx, NodeIdx)],
	nodes: &[SimNode],
) -> Vec<ArcPath> {
	let position = |idx: NodeIdx| nodes.get(idx.0).map(SimNode::position).unwrap_or_default();
	endpoints
		.iter()
		.enumerate()
		.map(|(i, &(s, t))| geometry.arc_path(EdgeIdx(i), position(s), position(t)))
		.collect()
}
