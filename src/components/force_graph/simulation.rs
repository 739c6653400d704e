//! Force-directed layout engine.
//!
//! A velocity-Verlet style relaxation cooled by `alpha`. Each tick composes
//! four forces: spring links, many-body repulsion, centroid centering and a
//! weak pull towards the canvas axes. Pinned nodes (`fx`/`fy`) keep their
//! pinned coordinate and never pick up velocity on that axis.
//!
//! The engine knows nothing about drawing or frame timing; see
//! [`Simulation`](super::scheduler::Simulation) for the driver.

use serde::Deserialize;

use super::error::{ConfigError, ensure_finite, ensure_positive, ensure_range};
use super::geometry::Point;
use super::graph::NodeIdx;

/// Golden-angle increment used for the initial spiral placement.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Force and cooling parameters. Validated before the engine is built.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationConfig {
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Distances below this are treated as this distance by the many-body force.
	pub charge_distance_min: f64,
	/// Rest length of link springs.
	pub link_distance: f64,
	/// Link spring strength. `None` uses `1 / min(degree)` of the endpoints.
	pub link_strength: Option<f64>,
	/// Pull towards the canvas center lines, per axis.
	pub axis_strength: f64,
	/// Radius nodes keep clear around themselves.
	pub collide_radius: f64,
	/// Share of an overlap resolved per tick. Zero disables collision.
	pub collide_strength: f64,
	/// Fraction of the centroid offset removed per tick.
	pub center_strength: f64,
	/// Alpha below which the layout counts as settled.
	pub alpha_min: f64,
	/// Fraction of the gap to the alpha target closed per tick.
	pub alpha_decay: f64,
	/// Fraction of velocity lost per tick.
	pub velocity_decay: f64,
	/// Spacing of the initial spiral placement.
	pub initial_radius: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		let alpha_min: f64 = 0.001;
		Self {
			charge_strength: -300.0,
			charge_distance_min: 1.0,
			link_distance: 200.0,
			link_strength: None,
			axis_strength: 0.1,
			collide_radius: 25.0,
			collide_strength: 1.0,
			center_strength: 1.0,
			alpha_min,
			// Settles in about 300 ticks.
			alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
			velocity_decay: 0.4,
			initial_radius: 10.0,
		}
	}
}

impl SimulationConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		ensure_finite("simulation.charge_strength", self.charge_strength)?;
		ensure_positive("simulation.charge_distance_min", self.charge_distance_min)?;
		ensure_positive("simulation.link_distance", self.link_distance)?;
		if let Some(strength) = self.link_strength {
			ensure_range("simulation.link_strength", strength, 0.0, 1.0)?;
		}
		ensure_range("simulation.axis_strength", self.axis_strength, 0.0, 1.0)?;
		ensure_positive("simulation.collide_radius", self.collide_radius)?;
		ensure_range("simulation.collide_strength", self.collide_strength, 0.0, 1.0)?;
		ensure_range("simulation.center_strength", self.center_strength, 0.0, 1.0)?;
		ensure_range("simulation.alpha_min", self.alpha_min, 0.0, 1.0)?;
		ensure_range("simulation.alpha_decay", self.alpha_decay, 0.0, 1.0)?;
		ensure_positive("simulation.alpha_decay", self.alpha_decay)?;
		ensure_range("simulation.velocity_decay", self.velocity_decay, 0.0, 1.0)?;
		ensure_positive("simulation.initial_radius", self.initial_radius)
	}
}

/// Mutable physics state of one node.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimNode {
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	pub fn position(&self) -> Point {
		Point::new(self.x, self.y)
	}

	pub fn is_pinned(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

#[derive(Clone, Copy, Debug)]
struct Link {
	source: usize,
	target: usize,
	strength: f64,
	/// Share of the correction applied to the target.
	bias: f64,
}

/// Iterative force layout over a fixed node set.
#[derive(Clone, Debug)]
pub struct ForceLayoutEngine {
	nodes: Vec<SimNode>,
	links: Vec<Link>,
	config: SimulationConfig,
	center: Point,
	alpha: f64,
	alpha_target: f64,
}

impl ForceLayoutEngine {
	/// Places `node_count` nodes on a spiral around the canvas center and
	/// prepares one spring per non-loop edge.
	pub fn new(
		node_count: usize,
		edges: &[(NodeIdx, NodeIdx)],
		config: SimulationConfig,
		width: f64,
		height: f64,
	) -> Result<Self, ConfigError> {
		config.validate()?;
		if !(width > 0.0 && height > 0.0) {
			return Err(ConfigError::EmptyCanvas { width, height });
		}
		let center = Point::new(width / 2.0, height / 2.0);

		let nodes = (0..node_count)
			.map(|i| {
				let radius = config.initial_radius * (i as f64).sqrt();
				let angle = i as f64 * GOLDEN_ANGLE;
				SimNode {
					x: center.x + radius * angle.cos(),
					y: center.y + radius * angle.sin(),
					..SimNode::default()
				}
			})
			.collect();

		let mut degree = vec![0usize; node_count];
		let springs: Vec<(usize, usize)> = edges
			.iter()
			.map(|&(s, t)| (s.0, t.0))
			.filter(|&(s, t)| s != t && s < node_count && t < node_count)
			.collect();
		for &(s, t) in &springs {
			degree[s] += 1;
			degree[t] += 1;
		}
		let links = springs
			.into_iter()
			.map(|(source, target)| {
				let (ds, dt) = (degree[source] as f64, degree[target] as f64);
				Link {
					source,
					target,
					strength: config.link_strength.unwrap_or(1.0 / ds.min(dt)),
					bias: ds / (ds + dt),
				}
			})
			.collect();

		Ok(Self {
			nodes,
			links,
			config,
			center,
			alpha: 1.0,
			alpha_target: 0.0,
		})
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, idx: NodeIdx) -> Option<&SimNode> {
		self.nodes.get(idx.0)
	}

	pub fn position(&self, idx: NodeIdx) -> Option<Point> {
		self.node(idx).map(SimNode::position)
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha.clamp(0.0, 1.0);
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, target: f64) {
		self.alpha_target = target.clamp(0.0, 1.0);
	}

	/// Cold enough to stop ticking, and not being held warm by a target.
	pub fn is_settled(&self) -> bool {
		self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min
	}

	pub fn center(&self) -> Point {
		self.center
	}

	/// Moves the centering target, e.g. after the canvas is resized.
	pub fn set_center(&mut self, center: Point) {
		self.center = center;
	}

	/// Pins a node at `(x, y)`. Returns `false` if the node does not exist.
	pub fn pin(&mut self, idx: NodeIdx, x: f64, y: f64) -> bool {
		let Some(node) = self.nodes.get_mut(idx.0) else {
			return false;
		};
		node.fx = Some(x);
		node.fy = Some(y);
		true
	}

	/// Releases a pin. Returns `false` if the node does not exist.
	pub fn unpin(&mut self, idx: NodeIdx) -> bool {
		let Some(node) = self.nodes.get_mut(idx.0) else {
			return false;
		};
		node.fx = None;
		node.fy = None;
		true
	}

	/// Advances the layout by one step.
	pub fn tick(&mut self) {
		if self.nodes.is_empty() {
			return;
		}
		self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;

		self.apply_links();
		self.apply_many_body();
		self.apply_centering();
		self.apply_collision();
		self.apply_axis_attraction();
		self.integrate();
	}

	fn apply_links(&mut self) {
		let alpha = self.alpha;
		let distance = self.config.link_distance;
		for link in &self.links {
			let (s, t) = (self.nodes[link.source], self.nodes[link.target]);
			let mut x = t.x + t.vx - s.x - s.vx;
			let mut y = t.y + t.vy - s.y - s.vy;
			if x == 0.0 && y == 0.0 {
				(x, y) = jiggle(link.source, link.target);
			}
			let length = (x * x + y * y).sqrt();
			let scale = (length - distance) / length * alpha * link.strength;
			x *= scale;
			y *= scale;

			let target = &mut self.nodes[link.target];
			target.vx -= x * link.bias;
			target.vy -= y * link.bias;
			let source = &mut self.nodes[link.source];
			source.vx += x * (1.0 - link.bias);
			source.vy += y * (1.0 - link.bias);
		}
	}

	fn apply_many_body(&mut self) {
		let weight = self.config.charge_strength * self.alpha;
		let min_sq = self.config.charge_distance_min * self.config.charge_distance_min;
		let count = self.nodes.len();

		for i in 0..count {
			for j in (i + 1)..count {
				let (a, b) = (self.nodes[i], self.nodes[j]);
				let (mut x, mut y) = (b.x - a.x, b.y - a.y);
				if x == 0.0 && y == 0.0 {
					(x, y) = jiggle(i, j);
				}
				let mut distance_sq = x * x + y * y;
				if distance_sq < min_sq {
					distance_sq = (min_sq * distance_sq).sqrt();
				}
				let w = weight / distance_sq;
				self.nodes[i].vx += x * w;
				self.nodes[i].vy += y * w;
				self.nodes[j].vx -= x * w;
				self.nodes[j].vy -= y * w;
			}
		}
	}

	fn apply_centering(&mut self) {
		let count = self.nodes.len() as f64;
		let (sum_x, sum_y) = self
			.nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), n| (sx + n.x, sy + n.y));
		let shift_x = (sum_x / count - self.center.x) * self.config.center_strength;
		let shift_y = (sum_y / count - self.center.y) * self.config.center_strength;
		for node in &mut self.nodes {
			node.x -= shift_x;
			node.y -= shift_y;
		}
	}

	/// Pushes apart pairs whose predicted positions overlap. Not scaled by alpha.
	fn apply_collision(&mut self) {
		let strength = self.config.collide_strength;
		if strength == 0.0 {
			return;
		}
		let reach = 2.0 * self.config.collide_radius;
		let count = self.nodes.len();

		for i in 0..count {
			for j in (i + 1)..count {
				let (a, b) = (self.nodes[i], self.nodes[j]);
				let mut x = a.x + a.vx - b.x - b.vx;
				let mut y = a.y + a.vy - b.y - b.vy;
				if x == 0.0 && y == 0.0 {
					(x, y) = jiggle(i, j);
				}
				let distance_sq = x * x + y * y;
				if distance_sq >= reach * reach {
					continue;
				}
				let distance = distance_sq.sqrt();
				// Equal radii: each side takes half of the correction.
				let push = (reach - distance) / distance * strength * 0.5;
				self.nodes[i].vx += x * push;
				self.nodes[i].vy += y * push;
				self.nodes[j].vx -= x * push;
				self.nodes[j].vy -= y * push;
			}
		}
	}

	fn apply_axis_attraction(&mut self) {
		let k = self.config.axis_strength * self.alpha;
		for node in &mut self.nodes {
			node.vx += (self.center.x - node.x) * k;
			node.vy += (self.center.y - node.y) * k;
		}
	}

	fn integrate(&mut self) {
		let keep = 1.0 - self.config.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}
}

/// Tiny deterministic offset that separates coincident nodes.
fn jiggle(i: usize, j: usize) -> (f64, f64) {
	let angle = ((i as f64) * 0.618_034 + (j as f64) * 0.414_214) * std::f64::consts::TAU;
	(angle.cos() * 1e-6, angle.sin() * 1e-6)
}
