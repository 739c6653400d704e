//! Arc geometry for parallel edges.
//!
//! Edges that share an unordered endpoint pair form a group. Each member gets a
//! slot in the group (by input order), and the slot decides which side of the
//! straight line the edge bows to and how tightly. Odd groups keep their middle
//! edge straight; the rest fan out symmetrically.
//!
//! Slots only depend on the edge set and are resolved once per edge-set change
//! into a [`GeometryTable`]. Radii depend on live node positions and are
//! computed every frame from that table.

use std::collections::HashMap;
use std::f64::consts::TAU;

use serde::Deserialize;

use super::error::{ConfigError, ensure_range};
use super::graph::{EdgeIdx, EdgeRecord, NodeIdx};

const EPSILON: f64 = 1e-9;

/// A point in simulation (world) coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	pub fn distance(self, other: Point) -> f64 {
		((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
	}
}

/// Tuning for arc packing.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeometryConfig {
	/// Divisor applied to the largest group size to get the shared radius
	/// scale. Lower values give flatter arcs.
	pub packing: f64,
}

impl Default for GeometryConfig {
	fn default() -> Self {
		Self { packing: 2.0 }
	}
}

impl GeometryConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		ensure_range("geometry.packing", self.packing, 2.0, 3.0)
	}
}

/// Which side of the chord an arc bows to. Doubles as the SVG sweep flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArcDirection {
	Lower = 0,
	Upper = 1,
}

impl ArcDirection {
	pub fn sweep_flag(self) -> u8 {
		self as u8
	}
}

/// Position of one edge inside its parallel-edge group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArcSlot {
	/// 1-based position in the group.
	pub slot_index: usize,
	pub group_size: usize,
	pub is_uneven_group: bool,
	/// Middle edge of an odd group; always drawn straight.
	pub is_middle: bool,
	pub is_lower_half: bool,
	pub direction: ArcDirection,
	/// Slot index counted from the start of its half.
	pub corrected_index: usize,
	/// The edge runs against its pair's canonical (lower index first) order.
	pub reversed: bool,
}

impl ArcSlot {
	fn new(slot_index: usize, group_size: usize) -> Self {
		let is_uneven_group = group_size % 2 != 0;
		let upper_start = group_size.div_ceil(2);
		let is_lower_half = 2 * slot_index <= group_size;
		Self {
			slot_index,
			group_size,
			is_uneven_group,
			is_middle: is_uneven_group && slot_index == upper_start,
			is_lower_half,
			direction: if is_lower_half {
				ArcDirection::Lower
			} else {
				ArcDirection::Upper
			},
			corrected_index: if is_lower_half {
				slot_index
			} else {
				slot_index - upper_start
			},
			reversed: false,
		}
	}

	/// Sweep to draw with from the edge's own source to its target. Reversed
	/// edges flip it so every slot bows to its side of the canonical chord.
	pub fn drawn_direction(&self) -> ArcDirection {
		match (self.direction, self.reversed) {
			(direction, false) => direction,
			(ArcDirection::Lower, true) => ArcDirection::Upper,
			(ArcDirection::Upper, true) => ArcDirection::Lower,
		}
	}

	/// Arc radius for this slot given the endpoint distance `dr`.
	pub fn radius(&self, dr: f64, max_same_half: f64) -> f64 {
		if self.is_middle || dr <= EPSILON {
			return 0.0;
		}
		let uneven_correction = if self.is_uneven_group { 0.0 } else { 0.5 };
		let denominator = self.corrected_index as f64 - uneven_correction;
		if denominator.abs() <= EPSILON {
			return dr;
		}
		dr * max_same_half / denominator
	}
}

/// Slot assignments for every edge, indexed by [`EdgeIdx`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryTable {
	slots: Vec<ArcSlot>,
	max_group_size: usize,
	max_same_half: f64,
}

impl GeometryTable {
	/// Groups `edges` by unordered endpoint pair and assigns slots in arena
	/// order, which follows the provider's edge order.
	pub fn resolve(edges: &[EdgeRecord], config: &GeometryConfig) -> Self {
		let mut groups: HashMap<(NodeIdx, NodeIdx), Vec<usize>> = HashMap::new();
		for (i, edge) in edges.iter().enumerate() {
			groups.entry(edge.pair_key()).or_default().push(i);
		}

		let mut slots = vec![ArcSlot::new(1, 1); edges.len()];
		let mut max_group_size = 0;
		for members in groups.values() {
			let k = members.len();
			max_group_size = max_group_size.max(k);
			for (i, &edge) in members.iter().enumerate() {
				slots[edge] = ArcSlot {
					reversed: edges[edge].source > edges[edge].target,
					..ArcSlot::new(i + 1, k)
				};
			}
		}

		let mut max_same_half = (max_group_size as f64 / config.packing).floor();
		// Two parallel edges with a zero scale would collapse onto one line.
		if max_group_size >= 2 {
			max_same_half = max_same_half.max(1.0);
		}

		Self {
			slots,
			max_group_size,
			max_same_half,
		}
	}

	pub fn slot(&self, edge: EdgeIdx) -> Option<&ArcSlot> {
		self.slots.get(edge.0)
	}

	pub fn slots(&self) -> &[ArcSlot] {
		&self.slots
	}

	pub fn max_group_size(&self) -> usize {
		self.max_group_size
	}

	pub fn max_same_half(&self) -> f64 {
		self.max_same_half
	}

	/// Radius for `edge` drawn between the given live positions.
	pub fn arc_radius(&self, edge: EdgeIdx, source: Point, target: Point) -> f64 {
		self.slot(edge)
			.map(|slot| slot.radius(source.distance(target), self.max_same_half))
			.unwrap_or(0.0)
	}

	/// Drawable path for `edge` between the given live positions.
	pub fn arc_path(&self, edge: EdgeIdx, source: Point, target: Point) -> ArcPath {
		let direction = self
			.slot(edge)
			.map(ArcSlot::drawn_direction)
			.unwrap_or(ArcDirection::Lower);
		ArcPath::new(
			source,
			target,
			self.arc_radius(edge, source, target),
			direction,
		)
	}
}

/// An edge path in center form, ready for surfaces that draw arcs by center
/// and angles (HTML canvas) rather than by endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcPath {
	Straight {
		from: Point,
		to: Point,
	},
	Circular {
		from: Point,
		to: Point,
		center: Point,
		radius: f64,
		start_angle: f64,
		end_angle: f64,
		/// Increasing angles, which is clockwise on a y-down surface.
		clockwise: bool,
	},
}

impl ArcPath {
	/// Endpoint arc with SVG `A r,r 0 0,sweep` semantics: the small arc is
	/// taken, and a radius shorter than half the chord grows to a semicircle.
	pub fn new(from: Point, to: Point, radius: f64, direction: ArcDirection) -> Self {
		let chord = from.distance(to);
		if radius <= EPSILON || chord <= EPSILON {
			return ArcPath::Straight { from, to };
		}

		let half = chord / 2.0;
		let radius = radius.max(half);
		let (x1p, y1p) = ((from.x - to.x) / 2.0, (from.y - to.y) / 2.0);
		let h2 = x1p * x1p + y1p * y1p;
		let coef = ((radius * radius - h2) / h2).max(0.0).sqrt();
		let sign = match direction {
			ArcDirection::Upper => 1.0,
			ArcDirection::Lower => -1.0,
		};
		let center = Point::new(
			sign * coef * y1p + (from.x + to.x) / 2.0,
			-sign * coef * x1p + (from.y + to.y) / 2.0,
		);

		ArcPath::Circular {
			from,
			to,
			center,
			radius,
			start_angle: (from.y - center.y).atan2(from.x - center.x),
			end_angle: (to.y - center.y).atan2(to.x - center.x),
			clockwise: direction == ArcDirection::Upper,
		}
	}

	pub fn is_straight(&self) -> bool {
		matches!(self, ArcPath::Straight { .. })
	}

	/// SVG path data: `M x,y L x,y` or `M x,y A r,r 0 0,s x,y`.
	pub fn svg_path(&self) -> String {
		match *self {
			ArcPath::Straight { from, to } => {
				format!("M{},{} L{},{}", from.x, from.y, to.x, to.y)
			}
			ArcPath::Circular {
				from,
				to,
				radius,
				clockwise,
				..
			} => {
				let direction = if clockwise {
					ArcDirection::Upper
				} else {
					ArcDirection::Lower
				};
				format!(
					"M{},{} A{radius},{radius} 0 0,{} {},{}",
					from.x,
					from.y,
					direction.sweep_flag(),
					to.x,
					to.y
				)
			}
		}
	}

	/// Signed angular extent from start to end.
	fn sweep(&self) -> f64 {
		match *self {
			ArcPath::Straight { .. } => 0.0,
			ArcPath::Circular {
				start_angle,
				end_angle,
				clockwise,
				..
			} => {
				if clockwise {
					(end_angle - start_angle).rem_euclid(TAU)
				} else {
					-(start_angle - end_angle).rem_euclid(TAU)
				}
			}
		}
	}

	/// Point at parameter `t` in `[0, 1]` along the path.
	pub fn point_at(&self, t: f64) -> Point {
		match *self {
			ArcPath::Straight { from, to } => {
				Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
			}
			ArcPath::Circular {
				center,
				radius,
				start_angle,
				..
			} => {
				let angle = start_angle + self.sweep() * t;
				Point::new(
					center.x + radius * angle.cos(),
					center.y + radius * angle.sin(),
				)
			}
		}
	}

	/// Approximate distance from `point` to the path, by sampling.
	pub fn distance_to(&self, point: Point, samples: usize) -> f64 {
		let samples = samples.max(2);
		let mut best = f64::INFINITY;
		let mut prev = self.point_at(0.0);
		for i in 1..=samples {
			let next = self.point_at(i as f64 / samples as f64);
			best = best.min(segment_distance(point, prev, next));
			prev = next;
		}
		best
	}

	/// Tip of an arrow that ends `inset` world units before the target, with
	/// the unit direction of travel there.
	pub fn arrow_tip(&self, inset: f64) -> (Point, (f64, f64)) {
		match *self {
			ArcPath::Straight { from, to } => {
				let dist = from.distance(to);
				if dist <= EPSILON {
					return (to, (1.0, 0.0));
				}
				let (ux, uy) = ((to.x - from.x) / dist, (to.y - from.y) / dist);
				(Point::new(to.x - ux * inset, to.y - uy * inset), (ux, uy))
			}
			ArcPath::Circular {
				center,
				radius,
				end_angle,
				..
			} => {
				let sweep = self.sweep();
				let offset = (inset / radius).min(sweep.abs());
				let direction = sweep.signum();
				let angle = end_angle - direction * offset;
				let tip = Point::new(
					center.x + radius * angle.cos(),
					center.y + radius * angle.sin(),
				);
				(tip, (-angle.sin() * direction, angle.cos() * direction))
			}
		}
	}
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	let len_sq = dx * dx + dy * dy;
	if len_sq <= EPSILON {
		return p.distance(a);
	}
	let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
	p.distance(Point::new(a.x + dx * t, a.y + dy * t))
}
