//! Frame-driven driver for the layout engine.
//!
//! The host (a `requestAnimationFrame` loop in the browser, a plain `for` loop
//! in tests) calls [`Simulation::frame`] once per frame. The simulation ticks
//! while warm, pauses itself once settled, and can be reheated, paused,
//! resumed or cancelled explicitly. Cancelling drops the tick listener so
//! nothing keeps mutating positions for a torn-down surface.

use log::debug;

use super::simulation::{ForceLayoutEngine, SimNode};

/// Called after every tick with the updated node slice.
pub type TickListener = Box<dyn FnMut(&[SimNode])>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
	Running,
	/// Settled or paused by the host. Resumable.
	Paused,
	/// Torn down. Never ticks again.
	Cancelled,
}

/// Outcome of one [`Simulation::frame`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
	/// Positions changed this frame.
	Ticked,
	/// Nothing to do; keep the frame loop alive for interaction.
	Idle,
	/// The host should stop scheduling frames.
	Cancelled,
}

/// Owns the engine and its tick/pause/resume/cancel lifecycle.
pub struct Simulation {
	engine: ForceLayoutEngine,
	state: RunState,
	listener: Option<TickListener>,
	ticks: u64,
	/// Set between `reheat` and `cool`; the loop keeps ticking even when cold.
	held: bool,
}

impl Simulation {
	pub fn new(engine: ForceLayoutEngine) -> Self {
		Self {
			engine,
			state: RunState::Running,
			listener: None,
			ticks: 0,
			held: false,
		}
	}

	pub fn engine(&self) -> &ForceLayoutEngine {
		&self.engine
	}

	pub fn engine_mut(&mut self) -> &mut ForceLayoutEngine {
		&mut self.engine
	}

	pub fn state(&self) -> RunState {
		self.state
	}

	pub fn ticks(&self) -> u64 {
		self.ticks
	}

	/// Registers the tick listener, replacing any previous one.
	pub fn on_tick(&mut self, listener: TickListener) {
		if self.state != RunState::Cancelled {
			self.listener = Some(listener);
		}
	}

	pub fn has_listener(&self) -> bool {
		self.listener.is_some()
	}

	/// Runs at most one tick.
	pub fn frame(&mut self) -> FrameStatus {
		match self.state {
			RunState::Cancelled => return FrameStatus::Cancelled,
			RunState::Paused => return FrameStatus::Idle,
			RunState::Running => {}
		}

		if self.engine.is_empty() {
			self.state = RunState::Paused;
			return FrameStatus::Idle;
		}

		self.engine.tick();
		self.ticks += 1;
		if let Some(listener) = self.listener.as_mut() {
			listener(self.engine.nodes());
		}

		if !self.held && self.engine.is_settled() {
			debug!(
				"arc-graph: layout settled after {} ticks (alpha {:.4})",
				self.ticks,
				self.engine.alpha()
			);
			self.state = RunState::Paused;
		}
		FrameStatus::Ticked
	}

	/// Ticks until settled, paused, or `max_ticks` is reached. Returns the
	/// number of ticks run.
	pub fn run(&mut self, max_ticks: usize) -> usize {
		let mut ran = 0;
		while ran < max_ticks && self.frame() == FrameStatus::Ticked {
			ran += 1;
		}
		ran
	}

	pub fn pause(&mut self) {
		if self.state == RunState::Running {
			self.state = RunState::Paused;
		}
	}

	pub fn resume(&mut self) {
		if self.state == RunState::Paused {
			self.state = RunState::Running;
		}
	}

	/// Holds the layout warm at `alpha_target` and keeps ticking until
	/// [`Simulation::cool`], however low the target.
	pub fn reheat(&mut self, alpha_target: f64) {
		self.engine.set_alpha_target(alpha_target);
		self.held = true;
		self.resume();
	}

	/// Lets alpha fall back towards `alpha_target`. Ticking continues until
	/// the layout settles.
	pub fn cool(&mut self, alpha_target: f64) {
		self.engine.set_alpha_target(alpha_target);
		self.held = false;
	}

	/// Restarts the layout from full heat, as after loading a new graph.
	pub fn restart(&mut self) {
		self.engine.set_alpha(1.0);
		self.resume();
	}

	/// Stops for good and drops the tick listener.
	pub fn cancel(&mut self) {
		if self.state != RunState::Cancelled {
			debug!("arc-graph: simulation cancelled after {} ticks", self.ticks);
		}
		self.state = RunState::Cancelled;
		self.listener = None;
	}
}

#[cfg(test)]
mod tests {
	use std::cell::Cell;
	use std::rc::Rc;

	use super::*;
	use crate::components::force_graph::graph::NodeIdx;
	use crate::components::force_graph::simulation::SimulationConfig;

	fn simulation(count: usize, edges: &[(usize, usize)]) -> Simulation {
		let edges: Vec<_> = edges.iter().map(|&(s, t)| (NodeIdx(s), NodeIdx(t))).collect();
		Simulation::new(
			ForceLayoutEngine::new(count, &edges, SimulationConfig::default(), 800.0, 600.0)
				.unwrap(),
		)
	}

	#[test]
	fn listener_sees_every_tick() {
		let mut sim = simulation(3, &[(0, 1), (1, 2)]);
		let calls = Rc::new(Cell::new(0));
		let seen = calls.clone();
		sim.on_tick(Box::new(move |nodes| {
			assert_eq!(nodes.len(), 3);
			seen.set(seen.get() + 1);
		}));
		assert_eq!(sim.run(25), 25);
		assert_eq!(calls.get(), 25);
	}

	#[test]
	fn pauses_itself_once_settled() {
		let mut sim = simulation(2, &[(0, 1)]);
		let ran = sim.run(10_000);
		assert!(ran > 250 && ran < 350, "ran {ran} ticks");
		assert_eq!(sim.state(), RunState::Paused);
		assert_eq!(sim.frame(), FrameStatus::Idle);
	}

	#[test]
	fn reheat_resumes_a_settled_layout() {
		let mut sim = simulation(2, &[(0, 1)]);
		sim.run(10_000);
		sim.reheat(0.3);
		assert_eq!(sim.frame(), FrameStatus::Ticked);
		sim.cool(0.0);
		sim.run(10_000);
		assert_eq!(sim.state(), RunState::Paused);
	}

	#[test]
	fn reheat_to_zero_keeps_ticking_until_cooled() {
		let mut sim = simulation(2, &[(0, 1)]);
		sim.run(10_000);
		sim.reheat(0.0);
		assert_eq!(sim.run(2_000), 2_000);
		assert_eq!(sim.state(), RunState::Running);

		sim.cool(0.0);
		assert_eq!(sim.run(10), 1);
		assert_eq!(sim.state(), RunState::Paused);
	}

	#[test]
	fn empty_graph_never_ticks() {
		let mut sim = simulation(0, &[]);
		assert_eq!(sim.frame(), FrameStatus::Idle);
		assert_eq!(sim.ticks(), 0);
	}

	#[test]
	fn cancel_drops_listener_and_stops_for_good() {
		let mut sim = simulation(2, &[]);
		sim.on_tick(Box::new(|_| {}));
		sim.cancel();
		assert!(!sim.has_listener());
		sim.resume();
		sim.reheat(0.5);
		assert_eq!(sim.frame(), FrameStatus::Cancelled);
		sim.on_tick(Box::new(|_| {}));
		assert!(!sim.has_listener());
	}
}
