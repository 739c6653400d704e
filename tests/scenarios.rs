//! End-to-end scenarios through the public API.

#![allow(unused_crate_dependencies)]

use arc_graph::components::force_graph::adjacency::AdjacencyIndex;
use arc_graph::components::force_graph::{
	EdgeIdx, EngineConfig, ForceGraphState, GeometryConfig, GeometryTable, Graph, GraphData,
	GraphEdge, GraphError, GraphNode, NodeIdx, Point, PointerEvent, PointerKind, RunState,
};

fn three_parallel() -> GraphData {
	serde_json::from_str(
		r#"{
			"nodes": [{ "id": "A" }, { "id": "B" }],
			"edges": [
				{ "source": "A", "target": "B", "amount": 10 },
				{ "source": "A", "target": "B", "amount": 20 },
				{ "source": "B", "target": "A", "amount": 30 }
			]
		}"#,
	)
	.unwrap()
}

#[test]
fn three_parallel_edges_split_into_two_opposite_arcs_and_a_line() {
	let (graph, problems) = Graph::build(&three_parallel());
	assert!(problems.is_empty());
	let table = GeometryTable::resolve(graph.edges(), &GeometryConfig::default());

	let slots: Vec<_> = table.slots().iter().map(|s| (s.slot_index, s.group_size)).collect();
	assert_eq!(slots, vec![(1, 3), (2, 3), (3, 3)]);

	let (a, b) = (Point::new(100.0, 100.0), Point::new(300.0, 100.0));
	let straight: Vec<_> = (0..3)
		.filter(|&i| table.arc_path(EdgeIdx(i), a, b).is_straight())
		.collect();
	assert_eq!(straight, vec![1]);

	let first = table.arc_radius(EdgeIdx(0), a, b);
	assert!(first > 0.0);
	assert_eq!(first, table.arc_radius(EdgeIdx(2), b, a));

	// Drawn from their own sources, the curved edges still land on opposite
	// sides of the A-B line, the same distance from it.
	let bow_first = table.arc_path(EdgeIdx(0), a, b).point_at(0.5).y - 100.0;
	let bow_third = table.arc_path(EdgeIdx(2), b, a).point_at(0.5).y - 100.0;
	assert!(bow_first * bow_third < 0.0);
	assert!((bow_first.abs() - bow_third.abs()).abs() < 1e-6);
}

#[test]
fn lone_node_settles_where_it_starts() {
	let data = GraphData {
		nodes: vec![GraphNode::new("solo")],
		edges: Vec::new(),
	};
	let mut state = ForceGraphState::new(&data, &EngineConfig::default(), 640.0, 480.0).unwrap();
	let start = state.nodes()[0].position();

	for _ in 0..1000 {
		state.frame(0.016);
	}

	assert_eq!(state.simulation().state(), RunState::Paused);
	let end = state.nodes()[0].position();
	assert!(start.distance(end) < 1e-9);
	assert_eq!(end, Point::new(320.0, 240.0));
	assert!(state.arcs().is_empty());
}

#[test]
fn dangling_edge_is_dropped_and_the_rest_renders() {
	let data = GraphData {
		nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
		edges: vec![
			GraphEdge::new("a", "ghost"),
			GraphEdge::new("a", "b"),
			GraphEdge::new("b", "a"),
		],
	};
	let state = ForceGraphState::new(&data, &EngineConfig::default(), 800.0, 600.0).unwrap();

	assert_eq!(
		state.problems(),
		&[GraphError::DanglingEdge {
			position: 0,
			endpoint: arc_graph::components::force_graph::error::Endpoint::Target,
			id: "ghost".into(),
		}]
	);
	assert_eq!(state.graph().edge_count(), 2);
	assert_eq!(state.arcs().len(), 2);
	assert_eq!(state.geometry().max_group_size(), 2);

	let adjacency = AdjacencyIndex::build(state.graph().edges());
	assert_eq!(adjacency.interaction_count(NodeIdx(0), NodeIdx(1)), 2);
	assert_eq!(adjacency.pair_count(), 1);
}

#[test]
fn dragging_pins_then_releases_a_node() {
	let config = EngineConfig::default();
	let mut state = ForceGraphState::new(&three_parallel(), &config, 800.0, 600.0).unwrap();
	while state.simulation().state() == RunState::Running {
		state.frame(0.016);
	}

	let b = state.nodes()[1].position();
	state.handle_pointer(&PointerEvent::at(PointerKind::Down, b.x, b.y));
	assert_eq!(state.simulation().state(), RunState::Running);

	state.handle_pointer(&PointerEvent::at(PointerKind::Move, 700.0, 100.0));
	for _ in 0..30 {
		state.frame(0.016);
		assert_eq!(state.nodes()[1].position(), Point::new(700.0, 100.0));
	}

	state.handle_pointer(&PointerEvent::at(PointerKind::Up, 700.0, 100.0));
	assert!(!state.nodes()[1].is_pinned());
	assert_eq!(state.simulation().engine().alpha_target(), 0.0);
}
