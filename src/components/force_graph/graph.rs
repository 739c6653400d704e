//! Node and edge arena built from validated input data.
//!
//! Nodes and edges are addressed by dense indices. Edges whose endpoints do not
//! resolve are dropped here, so every later stage (adjacency, arc geometry,
//! layout) only ever sees valid references.

use std::collections::HashMap;

use log::warn;

use super::error::{Endpoint, GraphError};
use super::types::{Attributes, GraphData};

/// Index of a node in the [`Graph`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIdx(pub usize);

/// Index of an edge in the [`Graph`] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeIdx(pub usize);

/// Static description of a node. Positions live in the layout engine.
#[derive(Clone, Debug)]
pub struct NodeRecord {
	pub id: String,
	pub attributes: Attributes,
}

/// A validated edge. `position` is the edge's place in the provider's sequence,
/// which gives parallel edges a stable order.
#[derive(Clone, Debug)]
pub struct EdgeRecord {
	pub source: NodeIdx,
	pub target: NodeIdx,
	pub position: usize,
	pub attributes: Attributes,
}

impl EdgeRecord {
	/// Unordered endpoint key: A→B and B→A share it.
	pub fn pair_key(&self) -> (NodeIdx, NodeIdx) {
		pair_key(self.source, self.target)
	}
}

pub fn pair_key(a: NodeIdx, b: NodeIdx) -> (NodeIdx, NodeIdx) {
	if a <= b { (a, b) } else { (b, a) }
}

/// Arena of nodes and edges.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<NodeRecord>,
	edges: Vec<EdgeRecord>,
	index_by_id: HashMap<String, NodeIdx>,
}

impl Graph {
	/// Builds the arena, returning the problems found alongside it.
	///
	/// Problems are also logged; none of them prevents the rest of the graph
	/// from being built.
	pub fn build(data: &GraphData) -> (Self, Vec<GraphError>) {
		let mut graph = Self::default();
		let mut problems = Vec::new();

		for (position, node) in data.nodes.iter().enumerate() {
			if graph.index_by_id.contains_key(&node.id) {
				problems.push(GraphError::DuplicateNode {
					position,
					id: node.id.clone(),
				});
				continue;
			}
			let idx = NodeIdx(graph.nodes.len());
			graph.index_by_id.insert(node.id.clone(), idx);
			graph.nodes.push(NodeRecord {
				id: node.id.clone(),
				attributes: node.attributes.clone(),
			});
		}

		for (position, edge) in data.edges.iter().enumerate() {
			let source = graph.index_of(&edge.source);
			let target = graph.index_of(&edge.target);
			match (source, target) {
				(Some(source), Some(target)) => graph.edges.push(EdgeRecord {
					source,
					target,
					position,
					attributes: edge.attributes.clone(),
				}),
				(None, _) => problems.push(GraphError::DanglingEdge {
					position,
					endpoint: Endpoint::Source,
					id: edge.source.clone(),
				}),
				(_, None) => problems.push(GraphError::DanglingEdge {
					position,
					endpoint: Endpoint::Target,
					id: edge.target.clone(),
				}),
			}
		}

		for problem in &problems {
			warn!("arc-graph: {problem}");
		}

		(graph, problems)
	}

	pub fn index_of(&self, id: &str) -> Option<NodeIdx> {
		self.index_by_id.get(id).copied()
	}

	pub fn node(&self, idx: NodeIdx) -> Option<&NodeRecord> {
		self.nodes.get(idx.0)
	}

	pub fn edge(&self, idx: EdgeIdx) -> Option<&EdgeRecord> {
		self.edges.get(idx.0)
	}

	pub fn nodes(&self) -> &[NodeRecord] {
		&self.nodes
	}

	pub fn edges(&self) -> &[EdgeRecord] {
		&self.edges
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Endpoint index pairs, in arena order. Used by the link force.
	pub fn edge_endpoints(&self) -> Vec<(NodeIdx, NodeIdx)> {
		self.edges.iter().map(|e| (e.source, e.target)).collect()
	}
}
