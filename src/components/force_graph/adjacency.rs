//! Direction-agnostic neighbor lookup used for hover highlighting.

use std::collections::HashMap;

use super::graph::{EdgeRecord, NodeIdx, pair_key};

/// Counts interactions per unordered node pair.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	counts: HashMap<(NodeIdx, NodeIdx), usize>,
}

impl AdjacencyIndex {
	pub fn build(edges: &[EdgeRecord]) -> Self {
		let mut counts = HashMap::new();
		for edge in edges {
			*counts.entry(edge.pair_key()).or_insert(0) += 1;
		}
		Self { counts }
	}

	/// A node is always its own neighbor.
	pub fn are_neighbors(&self, a: NodeIdx, b: NodeIdx) -> bool {
		a == b || self.counts.contains_key(&pair_key(a, b))
	}

	/// Number of edges between `a` and `b`, in either direction.
	pub fn interaction_count(&self, a: NodeIdx, b: NodeIdx) -> usize {
		self.counts.get(&pair_key(a, b)).copied().unwrap_or(0)
	}

	pub fn pair_count(&self) -> usize {
		self.counts.len()
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::force_graph::types::Attributes;

	fn edge(source: usize, target: usize) -> EdgeRecord {
		EdgeRecord {
			source: NodeIdx(source),
			target: NodeIdx(target),
			position: 0,
			attributes: Attributes::new(),
		}
	}

	#[test]
	fn counts_both_directions_together() {
		let index = AdjacencyIndex::build(&[edge(0, 1), edge(1, 0), edge(0, 1), edge(2, 1)]);
		assert_eq!(index.interaction_count(NodeIdx(1), NodeIdx(0)), 3);
		assert_eq!(index.interaction_count(NodeIdx(1), NodeIdx(2)), 1);
		assert_eq!(index.pair_count(), 2);
		assert!(!index.are_neighbors(NodeIdx(0), NodeIdx(2)));
	}

	#[test]
	fn every_node_neighbors_itself_even_without_edges() {
		let index = AdjacencyIndex::default();
		assert!(index.are_neighbors(NodeIdx(7), NodeIdx(7)));
	}

	proptest! {
		#[test]
		fn neighbors_is_symmetric(
			pairs in proptest::collection::vec((0usize..8, 0usize..8), 0..30),
			a in 0usize..8,
			b in 0usize..8,
		) {
			let edges: Vec<_> = pairs.iter().map(|&(s, t)| edge(s, t)).collect();
			let index = AdjacencyIndex::build(&edges);
			prop_assert_eq!(
				index.are_neighbors(NodeIdx(a), NodeIdx(b)),
				index.are_neighbors(NodeIdx(b), NodeIdx(a))
			);
			prop_assert!(index.are_neighbors(NodeIdx(a), NodeIdx(a)));
		}
	}
}
