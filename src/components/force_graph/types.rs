//! Graph data structures for input to the force graph component.

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Free-form display attributes carried by nodes and edges (name, amount, ...).
pub type Attributes = Map<String, Value>;

/// A node in the graph.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in edges.
	/// Accepts JSON strings and integers.
	#[serde(deserialize_with = "id_from_json")]
	pub id: String,
	/// Everything else on the node object, kept for tooltips and styling.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// A directed transaction between two nodes.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphEdge {
	/// Source node ID.
	#[serde(deserialize_with = "id_from_json")]
	pub source: String,
	/// Target node ID.
	#[serde(deserialize_with = "id_from_json")]
	pub target: String,
	/// Amount, currency, transaction type and whatever else the provider sends.
	#[serde(flatten)]
	pub attributes: Attributes,
}

/// Complete graph data: nodes and edges, in provider order.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphData {
	pub nodes: Vec<GraphNode>,
	#[serde(alias = "links")]
	pub edges: Vec<GraphEdge>,
}

impl GraphNode {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			attributes: Attributes::new(),
		}
	}

	/// Adds a display attribute, builder style.
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.to_string(), value.into());
		self
	}
}

impl GraphEdge {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			attributes: Attributes::new(),
		}
	}

	/// Adds a display attribute, builder style.
	pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.to_string(), value.into());
		self
	}
}

/// Reads an attribute as display text. Numbers and booleans are formatted,
/// strings are returned without quotes.
pub fn attribute_text(attributes: &Attributes, key: &str) -> Option<String> {
	match attributes.get(key)? {
		Value::String(s) => Some(s.clone()),
		Value::Null => None,
		other => Some(other.to_string()),
	}
}

fn id_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawId {
		Text(String),
		Int(i64),
		Uint(u64),
	}

	Ok(match RawId::deserialize(deserializer)? {
		RawId::Text(s) => s,
		RawId::Int(n) => n.to_string(),
		RawId::Uint(n) => n.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_numeric_ids_and_links_alias() {
		let json = r#"{
			"nodes": [{"id": 0, "name": "Ada"}, {"id": "1", "cif": "ES-77"}],
			"links": [{"source": 0, "target": 1, "amount": "12.50", "currency": "EUR"}]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();
		assert_eq!(data.nodes[0].id, "0");
		assert_eq!(data.nodes[1].id, "1");
		assert_eq!(data.edges[0].source, "0");
		assert_eq!(attribute_text(&data.nodes[0].attributes, "name").as_deref(), Some("Ada"));
		assert_eq!(
			attribute_text(&data.edges[0].attributes, "currency").as_deref(),
			Some("EUR")
		);
	}

	#[test]
	fn attribute_text_formats_numbers() {
		let node = GraphNode::new("a").with("amount", 42.5);
		assert_eq!(attribute_text(&node.attributes, "amount").as_deref(), Some("42.5"));
		assert_eq!(attribute_text(&node.attributes, "missing"), None);
	}
}
