//! Hover tooltip: content formatting and a linear opacity fade.

use super::geometry::Point;
use super::graph::{EdgeRecord, Graph, NodeRecord};
use super::types::attribute_text;

/// Peak opacity of a shown tooltip.
pub const SHOWN_OPACITY: f64 = 0.8;
const FADE_IN_SECS: f64 = 0.3;
const FADE_OUT_SECS: f64 = 0.1;
/// Vertical offset applied while following the pointer over an edge.
const EDGE_FOLLOW_OFFSET: f64 = 10.0;

/// Heading plus body lines, rendered as `<h5>`, `<hr>`, then one `<p>` each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TooltipContent {
	pub title: String,
	pub lines: Vec<String>,
}

impl TooltipContent {
	pub fn for_edge(edge: &EdgeRecord, graph: &Graph) -> Self {
		let id = |idx| {
			graph
				.node(idx)
				.map(|n: &NodeRecord| n.id.clone())
				.unwrap_or_default()
		};
		let (source, target) = (id(edge.source), id(edge.target));
		let title = attribute_text(&edge.attributes, "transactionType")
			.unwrap_or_else(|| format!("{source} → {target}"));

		let mut lines = vec![format!("Source: {source}"), format!("Target: {target}")];
		if let Some(amount) = attribute_text(&edge.attributes, "amount") {
			let line = match attribute_text(&edge.attributes, "currency") {
				Some(currency) => format!("Amount: ({currency}) {amount}"),
				None => format!("Amount: {amount}"),
			};
			lines.push(line);
		}
		Self { title, lines }
	}

	pub fn for_node(node: &NodeRecord) -> Self {
		let title = attribute_text(&node.attributes, "cif").unwrap_or_else(|| node.id.clone());
		let lines = [("name", "Name"), ("surName", "Surname")]
			.into_iter()
			.filter_map(|(key, label)| {
				attribute_text(&node.attributes, key).map(|value| format!("{label}: {value}"))
			})
			.collect();
		Self { title, lines }
	}

	/// Inner HTML with attribute values escaped.
	pub fn to_html(&self) -> String {
		let mut html = format!("<h5>{}</h5><hr />", escape(&self.title));
		for line in &self.lines {
			html.push_str("<p>");
			html.push_str(&escape(line));
			html.push_str("</p>");
		}
		html
	}
}

fn escape(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Overlay state advanced once per frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
	content: Option<TooltipContent>,
	/// Page coordinates of the overlay's top-left corner.
	position: Point,
	opacity: f64,
	visible: bool,
	follow_offset: f64,
}

impl Tooltip {
	/// Shows `content` at `page` and starts fading in.
	pub fn show_node(&mut self, content: TooltipContent, page: Point) {
		self.show(content, page, 0.0);
	}

	pub fn show_edge(&mut self, content: TooltipContent, page: Point) {
		self.show(content, page, EDGE_FOLLOW_OFFSET);
	}

	fn show(&mut self, content: TooltipContent, page: Point, follow_offset: f64) {
		self.content = Some(content);
		self.position = page;
		self.follow_offset = follow_offset;
		self.visible = true;
	}

	/// Starts fading out; content stays until fully transparent.
	pub fn hide(&mut self) {
		self.visible = false;
	}

	/// Tracks the pointer while shown.
	pub fn follow(&mut self, page: Point) {
		if self.visible {
			self.position = Point::new(page.x, page.y + self.follow_offset);
		}
	}

	/// Advances the fade by `dt` seconds.
	pub fn tick(&mut self, dt: f64) {
		let dt = dt.max(0.0);
		if self.visible {
			self.opacity = (self.opacity + SHOWN_OPACITY * dt / FADE_IN_SECS).min(SHOWN_OPACITY);
		} else if self.opacity > 0.0 {
			self.opacity = (self.opacity - SHOWN_OPACITY * dt / FADE_OUT_SECS).max(0.0);
			if self.opacity == 0.0 {
				self.content = None;
			}
		}
	}

	pub fn opacity(&self) -> f64 {
		self.opacity
	}

	pub fn position(&self) -> Point {
		self.position
	}

	pub fn content(&self) -> Option<&TooltipContent> {
		self.content.as_ref()
	}

	pub fn is_visible(&self) -> bool {
		self.visible
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::force_graph::graph::EdgeIdx;
	use crate::components::force_graph::types::{GraphData, GraphEdge, GraphNode};

	fn graph() -> Graph {
		let data = GraphData {
			nodes: vec![
				GraphNode::new("1001")
					.with("cif", "C-1")
					.with("name", "Ada")
					.with("surName", "Lovelace"),
				GraphNode::new("1002"),
			],
			edges: vec![
				GraphEdge::new("1001", "1002")
					.with("transactionType", "wire")
					.with("amount", 250)
					.with("currency", "EUR"),
				GraphEdge::new("1002", "1001"),
			],
		};
		Graph::build(&data).0
	}

	#[test]
	fn edge_content_lists_endpoints_and_amount() {
		let graph = graph();
		let content = TooltipContent::for_edge(graph.edge(EdgeIdx(0)).unwrap(), &graph);
		assert_eq!(content.title, "wire");
		assert_eq!(
			content.lines,
			vec!["Source: 1001", "Target: 1002", "Amount: (EUR) 250"]
		);

		let bare = TooltipContent::for_edge(graph.edge(EdgeIdx(1)).unwrap(), &graph);
		assert_eq!(bare.title, "1002 → 1001");
		assert_eq!(bare.lines.len(), 2);
	}

	#[test]
	fn node_content_falls_back_to_id() {
		let graph = graph();
		let full = TooltipContent::for_node(&graph.nodes()[0]);
		assert_eq!(full.title, "C-1");
		assert_eq!(full.lines, vec!["Name: Ada", "Surname: Lovelace"]);

		let bare = TooltipContent::for_node(&graph.nodes()[1]);
		assert_eq!(bare.title, "1002");
		assert!(bare.lines.is_empty());
	}

	#[test]
	fn html_is_escaped() {
		let content = TooltipContent {
			title: "<b>".into(),
			lines: vec!["a & b".into()],
		};
		assert_eq!(content.to_html(), "<h5>&lt;b&gt;</h5><hr /><p>a &amp; b</p>");
	}

	#[test]
	fn fades_in_slowly_and_out_quickly() {
		let mut tooltip = Tooltip::default();
		let content = TooltipContent {
			title: "t".into(),
			lines: Vec::new(),
		};
		tooltip.show_node(content, Point::new(5.0, 5.0));
		tooltip.tick(0.15);
		assert!((tooltip.opacity() - 0.4).abs() < 1e-9);
		tooltip.tick(1.0);
		assert_eq!(tooltip.opacity(), SHOWN_OPACITY);

		tooltip.hide();
		tooltip.tick(0.05);
		assert!((tooltip.opacity() - 0.4).abs() < 1e-9);
		assert!(tooltip.content().is_some());
		tooltip.tick(0.05);
		assert_eq!(tooltip.opacity(), 0.0);
		assert!(tooltip.content().is_none());
	}

	#[test]
	fn edge_tooltip_follows_below_pointer() {
		let mut tooltip = Tooltip::default();
		let content = TooltipContent {
			title: "t".into(),
			lines: Vec::new(),
		};
		tooltip.show_edge(content, Point::new(1.0, 2.0));
		assert_eq!(tooltip.position(), Point::new(1.0, 2.0));
		tooltip.follow(Point::new(30.0, 40.0));
		assert_eq!(tooltip.position(), Point::new(30.0, 50.0));
		tooltip.hide();
		tooltip.follow(Point::new(0.0, 0.0));
		assert_eq!(tooltip.position(), Point::new(30.0, 50.0));
	}
}
