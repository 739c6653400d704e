//! arc-graph: interactive transaction graph with parallel edges drawn as arcs.
//!
//! This crate provides a WASM-based graph view: a force-directed layout where
//! every edge between the same two nodes gets its own curved arc, with hover
//! highlighting, drag-to-pin, pan and zoom.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, error, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::force_graph::{
	ConfigError, EngineConfig, ForceGraphCanvas, GraphData, GraphEdge, GraphNode,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("arc-graph: logging initialized");
}

/// Text of a `<script id="...">` element, if present.
fn script_text(id: &str) -> Option<String> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	script.text().ok()
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], edges: [...] } (or `links`).
fn load_graph_data() -> Option<GraphData> {
	let json_text = script_text("graph-data")?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"arc-graph: loaded {} nodes, {} edges",
				data.nodes.len(),
				data.edges.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("arc-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Load engine settings from a script element with id="graph-config".
/// A missing element means defaults; an invalid one is an error.
fn load_engine_config() -> Result<EngineConfig, ConfigError> {
	match script_text("graph-config") {
		Some(json_text) => EngineConfig::from_json(&json_text),
		None => Ok(EngineConfig::default()),
	}
}

/// Main application component.
/// Loads graph data and settings from the DOM and renders the graph view.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());

	let body = match load_engine_config() {
		Ok(config) => view! {
			<ForceGraphCanvas data=graph_signal config=config fullscreen=true />
		}
		.into_any(),
		Err(e) => {
			error!("arc-graph: invalid configuration: {e}");
			view! { <p class="graph-error">{format!("Invalid graph configuration: {e}")}</p> }
				.into_any()
		}
	};

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="Transaction Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			{body}
			<div class="graph-overlay">
				<h1>"Transactions"</h1>
				<p class="subtitle">
					"Hover for details. Drag to move, double-click to release. Scroll to zoom."
				</p>
			</div>
		</div>
	}
}
