//! Force-directed graph with parallel edges drawn as distinct arcs.
//!
//! The engine is split into headless pieces that the Leptos component wires
//! together:
//! - [`graph`]: validated node/edge arena built from [`GraphData`]
//! - [`adjacency`]: neighbor lookup for hover highlighting
//! - [`geometry`]: arc slots for parallel edges and drawable [`ArcPath`]s
//! - [`simulation`] and [`scheduler`]: the force layout and its tick lifecycle
//! - [`interaction`]: hover, drag-to-pin, zoom and pan driven by [`PointerEvent`]s
//! - [`render`]: drawing onto any [`Surface`], including an HTML canvas
//!
//! # Example
//!
//! ```ignore
//! use arc_graph::{ForceGraphCanvas, GraphData, GraphEdge, GraphNode};
//!
//! let data = GraphData {
//!     nodes: vec![GraphNode::new("a"), GraphNode::new("b")],
//!     edges: vec![
//!         GraphEdge::new("a", "b").with("amount", 120),
//!         GraphEdge::new("b", "a").with("amount", 80),
//!     ],
//! };
//!
//! view! { <ForceGraphCanvas data=data fullscreen=true /> }
//! ```

pub mod adjacency;
mod component;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod render;
pub mod scale;
pub mod scheduler;
pub mod simulation;
pub mod state;
pub mod theme;
pub mod tooltip;
mod types;

pub use component::ForceGraphCanvas;
pub use config::EngineConfig;
pub use error::{ConfigError, GraphError};
pub use geometry::{ArcPath, GeometryConfig, GeometryTable, Point};
pub use graph::{EdgeIdx, Graph, NodeIdx};
pub use interaction::{InteractionConfig, PinPolicy, PointerEvent, PointerKind, Propagation};
pub use render::Surface;
pub use scheduler::{FrameStatus, RunState, Simulation};
pub use simulation::{ForceLayoutEngine, SimulationConfig};
pub use state::ForceGraphState;
pub use theme::Theme;
pub use types::{Attributes, GraphData, GraphEdge, GraphNode};
