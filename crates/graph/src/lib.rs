//! # Causal Graph
//!
//! Turns the analysis payload of a finished stream into something a renderer
//! can draw.
//!
//! ## Architecture
//!
//! ```text
//! success data (serde_json::Value)
//!     │
//!     ├──> Graph Builder
//!     │      ├─ defaults: type → intermediate, strength → 0.5
//!     │      ├─ clamps confidence / strength into [0, 1]
//!     │      └─ edge ids "source-target", "#k" for parallel repeats
//!     │
//!     ├──> Validator      (duplicate ids, dangling endpoints → warnings)
//!     ├──> Source Aggregator (first url wins, node order)
//!     │
//!     └──> Layout Engine (petgraph DFS for back edges)
//!            ├─ longest-path ranks
//!            ├─ barycenter ordering
//!            └─ top-left box coordinates for LR / TB / RL / BT
//! ```
//!
//! ## Example
//!
//! ```
//! use causal_graph::{GraphSnapshot, LayoutEngine};
//! use serde_json::json;
//!
//! let payload = json!({
//!     "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
//!     "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "c"}]
//! });
//! let snapshot = GraphSnapshot::from_payload(&payload, &LayoutEngine::default()).unwrap();
//! let xs: Vec<f64> = snapshot.positioned_nodes.iter().map(|n| n.x).collect();
//! assert!(xs[0] < xs[1] && xs[1] < xs[2]);
//! ```

mod builder;
mod error;
mod layout;
mod model;
mod snapshot;
mod sources;
mod validate;

pub use builder::GraphBuilder;
pub use error::{GraphError, Result};
pub use layout::{
    bounds, Bounds, Direction, Layout, LayoutConfig, LayoutEngine, LayoutStats, PositionedNode,
};
pub use model::{
    AnalysisInfo, CausalEdge, CausalNode, Graph, NodeType, RealtimeState, Source, StrengthLevel,
    Trend, DEFAULT_STRENGTH,
};
pub use snapshot::{ExportDocument, GraphSnapshot, EXPORT_VERSION};
pub use sources::{aggregate_sources, Citation};
pub use validate::{validate, Violation};
