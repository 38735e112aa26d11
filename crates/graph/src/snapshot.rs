use crate::builder::GraphBuilder;
use crate::error::Result;
use crate::layout::{Bounds, Direction, LayoutEngine, LayoutStats, PositionedNode};
use crate::model::{AnalysisInfo, CausalEdge, Graph};
use crate::sources::{aggregate_sources, Citation};
use crate::validate::{validate, Violation};
use serde::{Deserialize, Serialize};

pub const EXPORT_VERSION: &str = "1.0.0";

/// Read-only result of one ingestion cycle, handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphSnapshot {
    pub positioned_nodes: Vec<PositionedNode>,
    pub edges: Vec<CausalEdge>,
    pub citation_list: Vec<Citation>,
    pub validation_warnings: Vec<Violation>,
    pub direction: Direction,
    pub bounds: Bounds,
    pub stats: LayoutStats,
    pub analysis: AnalysisInfo,
}

impl GraphSnapshot {
    /// Validate, lay out and aggregate `graph`. Violations become warnings; the
    /// graph is laid out regardless.
    pub fn assemble(graph: &Graph, engine: &LayoutEngine) -> Self {
        let validation_warnings = validate(graph);
        for violation in &validation_warnings {
            log::warn!("Graph integrity: {violation}");
        }

        let layout = engine.layout(graph);
        log::info!(
            "Laid out {} nodes {} over {:.0}x{:.0}",
            layout.nodes.len(),
            layout.direction,
            layout.bounds.width(),
            layout.bounds.height()
        );
        Self {
            positioned_nodes: layout.nodes,
            edges: layout.edges,
            citation_list: aggregate_sources(graph),
            validation_warnings,
            direction: layout.direction,
            bounds: layout.bounds,
            stats: layout.stats,
            analysis: graph.info.clone(),
        }
    }

    /// Full pipeline from the `data` of a `success` event.
    pub fn from_payload(payload: &serde_json::Value, engine: &LayoutEngine) -> Result<Self> {
        let graph = GraphBuilder::new().from_value(payload)?;
        Ok(Self::assemble(&graph, engine))
    }
}

/// Shareable export of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    /// Unix milliseconds
    pub timestamp_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub snapshot: GraphSnapshot,
}

impl ExportDocument {
    /// `query` falls back to the one reported by the analysis.
    pub fn new(snapshot: GraphSnapshot, query: Option<String>, timestamp_ms: u64) -> Self {
        let query = query.or_else(|| snapshot.analysis.query.clone());
        Self {
            version: EXPORT_VERSION.to_string(),
            timestamp_ms,
            query,
            snapshot,
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
