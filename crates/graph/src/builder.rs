use crate::error::{GraphError, Result};
use crate::model::*;
use causal_protocol::{RawAnalysis, RawEdge, RawNode, RawRealtimeState};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

/// Turns a raw analysis payload into a [`Graph`].
///
/// Construction is total: every input node and edge produces exactly one output
/// node or edge, in the same order. Defaults are resolved here once.
#[derive(Debug, Default, Clone, Copy)]
pub struct GraphBuilder;

impl GraphBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build from the loose JSON `data` of a `success` event.
    ///
    /// `null` yields an empty graph; anything other than an object is a
    /// structural error.
    pub fn from_value(&self, value: &Value) -> Result<Graph> {
        let raw = match value {
            Value::Null => RawAnalysis::default(),
            Value::Object(_) => RawAnalysis::deserialize(value)?,
            other => return Err(GraphError::UnexpectedPayload(json_kind(other))),
        };
        Ok(self.build(&raw))
    }

    pub fn build(&self, raw: &RawAnalysis) -> Graph {
        let nodes: Vec<CausalNode> = raw.nodes.iter().map(build_node).collect();

        let mut seen_pairs: HashMap<(&str, &str), usize> = HashMap::new();
        let edges: Vec<CausalEdge> = raw
            .edges
            .iter()
            .map(|edge| {
                let repeat = seen_pairs
                    .entry((edge.source.as_str(), edge.target.as_str()))
                    .or_insert(0);
                let built = build_edge(edge, *repeat);
                *repeat += 1;
                built
            })
            .collect();

        let meta = raw.metadata.clone().unwrap_or_default();
        let info = AnalysisInfo {
            explanation: raw.explanation.clone(),
            query: raw.query.clone(),
            timestamp: raw.timestamp.clone(),
            depth: meta.depth,
            reported_nodes: meta.total_nodes,
            reported_edges: meta.total_edges,
            analysis_time: meta.analysis_time,
        };

        log::info!(
            "Built causal graph: {} nodes, {} edges",
            nodes.len(),
            edges.len()
        );

        Graph { nodes, edges, info }
    }
}

fn build_node(raw: &RawNode) -> CausalNode {
    let label = match raw.label.as_deref() {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => raw.id.clone(),
    };

    CausalNode {
        id: raw.id.clone(),
        label,
        node_type: NodeType::parse(raw.node_type.as_deref()),
        description: raw.description.clone(),
        confidence: raw
            .confidence
            .and_then(|value| clamp_unit("confidence", &raw.id, value)),
        realtime_state: raw.realtime_state.as_ref().map(build_realtime_state),
        metadata: raw.metadata.clone(),
    }
}

fn build_realtime_state(raw: &RawRealtimeState) -> RealtimeState {
    RealtimeState {
        latest_value: raw.latest_value.clone(),
        change_percent: raw.change_percent.clone(),
        trend: Trend::parse(raw.trend.as_deref()),
        updated_at: raw.updated_at.clone(),
        sources: raw
            .sources
            .iter()
            .map(|source| Source {
                url: source.url.clone(),
                title: source.title.clone(),
                domain: source.domain.clone(),
            })
            .collect(),
    }
}

fn build_edge(raw: &RawEdge, repeat: usize) -> CausalEdge {
    let mut id = format!("{}-{}", raw.source, raw.target);
    if repeat > 0 {
        id.push_str(&format!("#{repeat}"));
    }

    let strength = raw
        .strength
        .and_then(|value| clamp_unit("strength", &id, value))
        .unwrap_or(DEFAULT_STRENGTH);

    CausalEdge {
        id,
        source: raw.source.clone(),
        target: raw.target.clone(),
        label: raw.label.clone(),
        description: raw.description.clone(),
        strength,
        strength_level: StrengthLevel::from_strength(strength),
        bidirectional: raw.bidirectional,
        metadata: raw.metadata.clone(),
    }
}

/// Clamp into `[0, 1]`. NaN counts as absent.
fn clamp_unit(field: &str, owner: &str, value: f64) -> Option<f64> {
    if value.is_nan() {
        log::debug!("Ignoring NaN {field} on '{owner}'");
        return None;
    }
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        log::debug!("Clamped {field} of '{owner}' from {value} to {clamped}");
    }
    Some(clamped)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
