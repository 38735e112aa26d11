use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Analysis payload as produced upstream.
///
/// Every collection and field is optional on the wire; resolving defaults is the
/// graph builder's job, not this type's.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysis {
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<RawNode>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub edges: Vec<RawEdge>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RawAnalysisMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalysisMeta {
    #[serde(default)]
    pub depth: Option<u32>,

    #[serde(default, alias = "total_nodes")]
    pub total_nodes: Option<u64>,

    #[serde(default, alias = "total_edges")]
    pub total_edges: Option<u64>,

    /// Seconds spent upstream.
    #[serde(default, alias = "analysis_time")]
    pub analysis_time: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawNode {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Free text; mapped onto the node-type enum by the builder.
    #[serde(default, rename = "type")]
    pub node_type: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub confidence: Option<f64>,

    #[serde(default, alias = "realtime_state")]
    pub realtime_state: Option<RawRealtimeState>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Live market/news reading attached to a node by the sensing stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawRealtimeState {
    #[serde(default, alias = "latest_value")]
    pub latest_value: Option<Reading>,

    #[serde(default, alias = "change_percent")]
    pub change_percent: Option<Reading>,

    #[serde(default)]
    pub trend: Option<String>,

    #[serde(default, alias = "updated_at")]
    pub updated_at: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<RawSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RawSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub domain: String,
}

/// A reading is either preformatted text (`"101.20 USD"`, `"+1.2%"`) or a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for Reading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawEdge {
    #[serde(default, deserialize_with = "null_as_default")]
    pub source: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub target: String,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub strength: Option<f64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub bidirectional: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_object_is_an_empty_analysis() {
        let raw: RawAnalysis = serde_json::from_value(json!({})).unwrap();
        assert_eq!(raw, RawAnalysis::default());
    }

    #[test]
    fn accepts_snake_case_realtime_state() {
        let raw: RawNode = serde_json::from_value(json!({
            "id": "oil",
            "label": "Crude oil",
            "type": "cause",
            "realtime_state": {
                "latest_value": "81.30 USD",
                "change_percent": "+1.25%",
                "trend": "rising",
                "updated_at": "2024-06-01T08:00:00",
                "sources": [{
                    "url": "https://finance.yahoo.com/quote/CL=F",
                    "title": "Yahoo Finance - Crude Oil",
                    "domain": "finance.yahoo.com",
                    "type": "direct_api"
                }]
            }
        }))
        .unwrap();

        let state = raw.realtime_state.unwrap();
        assert_eq!(state.latest_value, Some(Reading::Text("81.30 USD".into())));
        assert_eq!(state.trend.as_deref(), Some("rising"));
        assert_eq!(state.sources.len(), 1);
        assert_eq!(state.sources[0].domain, "finance.yahoo.com");
    }

    #[test]
    fn numeric_readings_and_extra_fields() {
        let raw: RawNode = serde_json::from_value(json!({
            "id": "rate",
            "unexpected": [1, 2, 3],
            "realtimeState": { "latestValue": 5.25, "changePercent": -0.1 }
        }))
        .unwrap();
        let state = raw.realtime_state.unwrap();
        assert_eq!(state.latest_value, Some(Reading::Number(5.25)));
        assert_eq!(state.change_percent.unwrap().to_string(), "-0.1");
        assert!(raw.node_type.is_none());
    }

    #[test]
    fn edge_defaults() {
        let edge: RawEdge = serde_json::from_value(json!({"source": "a", "target": "b"})).unwrap();
        assert_eq!(edge.strength, None);
        assert!(!edge.bidirectional);
        assert!(edge.label.is_none());
    }

    #[test]
    fn explicit_nulls_read_as_absent() {
        let raw: RawAnalysis = serde_json::from_value(json!({
            "nodes": [{
                "id": null,
                "label": null,
                "realtimeState": { "sources": null, "trend": null }
            }],
            "edges": [{ "source": "a", "target": null, "bidirectional": null, "strength": null }],
            "metadata": null
        }))
        .unwrap();

        assert_eq!(raw.nodes[0].id, "");
        assert!(raw.nodes[0].realtime_state.as_ref().unwrap().sources.is_empty());
        assert_eq!(raw.edges[0].target, "");
        assert!(!raw.edges[0].bidirectional);
        assert_eq!(raw.edges[0].strength, None);

        let bare: RawAnalysis =
            serde_json::from_value(json!({"nodes": null, "edges": null})).unwrap();
        assert_eq!(bare, RawAnalysis::default());
    }
}
