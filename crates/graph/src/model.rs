use causal_protocol::Reading;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a factor in the causal chain
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Cause,
    Effect,
    #[default]
    Intermediate,
    Hypothesis,
    Evidence,
}

impl NodeType {
    /// Unknown or absent types fall back to [`NodeType::Intermediate`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("cause") => Self::Cause,
            Some("effect") => Self::Effect,
            Some("hypothesis") => Self::Hypothesis,
            Some("evidence") => Self::Evidence,
            _ => Self::Intermediate,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cause => "cause",
            Self::Effect => "effect",
            Self::Intermediate => "intermediate",
            Self::Hypothesis => "hypothesis",
            Self::Evidence => "evidence",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Rising,
    Falling,
    #[default]
    Stable,
}

impl Trend {
    /// Anything outside the three known values reads as `stable`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("rising") => Self::Rising,
            Some("falling") => Self::Falling,
            _ => Self::Stable,
        }
    }
}

/// External reference backing a node's live reading. `url` is its identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Source {
    pub url: String,
    pub title: String,
    pub domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_value: Option<Reading>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_percent: Option<Reading>,
    pub trend: Trend,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Always within `[0, 1]` once built.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realtime_state: Option<RealtimeState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CausalNode {
    pub fn new(id: impl Into<String>, label: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            node_type,
            description: None,
            confidence: None,
            realtime_state: None,
            metadata: None,
        }
    }

    /// Sources of the live reading, in their given order.
    pub fn sources(&self) -> &[Source] {
        self.realtime_state
            .as_ref()
            .map(|state| state.sources.as_slice())
            .unwrap_or_default()
    }
}

/// Discretized causal strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrengthLevel {
    Weak,
    Moderate,
    Strong,
}

impl StrengthLevel {
    /// weak `< 0.3`, moderate `[0.3, 0.7)`, strong `>= 0.7`.
    pub fn from_strength(strength: f64) -> Self {
        if strength < 0.3 {
            Self::Weak
        } else if strength < 0.7 {
            Self::Moderate
        } else {
            Self::Strong
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weak => "weak",
            Self::Moderate => "moderate",
            Self::Strong => "strong",
        }
    }
}

/// Strength assumed when the payload gives none.
pub const DEFAULT_STRENGTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CausalEdge {
    /// `"{source}-{target}"`, suffixed `#k` for the k-th parallel repeat.
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub strength: f64,
    pub strength_level: StrengthLevel,
    pub bidirectional: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl CausalEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("{source}-{target}"),
            source,
            target,
            label: None,
            description: None,
            strength: DEFAULT_STRENGTH,
            strength_level: StrengthLevel::from_strength(DEFAULT_STRENGTH),
            bidirectional: false,
            metadata: None,
        }
    }
}

/// Envelope fields of the analysis that produced a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    /// Node count claimed upstream; the graph itself is authoritative.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_nodes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_edges: Option<u64>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_time: Option<f64>,
}

/// One ingestion cycle's graph. Replaced wholesale on the next payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    pub nodes: Vec<CausalNode>,
    pub edges: Vec<CausalEdge>,
    #[serde(default)]
    pub info: AnalysisInfo,
}

impl Graph {
    pub fn new(nodes: Vec<CausalNode>, edges: Vec<CausalEdge>) -> Self {
        Self {
            nodes,
            edges,
            info: AnalysisInfo::default(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// id -> position of its first occurrence in `nodes`.
    pub fn id_index(&self) -> HashMap<&str, usize> {
        let mut index = HashMap::with_capacity(self.nodes.len());
        for (pos, node) in self.nodes.iter().enumerate() {
            index.entry(node.id.as_str()).or_insert(pos);
        }
        index
    }
}
