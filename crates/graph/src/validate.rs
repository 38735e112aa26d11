use crate::model::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Structural integrity problem found in a built graph.
///
/// Violations are advisory: the graph stays usable and is rendered with warnings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Violation {
    /// `index` is the position of the repeated node, never the first occurrence.
    DuplicateNodeId { id: String, index: usize },
    UnknownSource {
        edge_id: String,
        edge_index: usize,
        source: String,
    },
    UnknownTarget {
        edge_id: String,
        edge_index: usize,
        target: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateNodeId { id, index } => {
                write!(f, "duplicate node id '{id}' at position {index}")
            }
            Self::UnknownSource {
                edge_id, source, ..
            } => write!(f, "edge '{edge_id}' references unknown source '{source}'"),
            Self::UnknownTarget {
                edge_id, target, ..
            } => write!(f, "edge '{edge_id}' references unknown target '{target}'"),
        }
    }
}

/// Every violation in `graph`: duplicate ids, then unknown sources, then unknown
/// targets. Each group follows array order.
pub fn validate(graph: &Graph) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut ids: HashSet<&str> = HashSet::with_capacity(graph.nodes.len());

    for (index, node) in graph.nodes.iter().enumerate() {
        if !ids.insert(node.id.as_str()) {
            violations.push(Violation::DuplicateNodeId {
                id: node.id.clone(),
                index,
            });
        }
    }

    for (edge_index, edge) in graph.edges.iter().enumerate() {
        if !ids.contains(edge.source.as_str()) {
            violations.push(Violation::UnknownSource {
                edge_id: edge.id.clone(),
                edge_index,
                source: edge.source.clone(),
            });
        }
    }

    for (edge_index, edge) in graph.edges.iter().enumerate() {
        if !ids.contains(edge.target.as_str()) {
            violations.push(Violation::UnknownTarget {
                edge_id: edge.id.clone(),
                edge_index,
                target: edge.target.clone(),
            });
        }
    }

    violations
}
