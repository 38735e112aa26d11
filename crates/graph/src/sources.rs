use crate::model::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One distinct source url, attributed to the first node that cited it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub node_label: String,
    pub url: String,
    pub title: String,
    pub domain: String,
}

/// Deduplicated citation list: nodes in graph order, sources in their given
/// order, first url wins. Sources without a url are skipped.
pub fn aggregate_sources(graph: &Graph) -> Vec<Citation> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut citations = Vec::new();

    for node in &graph.nodes {
        for source in node.sources() {
            if source.url.is_empty() || !seen.insert(source.url.as_str()) {
                continue;
            }
            citations.push(Citation {
                node_label: node.label.clone(),
                url: source.url.clone(),
                title: source.title.clone(),
                domain: source.domain.clone(),
            });
        }
    }

    citations
}
