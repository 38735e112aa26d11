//! Layered (Sugiyama-style) layout.
//!
//! 1. Cycle breaking: back edges found by DFS are reversed for ranking only.
//! 2. Rank assignment: longest path in the acyclic reduction.
//! 3. Ordering: barycenter sweeps, ties by node-array order.
//! 4. Coordinates: rank and order steps mapped onto the requested direction.
//!
//! The engine never mutates its input and never reads earlier positions, so a
//! fixed graph and configuration always produce identical output.

mod config;
mod coords;
mod order;
mod rank;

pub use config::{Direction, LayoutConfig};

use crate::error::{GraphError, Result};
use crate::model::{CausalEdge, CausalNode, Graph};
use rank::RankGraph;
use serde::{Deserialize, Serialize};

/// A node with its box anchored at the top-left corner `(x, y)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: CausalNode,
    pub x: f64,
    pub y: f64,
    pub rank: usize,
    /// Position within the rank after crossing reduction
    pub order: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub ranks: usize,
    pub widest_rank: usize,
    /// Edges whose direction was ignored to break cycles
    pub reversed_edges: usize,
    /// Crossings left between adjacent ranks
    pub crossings: usize,
    pub sweeps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout {
    pub direction: Direction,
    /// Same order as the input nodes
    pub nodes: Vec<PositionedNode>,
    /// Passed through unchanged
    pub edges: Vec<CausalEdge>,
    /// Positions in `edges` that were reversed for ranking
    pub reversed_edges: Vec<usize>,
    pub stats: LayoutStats,
    pub bounds: Bounds,
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&PositionedNode> {
        self.nodes.iter().find(|positioned| positioned.node.id == id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate().map_err(GraphError::InvalidConfig)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self, graph: &Graph) -> Layout {
        compute(graph, &self.config)
    }

    /// Lay `graph` out again in `direction`, keeping every other setting.
    pub fn relayout(&self, graph: &Graph, direction: Direction) -> Layout {
        let config = self.config.clone().with_direction(direction);
        compute(graph, &config)
    }
}

fn compute(graph: &Graph, config: &LayoutConfig) -> Layout {
    let rank_graph = RankGraph::from_graph(graph);
    let ranks = rank_graph.assign_ranks();

    let mut rank_order = order::build_rank_buckets(&ranks);
    let (sweeps, crossings) =
        order::minimize_crossings(&mut rank_order, &rank_graph, &ranks, config.max_sweeps);

    let mut order_of = vec![0usize; graph.nodes.len()];
    for bucket in &rank_order {
        for (pos, &node) in bucket.iter().enumerate() {
            order_of[node] = pos;
        }
    }

    let coords = coords::assign_coordinates(&rank_order, graph.nodes.len(), config);
    let nodes: Vec<PositionedNode> = graph
        .nodes
        .iter()
        .enumerate()
        .map(|(i, node)| PositionedNode {
            node: node.clone(),
            x: coords[i].0,
            y: coords[i].1,
            rank: ranks[i],
            order: order_of[i],
        })
        .collect();

    let stats = LayoutStats {
        ranks: rank_order.len(),
        widest_rank: rank_order.iter().map(Vec::len).max().unwrap_or(0),
        reversed_edges: rank_graph.reversed.len(),
        crossings,
        sweeps,
    };
    log::debug!(
        "Layout {}: {} ranks, widest {}, {} reversed, {} crossings after {} sweeps",
        config.direction,
        stats.ranks,
        stats.widest_rank,
        stats.reversed_edges,
        stats.crossings,
        stats.sweeps
    );

    let bounds = bounds(&nodes, config);
    Layout {
        direction: config.direction,
        nodes,
        edges: graph.edges.clone(),
        reversed_edges: rank_graph.reversed,
        stats,
        bounds,
    }
}

/// Extent of the positioned boxes; all zero when there are none.
pub fn bounds(nodes: &[PositionedNode], config: &LayoutConfig) -> Bounds {
    let mut iter = nodes.iter();
    let Some(first) = iter.next() else {
        return Bounds::default();
    };

    let mut bounds = Bounds {
        min_x: first.x,
        min_y: first.y,
        max_x: first.x + config.node_width,
        max_y: first.y + config.node_height,
    };
    for positioned in iter {
        bounds.min_x = bounds.min_x.min(positioned.x);
        bounds.min_y = bounds.min_y.min(positioned.y);
        bounds.max_x = bounds.max_x.max(positioned.x + config.node_width);
        bounds.max_y = bounds.max_y.max(positioned.y + config.node_height);
    }
    bounds
}
