//! Layering: cycle breaking and longest-path ranks.

use crate::model::Graph;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{depth_first_search, DfsEvent};
use std::collections::{HashSet, VecDeque};

/// Acyclic reduction of a graph's edges over node positions.
#[derive(Debug, Clone)]
pub(crate) struct RankGraph {
    pub n: usize,
    /// Successors per node, deduplicated and sorted.
    pub succ: Vec<Vec<usize>>,
    pub pred: Vec<Vec<usize>>,
    /// Positions in `graph.edges` whose direction was ignored for ranking.
    pub reversed: Vec<usize>,
}

impl RankGraph {
    /// Edges with an unknown endpoint and self-loops take no part in layering.
    /// Duplicate ids resolve to their first occurrence.
    pub fn from_graph(graph: &Graph) -> Self {
        let n = graph.nodes.len();
        let index = graph.id_index();

        let resolved: Vec<(usize, usize, usize)> = graph
            .edges
            .iter()
            .enumerate()
            .filter_map(|(pos, edge)| {
                let source = *index.get(edge.source.as_str())?;
                let target = *index.get(edge.target.as_str())?;
                (source != target).then_some((pos, source, target))
            })
            .collect();

        let mut dag: DiGraph<(), ()> = DiGraph::with_capacity(n, resolved.len());
        let handles: Vec<NodeIndex> = (0..n).map(|_| dag.add_node(())).collect();
        for &(_, source, target) in &resolved {
            dag.add_edge(handles[source], handles[target], ());
        }

        let mut back_edges: HashSet<(usize, usize)> = HashSet::new();
        depth_first_search(&dag, handles.iter().copied(), |event| {
            if let DfsEvent::BackEdge(u, v) = event {
                back_edges.insert((u.index(), v.index()));
            }
        });

        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        let mut reversed = Vec::new();
        for &(pos, source, target) in &resolved {
            let (from, to) = if back_edges.contains(&(source, target)) {
                reversed.push(pos);
                (target, source)
            } else {
                (source, target)
            };
            succ[from].push(to);
            pred[to].push(from);
        }
        for list in succ.iter_mut().chain(pred.iter_mut()) {
            list.sort_unstable();
            list.dedup();
        }

        Self {
            n,
            succ,
            pred,
            reversed,
        }
    }

    /// Longest path from any node without predecessors. Such nodes get rank 0.
    pub fn assign_ranks(&self) -> Vec<usize> {
        let mut ranks = vec![0usize; self.n];
        let mut in_degree: Vec<usize> = self.pred.iter().map(Vec::len).collect();
        let mut queue: VecDeque<usize> = (0..self.n).filter(|&v| in_degree[v] == 0).collect();
        let mut visited = 0usize;

        while let Some(u) = queue.pop_front() {
            visited += 1;
            for &v in &self.succ[u] {
                ranks[v] = ranks[v].max(ranks[u] + 1);
                in_degree[v] -= 1;
                if in_degree[v] == 0 {
                    queue.push_back(v);
                }
            }
        }

        debug_assert_eq!(visited, self.n, "rank graph must be acyclic");
        ranks
    }
}
