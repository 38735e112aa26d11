//! Ordering within ranks: iterated barycenter sweeps.

use super::rank::RankGraph;

/// Nodes per rank, initially in node-array order.
pub(crate) fn build_rank_buckets(ranks: &[usize]) -> Vec<Vec<usize>> {
    let rank_count = ranks.iter().max().map_or(0, |max| max + 1);
    let mut buckets = vec![Vec::new(); rank_count];
    for (node, &rank) in ranks.iter().enumerate() {
        buckets[rank].push(node);
    }
    buckets
}

/// Reorder `rank_order` in place. Returns `(sweeps_used, residual_crossings)`.
///
/// Each sweep is a downward pass against predecessors followed by an upward
/// pass against successors. The best ordering seen is kept; the loop stops at
/// the first sweep that does not improve on it.
pub(crate) fn minimize_crossings(
    rank_order: &mut Vec<Vec<usize>>,
    graph: &RankGraph,
    ranks: &[usize],
    max_sweeps: usize,
) -> (usize, usize) {
    let mut best_crossings = total_crossings(rank_order, graph, ranks);
    if rank_order.len() <= 1 || best_crossings == 0 {
        return (0, best_crossings);
    }

    let mut best_order = rank_order.clone();
    let mut sweeps = 0;

    while sweeps < max_sweeps {
        sweeps += 1;

        for r in 1..rank_order.len() {
            reorder_rank(rank_order, r, r - 1, &graph.pred, graph.n);
        }
        for r in (0..rank_order.len() - 1).rev() {
            reorder_rank(rank_order, r, r + 1, &graph.succ, graph.n);
        }

        let crossings = total_crossings(rank_order, graph, ranks);
        if crossings < best_crossings {
            best_crossings = crossings;
            best_order.clone_from(rank_order);
            if crossings == 0 {
                break;
            }
        } else {
            break;
        }
    }

    *rank_order = best_order;
    (sweeps, best_crossings)
}

/// Sort rank `r` by the mean position of each node's neighbours in rank
/// `fixed`. A node with no such neighbour keeps its current position as its
/// score. Ties go to the lower node index.
fn reorder_rank(
    rank_order: &mut [Vec<usize>],
    r: usize,
    fixed: usize,
    neighbours: &[Vec<usize>],
    n: usize,
) {
    let mut fixed_pos: Vec<Option<usize>> = vec![None; n];
    for (pos, &v) in rank_order[fixed].iter().enumerate() {
        fixed_pos[v] = Some(pos);
    }

    let mut scored: Vec<(usize, f64)> = rank_order[r]
        .iter()
        .enumerate()
        .map(|(current, &v)| {
            let positions: Vec<usize> = neighbours[v]
                .iter()
                .filter_map(|&u| fixed_pos[u])
                .collect();
            let score = if positions.is_empty() {
                current as f64
            } else {
                positions.iter().sum::<usize>() as f64 / positions.len() as f64
            };
            (v, score)
        })
        .collect();

    scored.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    rank_order[r] = scored.into_iter().map(|(v, _)| v).collect();
}

/// Crossings among edges that join adjacent ranks.
pub(crate) fn total_crossings(
    rank_order: &[Vec<usize>],
    graph: &RankGraph,
    ranks: &[usize],
) -> usize {
    let mut pos = vec![0usize; graph.n];
    for bucket in rank_order {
        for (i, &v) in bucket.iter().enumerate() {
            pos[v] = i;
        }
    }

    let mut total = 0;
    for (r, bucket) in rank_order.iter().enumerate() {
        let segments: Vec<(usize, usize)> = bucket
            .iter()
            .flat_map(|&u| {
                graph.succ[u]
                    .iter()
                    .filter(|&&v| ranks[v] == r + 1)
                    .map(move |&v| (u, v))
            })
            .map(|(u, v)| (pos[u], pos[v]))
            .collect();

        for i in 0..segments.len() {
            for j in (i + 1)..segments.len() {
                let (a1, b1) = segments[i];
                let (a2, b2) = segments[j];
                if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                    total += 1;
                }
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CausalEdge, CausalNode, Graph, NodeType};
    use pretty_assertions::assert_eq;

    fn rank_graph(ids: &[&str], edges: &[(&str, &str)]) -> RankGraph {
        RankGraph::from_graph(&Graph::new(
            ids.iter()
                .map(|id| CausalNode::new(*id, *id, NodeType::Intermediate))
                .collect(),
            edges.iter().map(|(s, t)| CausalEdge::new(*s, *t)).collect(),
        ))
    }

    #[test]
    fn buckets_follow_array_order() {
        assert_eq!(
            build_rank_buckets(&[1, 0, 1, 2, 0]),
            vec![vec![1, 4], vec![0, 2], vec![3]]
        );
        assert!(build_rank_buckets(&[]).is_empty());
    }

    #[test]
    fn crossing_is_removed() {
        // a -> d, b -> c with c listed before d: one crossing initially.
        let graph = rank_graph(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]);
        let ranks = graph.assign_ranks();
        let mut order = build_rank_buckets(&ranks);
        assert_eq!(total_crossings(&order, &graph, &ranks), 1);

        let (sweeps, crossings) = minimize_crossings(&mut order, &graph, &ranks, 24);
        assert_eq!(crossings, 0);
        assert_eq!(sweeps, 1);
        assert_eq!(order, vec![vec![0, 1], vec![3, 2]]);
    }

    #[test]
    fn no_sweeps_when_already_planar() {
        let graph = rank_graph(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
        let ranks = graph.assign_ranks();
        let mut order = build_rank_buckets(&ranks);
        assert_eq!(minimize_crossings(&mut order, &graph, &ranks, 24), (0, 0));
        assert_eq!(order, vec![vec![0], vec![1, 2]]);
    }

    #[test]
    fn zero_budget_keeps_initial_order() {
        let graph = rank_graph(&["a", "b", "c", "d"], &[("a", "d"), ("b", "c")]);
        let ranks = graph.assign_ranks();
        let mut order = build_rank_buckets(&ranks);
        assert_eq!(minimize_crossings(&mut order, &graph, &ranks, 0), (0, 1));
        assert_eq!(order, vec![vec![0, 1], vec![2, 3]]);
    }
}
