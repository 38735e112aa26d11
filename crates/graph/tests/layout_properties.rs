use causal_graph::{
    validate, CausalEdge, CausalNode, Direction, Graph, GraphBuilder, GraphSnapshot,
    LayoutConfig, LayoutEngine, NodeType,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::json;

fn chain_payload() -> serde_json::Value {
    json!({
        "nodes": [{"id": "a"}, {"id": "b"}, {"id": "c"}],
        "edges": [{"source": "a", "target": "b"}, {"source": "b", "target": "c"}]
    })
}

/// Rank-axis coordinate, signed so that "later rank" is always larger.
fn rank_axis(direction: Direction, x: f64, y: f64) -> f64 {
    match direction {
        Direction::LeftToRight => x,
        Direction::TopToBottom => y,
        Direction::RightToLeft => -x,
        Direction::BottomToTop => -y,
    }
}

#[test]
fn chain_left_to_right() {
    let graph = GraphBuilder::new().from_value(&chain_payload()).unwrap();
    assert!(validate(&graph).is_empty());

    let layout = LayoutEngine::default().layout(&graph);
    let ranks: Vec<_> = layout.nodes.iter().map(|n| (n.node.id.as_str(), n.rank)).collect();
    assert_eq!(ranks, vec![("a", 0), ("b", 1), ("c", 2)]);

    let [a, b, c] = layout.nodes.as_slice() else {
        panic!("expected three nodes");
    };
    assert!(a.x < b.x && b.x < c.x);
    assert_eq!(a.y, b.y);
    assert_eq!(b.y, c.y);
}

#[test]
fn chain_in_every_direction() {
    let graph = GraphBuilder::new().from_value(&chain_payload()).unwrap();
    let engine = LayoutEngine::default();

    for direction in [
        Direction::LeftToRight,
        Direction::TopToBottom,
        Direction::RightToLeft,
        Direction::BottomToTop,
    ] {
        let layout = engine.relayout(&graph, direction);
        let axis: Vec<f64> = layout
            .nodes
            .iter()
            .map(|n| rank_axis(direction, n.x, n.y))
            .collect();
        assert!(axis[0] < axis[1] && axis[1] < axis[2], "{direction}: {axis:?}");
        assert!(layout.nodes.iter().all(|n| n.x >= 20.0 && n.y >= 20.0));
    }
}

#[test]
fn input_graph_is_untouched() {
    let graph = GraphBuilder::new().from_value(&chain_payload()).unwrap();
    let before = graph.clone();
    let _ = LayoutEngine::default().layout(&graph);
    assert_eq!(graph, before);
}

#[test]
fn feedback_loop_keeps_both_edges() {
    let payload = json!({
        "nodes": [
            {"id": "h", "type": "hypothesis"},
            {"id": "e", "type": "evidence"},
            {"id": "o", "type": "effect"}
        ],
        "edges": [
            {"source": "h", "target": "e", "strength": 0.8},
            {"source": "e", "target": "h", "strength": 0.4},
            {"source": "e", "target": "o"}
        ]
    });
    let snapshot = GraphSnapshot::from_payload(&payload, &LayoutEngine::default()).unwrap();
    assert_eq!(snapshot.edges.len(), 3);
    assert_eq!(snapshot.stats.reversed_edges, 1);
    let ranks: Vec<_> = snapshot.positioned_nodes.iter().map(|n| n.rank).collect();
    assert_eq!(ranks, vec![0, 1, 2]);
}

#[test]
fn no_two_boxes_overlap_in_a_fan_out() {
    let payload = json!({
        "nodes": [{"id": "root"}, {"id": "x"}, {"id": "y"}, {"id": "z"}, {"id": "w"}],
        "edges": [
            {"source": "root", "target": "x"},
            {"source": "root", "target": "y"},
            {"source": "root", "target": "z"},
            {"source": "x", "target": "w"},
            {"source": "z", "target": "w"}
        ]
    });
    let graph = GraphBuilder::new().from_value(&payload).unwrap();
    let config = LayoutConfig::vertical();
    let layout = LayoutEngine::new(config.clone()).unwrap().layout(&graph);
    for (i, p) in layout.nodes.iter().enumerate() {
        for q in &layout.nodes[i + 1..] {
            let apart_x = (p.x - q.x).abs() >= config.node_width;
            let apart_y = (p.y - q.y).abs() >= config.node_height;
            assert!(apart_x || apart_y, "{} overlaps {}", p.node.id, q.node.id);
        }
    }
}

fn arbitrary_graph() -> impl Strategy<Value = Graph> {
    (1usize..12).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..(n * 3)).prop_map(move |pairs| {
            let nodes = (0..n)
                .map(|i| CausalNode::new(format!("n{i}"), format!("N{i}"), NodeType::Intermediate))
                .collect();
            let edges = pairs
                .into_iter()
                .map(|(s, t)| CausalEdge::new(format!("n{s}"), format!("n{t}")))
                .collect();
            Graph::new(nodes, edges)
        })
    })
}

fn arbitrary_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::LeftToRight),
        Just(Direction::TopToBottom),
        Just(Direction::RightToLeft),
        Just(Direction::BottomToTop),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn layout_is_deterministic(graph in arbitrary_graph(), direction in arbitrary_direction()) {
        let engine = LayoutEngine::new(LayoutConfig::default().with_direction(direction)).unwrap();
        let first = serde_json::to_string(&engine.layout(&graph)).unwrap();
        let second = serde_json::to_string(&engine.layout(&graph)).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn acyclic_edges_advance_along_rank_axis(
        graph in arbitrary_graph(),
        direction in arbitrary_direction()
    ) {
        let layout = LayoutEngine::default().relayout(&graph, direction);
        let index = graph.id_index();

        for (pos, edge) in graph.edges.iter().enumerate() {
            let (Some(&s), Some(&t)) = (index.get(edge.source.as_str()), index.get(edge.target.as_str())) else {
                continue;
            };
            if s == t {
                continue;
            }
            let (from, to) = if layout.reversed_edges.contains(&pos) { (t, s) } else { (s, t) };
            let (from, to) = (&layout.nodes[from], &layout.nodes[to]);
            prop_assert!(to.rank > from.rank);
            prop_assert!(rank_axis(direction, to.x, to.y) > rank_axis(direction, from.x, from.y));
        }
    }

    #[test]
    fn builder_preserves_counts(n in 0usize..20, m in 0usize..30) {
        let payload = json!({
            "nodes": (0..n).map(|i| json!({"id": format!("n{i}")})).collect::<Vec<_>>(),
            "edges": (0..m).map(|i| json!({"source": format!("n{}", i % 3), "target": "n0"})).collect::<Vec<_>>(),
        });
        let graph = GraphBuilder::new().from_value(&payload).unwrap();
        prop_assert_eq!(graph.node_count(), n);
        prop_assert_eq!(graph.edge_count(), m);
    }
}
