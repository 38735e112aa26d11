//! (rank, order) to layout-space coordinates.

use super::config::LayoutConfig;

/// Top-left corner of each node's box, indexed by node position.
pub(crate) fn assign_coordinates(
    rank_order: &[Vec<usize>],
    node_count: usize,
    config: &LayoutConfig,
) -> Vec<(f64, f64)> {
    let horizontal = config.direction.is_horizontal();
    let (rank_extent, order_extent) = if horizontal {
        (config.node_width, config.node_height)
    } else {
        (config.node_height, config.node_width)
    };
    let rank_step = rank_extent + config.layer_gap;
    let order_step = order_extent + config.node_gap_within_layer;

    let rank_count = rank_order.len();
    let widest = rank_order.iter().map(Vec::len).max().unwrap_or(0);

    let mut coords = vec![(0.0, 0.0); node_count];
    for (rank, bucket) in rank_order.iter().enumerate() {
        let slot = if config.direction.is_reversed() {
            rank_count - 1 - rank
        } else {
            rank
        };
        let rank_center = slot as f64 * rank_step + rank_extent / 2.0;
        // Narrower ranks are centred against the widest one.
        let offset = (widest - bucket.len()) as f64 / 2.0;

        for (order, &node) in bucket.iter().enumerate() {
            let order_center = (order as f64 + offset) * order_step + order_extent / 2.0;
            let (cx, cy) = if horizontal {
                (rank_center, order_center)
            } else {
                (order_center, rank_center)
            };
            coords[node] = (
                config.margin_x + cx - config.node_width / 2.0,
                config.margin_y + cy - config.node_height / 2.0,
            );
        }
    }
    coords
}
