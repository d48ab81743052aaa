use crate::config::PlacementConfig;
use crate::ir::Graph;

use super::Anchor;

/// Positions a single freshly created node relative to its anchor.
///
/// Only the node itself is touched. Returns `false` without changes when the
/// node or the anchor is missing, or when the node is already pinned.
pub fn place_new_node(
    graph: &mut Graph,
    id: &str,
    anchor: Anchor<'_>,
    config: &PlacementConfig,
) -> bool {
    let Some(node) = graph.node(id) else {
        tracing::debug!(node_id = %id, "placement skipped: node not found");
        return false;
    };
    if node.pinned {
        return false;
    }

    let placed = match anchor {
        Anchor::Root => Some((0, config.root_x, config.root_y)),
        Anchor::Parent(parent_id) => graph.node(parent_id).map(|parent| {
            let level = parent.level + 1;
            let on_row = graph.persons().filter(|node| node.level == level).count() as f64;
            (
                level,
                parent.x + on_row * config.child_step_x - config.child_step_x,
                parent.y + config.child_offset_y,
            )
        }),
        Anchor::Sibling(sibling_id) => graph
            .node(sibling_id)
            .map(|sibling| (sibling.level, sibling.x + config.sibling_offset_x, sibling.y)),
        Anchor::Spouse(spouse_id) => graph
            .node(spouse_id)
            .map(|spouse| (spouse.level, spouse.x + config.spouse_offset_x, spouse.y)),
    };
    let Some((level, x, y)) = placed else {
        tracing::debug!(node_id = %id, ?anchor, "placement skipped: anchor not found");
        return false;
    };

    let Some(node) = graph.node_mut(id) else {
        return false;
    };
    node.level = level;
    node.x = x;
    node.y = y;
    true
}

/// Spreads every child of `parent_id` symmetrically underneath it.
///
/// Children are the persons one level below the parent whose first
/// `child_to_parent` edge points at the parent or at a union the parent
/// belongs to, taken in node order. Pinned children keep their coordinates but
/// still occupy their slot. Returns the number of children found.
pub fn rebalance_children(graph: &mut Graph, parent_id: &str, config: &PlacementConfig) -> usize {
    let Some(parent) = graph.node(parent_id) else {
        return 0;
    };
    let (parent_x, parent_y) = parent.position();
    let child_level = parent.level + 1;

    let children: Vec<String> = graph
        .persons()
        .filter(|node| node.level == child_level)
        .filter(|node| {
            graph.parent_target_of(&node.id).is_some_and(|target| {
                target == parent_id || graph.is_parent_of_junction(parent_id, target)
            })
        })
        .map(|node| node.id.clone())
        .collect();

    let count = children.len();
    for (idx, child_id) in children.iter().enumerate() {
        let offset = sibling_offset(idx, count) * config.rebalance_spacing;
        if let Some(child) = graph.node_mut(child_id) {
            if child.pinned {
                continue;
            }
            child.x = parent_x + offset;
            child.y = parent_y + config.rebalance_offset_y;
        }
    }
    count
}

/// Slot of child `idx` among `count`, in units of the rebalance spacing.
fn sibling_offset(idx: usize, count: usize) -> f64 {
    if count % 2 == 1 {
        idx as f64 - (count / 2) as f64
    } else {
        idx as f64 - count as f64 / 2.0 + 0.5
    }
}
