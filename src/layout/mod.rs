mod couples;
mod levels;
mod placement;
mod types;

pub use couples::find_couples;
pub use levels::assign_levels;
pub use placement::{place_new_node, rebalance_children};
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::Graph;
use std::collections::{BTreeMap, HashSet};

/// Recomputes levels and lays every generation out on its own row.
///
/// Rows are filled left to right in couple-grouping order. Pinned nodes keep
/// their coordinates, but the cursor still advances past their slot. A union
/// between a laid-out couple is moved to the midpoint of its two parents.
pub fn compute_layout(graph: &mut Graph, config: &LayoutConfig) -> LevelReport {
    let report = assign_levels(graph, config);

    let mut rows: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for node in graph.persons() {
        rows.entry(node.level).or_default().push(node.id.clone());
    }

    let spacing = config.column_spacing;
    for (level, row) in &rows {
        let y = f64::from(*level) * config.row_spacing;
        let groups = find_couples(row, graph);
        let mut cursor = 0.0;
        let mut positioned: HashSet<&str> = HashSet::new();

        for group in &groups {
            match group {
                CoupleGroup::Couple(first, second) => {
                    set_position(graph, first, cursor, y);
                    set_position(graph, second, cursor + spacing, y);
                    let junction = graph.junction_between(first, second).map(str::to_string);
                    if let Some(junction) = junction {
                        center_junction(graph, &junction, first, second);
                    }
                    cursor += spacing * config.couple_advance;
                }
                CoupleGroup::Single(id) => {
                    set_position(graph, id, cursor, y);
                    cursor += spacing * config.single_advance;
                }
            }
            positioned.extend(group.members());
        }

        for id in row {
            if positioned.insert(id.as_str()) {
                set_position(graph, id, cursor, y);
                cursor += spacing;
            }
        }
    }

    tracing::debug!(
        rows = rows.len(),
        passes = report.passes,
        converged = report.converged,
        "layout computed"
    );
    report
}

/// The explicit "reset layout" action: forgets every manual position, then lays out.
pub fn reset_layout(graph: &mut Graph, config: &LayoutConfig) -> LevelReport {
    for node in graph.nodes.values_mut() {
        node.pinned = false;
    }
    compute_layout(graph, config)
}

fn set_position(graph: &mut Graph, id: &str, x: f64, y: f64) {
    if let Some(node) = graph.node_mut(id) {
        if !node.pinned {
            node.x = x;
            node.y = y;
        }
    }
}

fn center_junction(graph: &mut Graph, junction: &str, first: &str, second: &str) {
    let (Some(a), Some(b)) = (graph.node(first), graph.node(second)) else {
        return;
    };
    let x = (a.x + b.x) / 2.0;
    let y = (a.y + b.y) / 2.0;
    set_position(graph, junction, x, y);
}
