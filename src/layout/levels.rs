use std::collections::HashSet;

use crate::config::LayoutConfig;
use crate::ir::{EdgeKind, Graph};

use super::LevelReport;

/// Assigns generation levels to every person, then copies them onto union nodes.
///
/// Persons without a recorded parent become roots at level 0. Each pass walks
/// persons in node order and sets every child (direct or through a union the
/// person belongs to) to `parent.level + 1`, reading the parent's level as it
/// stands at that moment. Passes repeat until nothing changes or
/// `max_level_passes` is reached; a cyclic graph simply stops at the cap with
/// partially propagated levels.
///
/// A parentless person married to someone with recorded parents is not a
/// founder: at the start of every pass it takes its partner's level, so both
/// halves of a couple and their union share one row.
pub fn assign_levels(graph: &mut Graph, config: &LayoutConfig) -> LevelReport {
    let has_parent: HashSet<String> = graph
        .ids_with_parent()
        .into_iter()
        .map(str::to_string)
        .collect();
    for node in graph.nodes.values_mut() {
        if node.is_person() && !has_parent.contains(&node.id) {
            node.level = 0;
        }
    }

    // Edges are fixed for the whole propagation, so the parent -> children
    // fan-out can be resolved once.
    let fan_out: Vec<(String, Vec<String>)> = graph
        .persons()
        .map(|parent| {
            let children = graph
                .children_of(&parent.id)
                .into_iter()
                .filter(|child| graph.contains(child))
                .map(str::to_string)
                .collect();
            (parent.id.clone(), children)
        })
        .collect();

    let followers = married_in_partners(graph, &has_parent);

    let mut report = LevelReport {
        passes: 0,
        converged: false,
    };
    while report.passes < config.max_level_passes {
        report.passes += 1;
        let mut changed = false;
        for (follower, partner) in &followers {
            let Some(level) = graph.node(partner).map(|node| node.level) else {
                continue;
            };
            if let Some(node) = graph.node_mut(follower) {
                if node.level != level {
                    node.level = level;
                    changed = true;
                }
            }
        }
        for (parent, children) in &fan_out {
            let Some(level) = graph.node(parent).map(|node| node.level) else {
                continue;
            };
            let next = level.saturating_add(1);
            for child in children {
                if let Some(node) = graph.node_mut(child) {
                    if node.level != next {
                        node.level = next;
                        changed = true;
                    }
                }
            }
        }
        if !changed {
            report.converged = true;
            break;
        }
    }

    if !report.converged {
        tracing::warn!(
            passes = report.passes,
            "level propagation did not settle; keeping partially propagated levels"
        );
    }

    let union_levels: Vec<(String, u32)> = graph
        .unions()
        .filter_map(|union| {
            let parent = graph.junction_parents(&union.id).into_iter().next()?;
            let level = graph.node(parent)?.level;
            Some((union.id.clone(), level))
        })
        .collect();
    for (id, level) in union_levels {
        if let Some(node) = graph.node_mut(&id) {
            node.level = level;
        }
    }

    report
}

/// `(follower, partner)` pairs: a parentless person and the first partner, in
/// edge order, that has a recorded parent. Partners come from `spouse` edges and
/// from the two parents of each union.
fn married_in_partners(graph: &Graph, has_parent: &HashSet<String>) -> Vec<(String, String)> {
    let mut couples: Vec<(&str, &str)> = Vec::new();
    for edge in &graph.edges {
        if edge.kind == EdgeKind::Spouse {
            couples.push((edge.source.as_str(), edge.target.as_str()));
        }
    }
    for union in graph.unions() {
        let parents = graph.junction_parents(&union.id);
        if let [first, second, ..] = parents.as_slice() {
            couples.push((*first, *second));
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut followers = Vec::new();
    for (a, b) in couples {
        let (follower, partner) = match (has_parent.contains(a), has_parent.contains(b)) {
            (false, true) => (a, b),
            (true, false) => (b, a),
            _ => continue,
        };
        let is_person = graph.node(follower).is_some_and(|node| node.is_person());
        if is_person && graph.contains(partner) && seen.insert(follower) {
            followers.push((follower.to_string(), partner.to_string()));
        }
    }
    followers
}
