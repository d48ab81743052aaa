//! Structural edits: creating relatives, editing details, moving and deleting nodes.
//!
//! Every operation referencing a node that does not exist is a no-op and
//! reports it through its return value (`None` / `false`).

use crate::config::PlacementConfig;
use crate::ir::{EdgeKind, Graph, JUNCTION_PREFIX, Node, PERSON_PREFIX, Person};
use crate::layout::{Anchor, place_new_node, rebalance_children};

/// Creates a parentless person at the root spot.
pub fn add_root(graph: &mut Graph, person: Person, config: &PlacementConfig) -> String {
    let id = insert_person(graph, person, 0);
    place_new_node(graph, &id, Anchor::Root, config);
    tracing::debug!(node_id = %id, "root added");
    id
}

/// Adds a child below `parent_id` and re-centres the parent's children.
///
/// The child hangs off the parent's union if one exists. A childless couple
/// joined by a `spouse` edge is promoted to a union first; otherwise the child
/// links to the parent directly.
pub fn add_child(
    graph: &mut Graph,
    parent_id: &str,
    person: Person,
    config: &PlacementConfig,
) -> Option<String> {
    let Some(parent_level) = graph.node(parent_id).map(|node| node.level) else {
        tracing::debug!(node_id = %parent_id, "add child skipped: parent not found");
        return None;
    };
    let child_id = insert_person(graph, person, parent_level + 1);

    if let Some(junction) = graph.junction_of(parent_id).map(str::to_string) {
        graph.add_edge(&child_id, &junction, EdgeKind::ChildToParent);
    } else if let Some(idx) = graph.spouse_edge_of(parent_id) {
        let edge = graph.edges.remove(idx);
        let spouse_id = edge.other(parent_id).unwrap_or(edge.target.as_str()).to_string();
        let junction = insert_junction(graph, parent_id, config);
        graph.add_edge(parent_id, &junction, EdgeKind::ParentToJunction);
        graph.add_edge(&spouse_id, &junction, EdgeKind::ParentToJunction);
        graph.add_edge(&child_id, &junction, EdgeKind::ChildToParent);
        tracing::debug!(
            parent = %parent_id,
            spouse = %spouse_id,
            junction = %junction,
            "spouse edge promoted to union"
        );
    } else {
        graph.add_edge(&child_id, parent_id, EdgeKind::ChildToParent);
    }

    place_new_node(graph, &child_id, Anchor::Parent(parent_id), config);
    rebalance_children(graph, parent_id, config);
    tracing::debug!(node_id = %child_id, parent = %parent_id, "child added");
    Some(child_id)
}

/// Adds a person on the same row as `sibling_id`, sharing its first recorded parent.
pub fn add_sibling(
    graph: &mut Graph,
    sibling_id: &str,
    person: Person,
    config: &PlacementConfig,
) -> Option<String> {
    let Some(level) = graph.node(sibling_id).map(|node| node.level) else {
        tracing::debug!(node_id = %sibling_id, "add sibling skipped: sibling not found");
        return None;
    };
    let id = insert_person(graph, person, level);
    if let Some(target) = graph.parent_target_of(sibling_id).map(str::to_string) {
        graph.add_edge(&id, &target, EdgeKind::ChildToParent);
    }
    place_new_node(graph, &id, Anchor::Sibling(sibling_id), config);
    tracing::debug!(node_id = %id, sibling = %sibling_id, "sibling added");
    Some(id)
}

/// Adds a partner for `person_id`.
///
/// When children already point directly at the person, a union is created
/// for the new couple and those child edges are moved onto it. Otherwise the
/// couple is recorded with a plain `spouse` edge.
pub fn add_spouse(
    graph: &mut Graph,
    person_id: &str,
    person: Person,
    config: &PlacementConfig,
) -> Option<String> {
    let Some(level) = graph.node(person_id).map(|node| node.level) else {
        tracing::debug!(node_id = %person_id, "add spouse skipped: person not found");
        return None;
    };
    let spouse_id = insert_person(graph, person, level);

    let child_edges = graph.child_edges_to(person_id);
    if child_edges.is_empty() {
        graph.add_edge(person_id, &spouse_id, EdgeKind::Spouse);
    } else {
        let junction = insert_junction(graph, person_id, config);
        graph.add_edge(person_id, &junction, EdgeKind::ParentToJunction);
        graph.add_edge(&spouse_id, &junction, EdgeKind::ParentToJunction);
        for idx in &child_edges {
            graph.edges[*idx].target = junction.clone();
        }
        tracing::debug!(
            junction = %junction,
            children = child_edges.len(),
            "children moved onto new union"
        );
    }

    place_new_node(graph, &spouse_id, Anchor::Spouse(person_id), config);
    tracing::debug!(node_id = %spouse_id, partner = %person_id, "spouse added");
    Some(spouse_id)
}

/// Adds an unrelated person on the same generation row, pinned next to `reference_id`.
pub fn add_peer(
    graph: &mut Graph,
    reference_id: &str,
    person: Person,
    config: &PlacementConfig,
) -> Option<String> {
    let Some((level, x, y)) = graph.node(reference_id).map(|node| (node.level, node.x, node.y))
    else {
        tracing::debug!(node_id = %reference_id, "add peer skipped: reference not found");
        return None;
    };
    let id = graph.allocate_id(PERSON_PREFIX);
    let mut node = Node::person(id.clone(), person);
    node.level = level;
    node.x = x + config.peer_offset_x;
    node.y = y;
    node.pinned = true;
    graph.insert_node(node);
    tracing::debug!(node_id = %id, reference = %reference_id, "peer added");
    Some(id)
}

/// Replaces name and dates. The photo is only replaced when `update` carries one.
/// Never repositions.
pub fn edit_person(graph: &mut Graph, id: &str, update: Person) -> bool {
    let Some(person) = graph.node_mut(id).and_then(Node::as_person_mut) else {
        tracing::debug!(node_id = %id, "edit skipped: person not found");
        return false;
    };
    person.name = update.name;
    person.birth_date = update.birth_date;
    person.death_date = update.death_date;
    if update.photo.is_some() {
        person.photo = update.photo;
    }
    true
}

/// Manual fine adjustment: sets the coordinates and pins the node.
///
/// NaN and infinite coordinates cannot be stored in a tree document, so they
/// are refused and leave the node untouched.
pub fn move_node(graph: &mut Graph, id: &str, x: f64, y: f64) -> bool {
    if !x.is_finite() || !y.is_finite() {
        tracing::debug!(node_id = %id, x, y, "move skipped: non-finite coordinates");
        return false;
    }
    let Some(node) = graph.node_mut(id) else {
        tracing::debug!(node_id = %id, "move skipped: node not found");
        return false;
    };
    node.x = x;
    node.y = y;
    node.pinned = true;
    true
}

/// Removes the node and its edges. Former relatives keep their level and position.
pub fn delete_node(graph: &mut Graph, id: &str) -> bool {
    let edges = graph.edges_touching(id).count();
    let removed = graph.remove_node(id).is_some();
    if removed {
        tracing::debug!(node_id = %id, edges, "node deleted");
    }
    removed
}

fn insert_person(graph: &mut Graph, person: Person, level: u32) -> String {
    let id = graph.allocate_id(PERSON_PREFIX);
    let mut node = Node::person(id.clone(), person);
    node.level = level;
    graph.insert_node(node);
    id
}

/// New union on `anchor_id`'s level, provisionally offset from it until the next layout.
fn insert_junction(graph: &mut Graph, anchor_id: &str, config: &PlacementConfig) -> String {
    let (level, x, y) = graph
        .node(anchor_id)
        .map(|node| (node.level, node.x, node.y))
        .unwrap_or_default();
    let id = graph.allocate_id(JUNCTION_PREFIX);
    let mut node = Node::union(id.clone());
    node.level = level;
    node.x = x + config.junction_offset_x;
    node.y = y + config.junction_offset_y;
    graph.insert_node(node);
    id
}
