use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ID_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:person|junction)_(\d+)$").unwrap());

pub const PERSON_PREFIX: &str = "person";
pub const JUNCTION_PREFIX: &str = "junction";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Childless couple, person to person.
    Spouse,
    /// Parent person to the couple's union node.
    ParentToJunction,
    /// Child person to a parent person or a union node.
    ChildToParent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

impl Edge {
    pub fn new(source: &str, target: &str, kind: EdgeKind) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            kind,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }

    /// The endpoint opposite to `id`, if `id` is one of the endpoints.
    pub fn other(&self, id: &str) -> Option<&str> {
        if self.source == id {
            Some(self.target.as_str())
        } else if self.target == id {
            Some(self.source.as_str())
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Person {
    pub name: String,
    pub birth_date: String,
    pub death_date: String,
    /// Opaque image payload; never interpreted.
    pub photo: Option<Vec<u8>>,
}

impl Person {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Display form of the life dates: `1901-1970`, `1901-`, `-1970` or empty.
    pub fn lifespan(&self) -> String {
        let birth = self.birth_date.trim();
        let death = self.death_date.trim();
        match (birth.is_empty(), death.is_empty()) {
            (true, true) => String::new(),
            (false, true) => format!("{birth}-"),
            (true, false) => format!("-{death}"),
            (false, false) => format!("{birth}-{death}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Person(Person),
    /// Synthetic anchor for a couple's shared descent.
    Union,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    pub level: u32,
    pub x: f64,
    pub y: f64,
    /// Set once the coordinates were fixed by hand or by placement; layout never moves it.
    pub pinned: bool,
}

impl Node {
    pub fn person(id: impl Into<String>, person: Person) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Person(person),
            level: 0,
            x: 0.0,
            y: 0.0,
            pinned: false,
        }
    }

    pub fn union(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: NodeKind::Union,
            level: 0,
            x: 0.0,
            y: 0.0,
            pinned: false,
        }
    }

    pub fn is_person(&self) -> bool {
        matches!(self.kind, NodeKind::Person(_))
    }

    pub fn is_union(&self) -> bool {
        matches!(self.kind, NodeKind::Union)
    }

    pub fn as_person(&self) -> Option<&Person> {
        match &self.kind {
            NodeKind::Person(person) => Some(person),
            NodeKind::Union => None,
        }
    }

    pub fn as_person_mut(&mut self) -> Option<&mut Person> {
        match &mut self.kind {
            NodeKind::Person(person) => Some(person),
            NodeKind::Union => None,
        }
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// The whole family tree: nodes in insertion order plus the ordered edge list.
///
/// Node order and edge order are both observable: couple grouping walks
/// nodes in order and every "first matching edge" rule walks edges in order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: IndexMap<String, Node>,
    pub edges: Vec<Edge>,
    next_id: u64,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn person(&self, id: &str) -> Option<&Person> {
        self.nodes.get(id).and_then(Node::as_person)
    }

    pub fn persons(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_person())
    }

    pub fn unions(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values().filter(|node| node.is_union())
    }

    /// Hands out the next `<prefix>_<n>` id. Ids are never reused, even after deletion,
    /// unless an imported suffix has pushed the counter to `u64::MAX`; from then on
    /// the lowest free suffix is handed out instead.
    pub fn allocate_id(&mut self, prefix: &str) -> String {
        loop {
            let Some(following) = self.next_id.checked_add(1) else {
                tracing::warn!(prefix, "id counter exhausted; reusing the lowest free suffix");
                return self.lowest_free_id(prefix);
            };
            let id = format!("{prefix}_{}", self.next_id);
            self.next_id = following;
            if !self.nodes.contains_key(&id) {
                return id;
            }
        }
    }

    fn lowest_free_id(&self, prefix: &str) -> String {
        let mut n: u64 = 0;
        loop {
            let id = format!("{prefix}_{n}");
            if !self.nodes.contains_key(&id) {
                return id;
            }
            n += 1;
        }
    }

    /// Inserts a node, keeping the id counter ahead of any numeric id suffix.
    /// Returns `false` and leaves the graph untouched if the id is taken.
    pub fn insert_node(&mut self, node: Node) -> bool {
        if self.nodes.contains_key(&node.id) {
            return false;
        }
        if let Some(caps) = ID_SUFFIX_RE.captures(&node.id) {
            if let Ok(n) = caps[1].parse::<u64>() {
                self.next_id = self.next_id.max(n.saturating_add(1));
            }
        }
        self.nodes.insert(node.id.clone(), node);
        true
    }

    pub fn add_edge(&mut self, source: &str, target: &str, kind: EdgeKind) {
        self.edges.push(Edge::new(source, target, kind));
    }

    /// Drops the node and every edge touching it. Nothing is reconnected.
    pub fn remove_node(&mut self, id: &str) -> Option<Node> {
        let node = self.nodes.shift_remove(id)?;
        self.edges.retain(|edge| !edge.touches(id));
        Some(node)
    }

    pub fn edges_touching<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |edge| edge.touches(id))
    }

    /// Index of the first `spouse` edge touching `id`.
    pub fn spouse_edge_of(&self, id: &str) -> Option<usize> {
        self.edges
            .iter()
            .position(|edge| edge.kind == EdgeKind::Spouse && edge.touches(id))
    }

    /// Target of the first outgoing `parent_to_junction` edge of `id`.
    pub fn junction_of(&self, id: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|edge| edge.kind == EdgeKind::ParentToJunction && edge.source == id)
            .map(|edge| edge.target.as_str())
    }

    pub fn is_parent_of_junction(&self, parent: &str, junction: &str) -> bool {
        self.edges.iter().any(|edge| {
            edge.kind == EdgeKind::ParentToJunction
                && edge.source == parent
                && edge.target == junction
        })
    }

    /// Parents linked to a union node, in edge order.
    pub fn junction_parents(&self, junction: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::ParentToJunction && edge.target == junction)
            .map(|edge| edge.source.as_str())
            .collect()
    }

    /// The union node both `a` and `b` are parents of, if any.
    pub fn junction_between(&self, a: &str, b: &str) -> Option<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::ParentToJunction && edge.source == a)
            .map(|edge| edge.target.as_str())
            .find(|junction| self.is_parent_of_junction(b, junction))
    }

    /// Target of the first outgoing `child_to_parent` edge of `child`.
    pub fn parent_target_of(&self, child: &str) -> Option<&str> {
        self.edges
            .iter()
            .find(|edge| edge.kind == EdgeKind::ChildToParent && edge.source == child)
            .map(|edge| edge.target.as_str())
    }

    /// Indices of the `child_to_parent` edges pointing directly at `id`.
    pub fn child_edges_to(&self, id: &str) -> Vec<usize> {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, edge)| edge.kind == EdgeKind::ChildToParent && edge.target == id)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Ids that are the source of at least one `child_to_parent` edge.
    pub fn ids_with_parent(&self) -> HashSet<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::ChildToParent)
            .map(|edge| edge.source.as_str())
            .collect()
    }

    /// Children of `parent` in edge order, whether linked directly or through
    /// a union node `parent` belongs to. May contain ids of missing nodes.
    pub fn children_of(&self, parent: &str) -> Vec<&str> {
        self.edges
            .iter()
            .filter(|edge| edge.kind == EdgeKind::ChildToParent)
            .filter(|edge| {
                edge.target == parent
                    || (self
                        .nodes
                        .get(&edge.target)
                        .is_some_and(Node::is_union)
                        && self.is_parent_of_junction(parent, &edge.target))
            })
            .map(|edge| edge.source.as_str())
            .collect()
    }
}
