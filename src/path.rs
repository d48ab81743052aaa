use std::collections::{HashMap, HashSet, VecDeque};

use crate::ir::Graph;

/// Edges from the root person to `target`, for highlighting.
///
/// The root is the first level-0 person in node order. Every relationship
/// edge is walked in both directions, so the result is a shortest path in hop
/// count; ties go to whichever neighbour was listed first in edge order. Each
/// hop is reported twice, as `(a, b)` and `(b, a)`. Empty when there is no
/// root, when `target` is the root, or when `target` cannot be reached.
pub fn find_path(graph: &Graph, target: &str) -> Vec<(String, String)> {
    let Some(root) = graph.persons().find(|node| node.level == 0) else {
        return Vec::new();
    };
    let root = root.id.as_str();
    if root == target {
        return Vec::new();
    }

    let mut adjacency: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in &graph.edges {
        adjacency
            .entry(edge.source.as_str())
            .or_default()
            .push(edge.target.as_str());
        adjacency
            .entry(edge.target.as_str())
            .or_default()
            .push(edge.source.as_str());
    }

    let mut previous: HashMap<&str, &str> = HashMap::new();
    let mut visited: HashSet<&str> = HashSet::from([root]);
    let mut queue: VecDeque<&str> = VecDeque::from([root]);

    while let Some(current) = queue.pop_front() {
        if current == target {
            return hops_to(current, &previous);
        }
        let Some(neighbors) = adjacency.get(current) else {
            continue;
        };
        for &neighbor in neighbors {
            if visited.insert(neighbor) {
                previous.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    Vec::new()
}

fn hops_to(target: &str, previous: &HashMap<&str, &str>) -> Vec<(String, String)> {
    let mut chain = vec![target];
    let mut cursor = target;
    while let Some(&prev) = previous.get(cursor) {
        chain.push(prev);
        cursor = prev;
    }
    chain.reverse();

    let mut edges = Vec::with_capacity(chain.len().saturating_sub(1) * 2);
    for pair in chain.windows(2) {
        edges.push((pair[0].to_string(), pair[1].to_string()));
        edges.push((pair[1].to_string(), pair[0].to_string()));
    }
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EdgeKind, Node, Person};

    fn hop(a: &str, b: &str) -> [(String, String); 2] {
        [(a.to_string(), b.to_string()), (b.to_string(), a.to_string())]
    }

    fn family() -> Graph {
        let mut graph = Graph::new();
        for (id, level) in [("root", 0), ("wife", 0), ("kid", 1), ("grandkid", 2), ("loner", 1)] {
            let mut node = Node::person(id, Person::new(id));
            node.level = level;
            graph.insert_node(node);
        }
        graph.insert_node(Node::union("u"));
        graph.add_edge("root", "u", EdgeKind::ParentToJunction);
        graph.add_edge("wife", "u", EdgeKind::ParentToJunction);
        graph.add_edge("kid", "u", EdgeKind::ChildToParent);
        graph.add_edge("grandkid", "kid", EdgeKind::ChildToParent);
        graph
    }

    #[test]
    fn walks_through_unions_in_both_directions() {
        let graph = family();
        let path = find_path(&graph, "grandkid");
        let expected: Vec<(String, String)> = [hop("root", "u"), hop("u", "kid"), hop("kid", "grandkid")]
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(path, expected);

        let to_wife = find_path(&graph, "wife");
        assert_eq!(to_wife.len(), 4);
        assert_eq!(to_wife[2], ("u".to_string(), "wife".to_string()));
    }

    #[test]
    fn root_unreachable_and_unknown_targets_give_nothing() {
        let graph = family();
        assert!(find_path(&graph, "root").is_empty());
        assert!(find_path(&graph, "loner").is_empty());
        assert!(find_path(&graph, "ghost").is_empty());
    }

    #[test]
    fn no_root_gives_nothing() {
        let mut graph = Graph::new();
        let mut node = Node::person("a", Person::new("a"));
        node.level = 1;
        graph.insert_node(node);
        graph.insert_node(Node::person("b", Person::new("b")));
        graph.node_mut("b").unwrap().level = 2;
        graph.add_edge("a", "b", EdgeKind::Spouse);
        assert!(find_path(&graph, "b").is_empty());
    }

    #[test]
    fn prefers_fewest_hops() {
        let mut graph = Graph::new();
        for id in ["r", "a", "b", "t"] {
            graph.insert_node(Node::person(id, Person::new(id)));
        }
        graph.add_edge("a", "r", EdgeKind::ChildToParent);
        graph.add_edge("b", "a", EdgeKind::ChildToParent);
        graph.add_edge("t", "b", EdgeKind::ChildToParent);
        graph.add_edge("t", "r", EdgeKind::ChildToParent);
        let path = find_path(&graph, "t");
        assert_eq!(path, hop("r", "t").to_vec());
    }
}
