use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use family_tree_rs::editor::{add_child, add_peer, add_root, add_spouse, delete_node, move_node};
use family_tree_rs::layout::{CoupleGroup, compute_layout, find_couples, reset_layout};
use family_tree_rs::{EdgeKind, Graph, LayoutConfig, Person, find_path, load_tree, parse_document, save_tree, to_json};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn load_fixture(name: &str) -> Graph {
    let path = fixture_path(name);
    assert!(path.exists(), "fixture missing: {name}");
    load_tree(&path).expect("fixture load failed")
}

fn pos(graph: &Graph, id: &str) -> (f64, f64) {
    graph.node(id).expect("node missing").position()
}

fn assert_close(actual: (f64, f64), expected: (f64, f64)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-9 && (actual.1 - expected.1).abs() < 1e-9,
        "expected {expected:?}, got {actual:?}"
    );
}

/// Hop distance over the undirected edge view, computed independently of the path finder.
fn hop_distance(graph: &Graph, from: &str, to: &str) -> Option<usize> {
    let mut dist: HashMap<&str, usize> = HashMap::from([(from, 0)]);
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        let d = dist[current];
        for edge in &graph.edges {
            let Some(next) = edge.other(current) else {
                continue;
            };
            if !dist.contains_key(next) {
                dist.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    dist.get(to).copied()
}

#[test]
fn fixture_levels_and_rows() {
    let mut graph = load_fixture("three_generations.json");
    let report = compute_layout(&mut graph, &LayoutConfig::default());
    assert!(report.converged);

    let levels: Vec<(&str, u32)> = graph
        .nodes
        .values()
        .map(|node| (node.id.as_str(), node.level))
        .collect();
    assert_eq!(
        levels,
        vec![
            ("person_0", 0),
            ("person_1", 0),
            ("junction_2", 0),
            ("person_3", 1),
            ("person_4", 1),
            ("person_5", 1),
            ("junction_6", 1),
            ("person_7", 2),
            ("person_8", 2),
            ("person_9", 1),
            ("person_10", 0),
        ]
    );

    assert_close(pos(&graph, "person_0"), (0.0, 0.0));
    assert_close(pos(&graph, "person_1"), (120.0, 0.0));
    assert_close(pos(&graph, "junction_2"), (60.0, 0.0));
    assert_close(pos(&graph, "person_3"), (0.0, 150.0));
    assert_close(pos(&graph, "person_5"), (120.0, 150.0));
    assert_close(pos(&graph, "junction_6"), (60.0, 150.0));
    assert_close(pos(&graph, "person_4"), (264.0, 150.0));
    assert_close(pos(&graph, "person_9"), (384.0, 150.0));
    assert_close(pos(&graph, "person_7"), (0.0, 300.0));
    assert_close(pos(&graph, "person_8"), (144.0, 300.0));
    // Pinned in the document.
    assert_close(pos(&graph, "person_10"), (900.0, 12.0));
}

#[test]
fn child_is_one_level_below_each_parent() {
    let mut graph = load_fixture("three_generations.json");
    compute_layout(&mut graph, &LayoutConfig::default());

    let mut checked = 0;
    for edge in graph.edges.iter().filter(|e| e.kind == EdgeKind::ChildToParent) {
        let child = graph.node(&edge.source).unwrap().level;
        let target = graph.node(&edge.target).unwrap();
        if target.is_union() {
            for parent in graph.junction_parents(&target.id) {
                assert_eq!(child, graph.node(parent).unwrap().level + 1, "{}", edge.source);
                checked += 1;
            }
        } else {
            assert_eq!(child, target.level + 1, "{}", edge.source);
            checked += 1;
        }
    }
    assert_eq!(checked, 8);
}

#[test]
fn unions_sit_between_their_parents() {
    let mut graph = load_fixture("three_generations.json");
    move_node(&mut graph, "person_5", 777.0, 222.0);
    compute_layout(&mut graph, &LayoutConfig::default());

    for union in graph.unions() {
        let parents = graph.junction_parents(&union.id);
        assert_eq!(parents.len(), 2);
        let (ax, ay) = pos(&graph, parents[0]);
        let (bx, by) = pos(&graph, parents[1]);
        assert_eq!(union.x, (ax + bx) / 2.0, "{}", union.id);
        assert_eq!(union.y, (ay + by) / 2.0, "{}", union.id);
    }
    assert_close(pos(&graph, "person_5"), (777.0, 222.0));
}

#[test]
fn layout_never_moves_pinned_nodes() {
    let mut graph = load_fixture("three_generations.json");
    let pinned = ["person_1", "person_8", "junction_6"];
    for (idx, id) in pinned.iter().enumerate() {
        move_node(&mut graph, id, -50.0 * idx as f64, 1000.0 + idx as f64);
    }
    let before: Vec<(f64, f64)> = pinned.iter().map(|id| pos(&graph, id)).collect();

    compute_layout(&mut graph, &LayoutConfig::default());
    compute_layout(&mut graph, &LayoutConfig::default());

    let after: Vec<(f64, f64)> = pinned.iter().map(|id| pos(&graph, id)).collect();
    assert_eq!(before, after);
    assert_close(pos(&graph, "person_10"), (900.0, 12.0));
}

#[test]
fn reset_layout_releases_pins() {
    let mut graph = load_fixture("three_generations.json");
    move_node(&mut graph, "person_1", -400.0, -400.0);
    reset_layout(&mut graph, &LayoutConfig::default());
    assert!(graph.nodes.values().all(|node| !node.pinned));
    assert_close(pos(&graph, "person_1"), (120.0, 0.0));
    assert_close(pos(&graph, "person_10"), (264.0, 0.0));
}

#[test]
fn couples_are_exclusive_on_every_row() {
    let mut graph = load_fixture("three_generations.json");
    compute_layout(&mut graph, &LayoutConfig::default());

    let mut rows: HashMap<u32, Vec<String>> = HashMap::new();
    for node in graph.persons() {
        rows.entry(node.level).or_default().push(node.id.clone());
    }
    for (level, row) in rows {
        let groups = find_couples(&row, &graph);
        let mut seen = HashSet::new();
        for group in &groups {
            for member in group.members() {
                assert!(seen.insert(member.to_string()), "{member} grouped twice on row {level}");
            }
        }
        assert_eq!(seen.len(), row.len());
        if level == 1 {
            assert_eq!(
                groups,
                vec![
                    CoupleGroup::Couple("person_3".into(), "person_5".into()),
                    CoupleGroup::Couple("person_4".into(), "person_9".into()),
                ]
            );
        }
    }
}

#[test]
fn path_lengths_match_hop_distance() {
    let mut graph = load_fixture("three_generations.json");
    compute_layout(&mut graph, &LayoutConfig::default());
    let edge_set: HashSet<(String, String)> = graph
        .edges
        .iter()
        .flat_map(|e| {
            [
                (e.source.clone(), e.target.clone()),
                (e.target.clone(), e.source.clone()),
            ]
        })
        .collect();

    for id in graph.nodes.keys() {
        let path = find_path(&graph, id);
        match hop_distance(&graph, "person_0", id) {
            Some(0) | None => assert!(path.is_empty(), "{id}"),
            Some(d) => {
                assert_eq!(path.len(), 2 * d, "{id}");
                assert_eq!(path[0].0, "person_0");
                assert_eq!(path[path.len() - 2].1, *id);
                assert!(path.iter().all(|hop| edge_set.contains(hop)));
            }
        }
    }

    let to_hannah: Vec<(String, String)> = find_path(&graph, "person_8")
        .into_iter()
        .step_by(2)
        .collect();
    let expected: Vec<(String, String)> = [
        ("person_0", "junction_2"),
        ("junction_2", "person_3"),
        ("person_3", "junction_6"),
        ("junction_6", "person_8"),
    ]
    .iter()
    .map(|(a, b)| (a.to_string(), b.to_string()))
    .collect();
    assert_eq!(to_hannah, expected);
    assert!(find_path(&graph, "person_10").is_empty());
}

#[test]
fn cyclic_input_stops_at_pass_cap() {
    let mut graph = load_fixture("cyclic.json");
    let report = compute_layout(&mut graph, &LayoutConfig::default());
    assert!(!report.converged);
    assert_eq!(report.passes, 20);
    assert_eq!(graph.node("person_2").unwrap().level, 0);
    assert!(find_path(&graph, "person_0").is_empty());
}

#[test]
fn edited_tree_survives_save_and_load() {
    let config = LayoutConfig::default();
    let placement = &config.placement;
    let mut graph = Graph::new();
    let root = add_root(&mut graph, Person::new("Ada"), placement);
    let spouse = add_spouse(&mut graph, &root, Person::new("Carl"), placement).unwrap();
    let child = add_child(&mut graph, &spouse, Person::new("Dan"), placement).unwrap();
    let peer = add_peer(&mut graph, &child, Person::new("Pal"), placement).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tree.json");
    save_tree(&path, &graph).unwrap();
    let mut loaded = load_tree(&path).unwrap();
    assert_eq!(loaded.nodes, graph.nodes);
    assert_eq!(loaded.edges, graph.edges);
    assert!(loaded.node(&peer).unwrap().pinned);

    // Newly allocated ids never collide with loaded ones.
    let next = add_root(&mut loaded, Person::new("Eve"), placement);
    assert!(graph.node(&next).is_none());

    assert!(delete_node(&mut loaded, &spouse));
    let json = to_json(&loaded).unwrap();
    let reparsed = parse_document(&json).unwrap();
    assert_eq!(reparsed.edges.len(), 2);
    assert_eq!(reparsed.node(&child).unwrap().position(), pos(&graph, &child));
}
