use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use family_tree_rs::config::LayoutConfig;
use family_tree_rs::editor::{add_child, add_root, add_spouse};
use family_tree_rs::ir::{Graph, Person};
use family_tree_rs::layout::compute_layout;
use family_tree_rs::path::find_path;
use family_tree_rs::{parse_document, to_json};
use std::hint::black_box;

/// One founding couple, `width` married children, each with `width` kids.
fn wide_family(width: usize) -> Graph {
    let config = LayoutConfig::default();
    let placement = &config.placement;
    let mut graph = Graph::new();
    let root = add_root(&mut graph, Person::new("founder"), placement);
    add_spouse(&mut graph, &root, Person::new("founder spouse"), placement);
    for i in 0..width {
        let Some(child) = add_child(&mut graph, &root, Person::new(format!("child {i}")), placement)
        else {
            continue;
        };
        add_spouse(&mut graph, &child, Person::new(format!("in-law {i}")), placement);
        for j in 0..width {
            add_child(&mut graph, &child, Person::new(format!("grandchild {i}.{j}")), placement);
        }
    }
    graph
}

/// A single line of descent, each generation married, listed newest first so
/// levels need many passes to settle.
fn deep_line(depth: usize) -> Graph {
    let config = LayoutConfig::default();
    let placement = &config.placement;
    let mut graph = Graph::new();
    let mut current = add_root(&mut graph, Person::new("gen 0"), placement);
    for generation in 1..depth {
        add_spouse(&mut graph, &current, Person::new(format!("spouse {generation}")), placement);
        match add_child(&mut graph, &current, Person::new(format!("gen {generation}")), placement) {
            Some(next) => current = next,
            None => break,
        }
    }
    let mut reversed = Graph::new();
    for node in graph.nodes.values().rev() {
        reversed.insert_node(node.clone());
    }
    reversed.edges = graph.edges;
    reversed
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    for width in [4usize, 16, 48] {
        let graph = wide_family(width);
        group.bench_with_input(BenchmarkId::new("wide", width), &graph, |b, graph| {
            b.iter(|| {
                let mut graph = graph.clone();
                let report = compute_layout(black_box(&mut graph), &config);
                black_box(report.passes);
            });
        });
    }
    for depth in [8usize, 18] {
        let graph = deep_line(depth);
        group.bench_with_input(BenchmarkId::new("deep", depth), &graph, |b, graph| {
            b.iter(|| {
                let mut graph = graph.clone();
                let report = compute_layout(black_box(&mut graph), &config);
                black_box(report.converged);
            });
        });
    }
    group.finish();
}

fn bench_path(c: &mut Criterion) {
    let mut group = c.benchmark_group("path");
    let config = LayoutConfig::default();
    for width in [16usize, 48] {
        let mut graph = wide_family(width);
        compute_layout(&mut graph, &config);
        let target = graph
            .persons()
            .last()
            .map(|node| node.id.clone())
            .unwrap_or_default();
        group.bench_with_input(BenchmarkId::from_parameter(width), &graph, |b, graph| {
            b.iter(|| black_box(find_path(graph, black_box(&target)).len()));
        });
    }
    group.finish();
}

fn bench_document(c: &mut Criterion) {
    let mut group = c.benchmark_group("document");
    for width in [16usize, 48] {
        let json = to_json(&wide_family(width)).expect("export failed");
        group.bench_with_input(BenchmarkId::from_parameter(width), &json, |b, data| {
            b.iter(|| {
                let graph = parse_document(black_box(data)).expect("parse failed");
                black_box(graph.nodes.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_layout, bench_path, bench_document
);
criterion_main!(benches);
