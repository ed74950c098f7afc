//! Asset graph performance benchmarks
//!
//! Benchmarks building a module tree from scratch, rebuilding it after an
//! edit, and the read queries packagers run once a build settles.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pea_benchmarks::criterion_config;
use pea_core::types::{Asset, AssetGroup, Dependency, Environment, Target};
use pea_core::utils::hash::content_id;
use pea_graph::{AssetGraph, InitOptions};

const FAN_OUT: usize = 8;

fn env() -> Environment {
    Environment::browser()
}

fn module_path(index: usize) -> String {
    format!("src/m{}.js", index)
}

/// Compiled module `index`; module `i` imports modules `i * FAN_OUT + 1..=i * FAN_OUT + FAN_OUT`
fn module(index: usize, count: usize) -> Asset {
    let mut asset = Asset::new(module_path(index), "js", env()).with_stats(1024, 1);
    for child in (index * FAN_OUT + 1)..=(index * FAN_OUT + FAN_OUT) {
        if child < count {
            asset.add_dependency(Dependency::new(format!("./m{}.js", child), env()));
        }
    }
    asset
}

/// Build a tree of `count` modules breadth-first
fn build_graph(count: usize) -> AssetGraph {
    let target = Target::new("web", "dist", env());
    let mut graph = AssetGraph::new();
    graph
        .initialize(InitOptions::from_entries(vec!["./m0.js".into()], vec![target.clone()]))
        .unwrap();

    let mut queue = vec![(Dependency::entry("./m0.js", &target), 0)];
    while let Some((dependency, index)) = queue.pop() {
        let group = AssetGroup::new(module_path(index), env());
        graph.resolve_dependency(&dependency, Some(&group)).unwrap();

        let asset = module(index, count);
        for (offset, child) in asset.dependencies().iter().enumerate() {
            queue.push((child.clone(), index * FAN_OUT + offset + 1));
        }
        graph.resolve_asset_group(&group, vec![asset]).unwrap();
    }
    graph
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("asset_graph_build");

    for count in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("modules", count), count, |b, &count| {
            b.iter(|| black_box(build_graph(count)));
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let mut group = c.benchmark_group("asset_graph_rebuild");

    for count in [1_000, 10_000].iter() {
        let mut graph = build_graph(*count);
        let root_group = AssetGroup::new(module_path(0), env());

        // re-transforming the entry keeps every resolved subtree
        group.bench_with_input(BenchmarkId::new("unchanged_entry", count), count, |b, &count| {
            b.iter(|| {
                graph
                    .resolve_asset_group(&root_group, vec![module(0, count)])
                    .unwrap();
                black_box(graph.node_count())
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("asset_graph_queries");
    let graph = build_graph(10_000);
    let leaf = module(9_999, 10_000);

    group.bench_function("entry_assets", |b| {
        b.iter(|| black_box(graph.get_entry_assets()));
    });
    group.bench_function("incoming_dependencies", |b| {
        b.iter(|| black_box(graph.get_incoming_dependencies(&leaf).unwrap()));
    });
    group.bench_function("report", |b| {
        b.iter(|| black_box(graph.report()));
    });

    group.finish();
}

fn bench_content_id(c: &mut Criterion) {
    let dependency = Dependency::new("./m1.js", env()).with_source_asset(content_id("m0"));

    c.bench_function("dependency_content_id", |b| {
        b.iter(|| {
            black_box(content_id(&(
                &dependency.source_asset_id,
                &dependency.module_specifier,
                &dependency.env,
            )))
        });
    });
}

criterion_group! {
    name = benches;
    config = criterion_config();
    targets = bench_build, bench_rebuild, bench_queries, bench_content_id
}
criterion_main!(benches);
