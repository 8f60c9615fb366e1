mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use terrain_graph::prelude::{
    CopyLayer, CreateTerrain, Graph, GraphRunner, LayerFilter, RunOptions, TerrainNoise,
    VecSink, HEIGHT_LAYER,
};

/// create -> noise -> scale -> smoothstep
fn chain(size: usize) -> Graph {
    let mut graph = Graph::new("chain");
    let create = graph.add_node(CreateTerrain::new(size, size, 0.0));
    let noise = graph.add_node(TerrainNoise::new());
    let scale = graph.add_node(LayerFilter::scale(2.0));
    let smooth = graph.add_node(LayerFilter::smoothstep(0.25, 1.75));
    graph.link(create, "terrain", noise, "terrain").expect("link");
    graph.link(noise, "terrain", scale, "terrain").expect("link");
    graph.link(scale, "terrain", smooth, "terrain").expect("link");
    graph
}

/// One noise node feeding four branches, each cloning the terrain.
fn fan_out(size: usize) -> Graph {
    let mut graph = Graph::new("fan-out");
    let create = graph.add_node(CreateTerrain::new(size, size, 0.0));
    let noise = graph.add_node(TerrainNoise::new());
    graph.link(create, "terrain", noise, "terrain").expect("link");
    for i in 0..4 {
        let copy = graph.add_node(CopyLayer::new(HEIGHT_LAYER, format!("branch_{i}")));
        graph.link(noise, "terrain", copy, "terrain").expect("link");
    }
    graph
}

fn execution_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/execute");

    for &size in &common::SIZES {
        group.throughput(common::cells_throughput(size));

        let graph = chain(size);
        let runner = GraphRunner::new(&graph, RunOptions::default()).expect("compile ok");
        group.bench_with_input(BenchmarkId::new("chain", size), &size, |b, _| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                let execution = runner.run(&mut rng).expect("run ok");
                black_box(execution);
            });
        });

        let runner = GraphRunner::new(&graph, RunOptions::move_only()).expect("compile ok");
        group.bench_with_input(BenchmarkId::new("chain_move_only", size), &size, |b, _| {
            let mut rng = StdRng::seed_from_u64(1);
            b.iter(|| {
                let execution = runner.run(&mut rng).expect("run ok");
                black_box(execution);
            });
        });

        let graph = fan_out(size);
        let runner = GraphRunner::new(&graph, RunOptions::default()).expect("compile ok");
        group.bench_with_input(BenchmarkId::new("fan_out", size), &size, |b, _| {
            let mut rng = StdRng::seed_from_u64(1);
            let mut sink = VecSink::new();
            b.iter(|| {
                sink.clear();
                let execution = runner
                    .run_with_events(&mut rng, &mut sink)
                    .expect("run ok");
                black_box(execution);
            });
        });
    }

    group.finish();
}

fn compile_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph/compile");
    let graph = fan_out(4);
    group.bench_function("fan_out", |b| {
        b.iter(|| black_box(graph.compile().expect("compile ok")));
    });
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = execution_benches, compile_benches
}
criterion_main!(benches);
