use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};

use dev_utils::example_scenario;
use transit_pathfinder::{CancellationToken, FilterSet, GraphBuilder, NameResolver, Router};

fn build_benchmark(c: &mut Criterion) {
    let (mut map, frequencies, config, _origin, _destination) = example_scenario();
    let resolver = NameResolver::new(&config);
    let filters = FilterSet::default();
    c.bench_function("GraphBuilder::build", |b| {
        b.iter(|| {
            GraphBuilder::new(&config, &resolver)
                .build(black_box(&mut map), &frequencies, &filters, &CancellationToken::new())
                .unwrap()
        })
    });
}

fn query_benchmark(c: &mut Criterion) {
    let (mut map, frequencies, config, origin, destination) = example_scenario();
    let resolver = NameResolver::new(&config);
    let filters = FilterSet::default();
    let (graph, _original) =
        GraphBuilder::new(&config, &resolver).build(&mut map, &frequencies, &filters, &CancellationToken::new()).unwrap();

    c.bench_function("Router::shortest_path", |b| {
        b.iter(|| {
            Router::new(&graph)
                .shortest_path(black_box(&origin), black_box(&destination), &CancellationToken::new())
                .unwrap()
        })
    });
}

fn random_pair_query_benchmark(c: &mut Criterion) {
    let (mut map, frequencies, config, _origin, _destination) = example_scenario();
    let resolver = NameResolver::new(&config);
    let filters = FilterSet::default();
    let (graph, _original) =
        GraphBuilder::new(&config, &resolver).build(&mut map, &frequencies, &filters, &CancellationToken::new()).unwrap();

    fastrand::seed(7);
    let stations: Vec<String> = map.stations().filter(|s| s.is_routable()).map(|s| s.id.clone()).collect();
    let pairs: Vec<(String, String)> = std::iter::repeat_with(|| {
        let a = &stations[fastrand::usize(..stations.len())];
        let b = &stations[fastrand::usize(..stations.len())];
        (a.clone(), b.clone())
    })
    .filter(|(a, b)| a != b)
    .take(32)
    .collect();

    c.bench_function("Router::shortest_path over random pairs", |b| {
        b.iter(|| {
            for (origin, destination) in &pairs {
                let _ = Router::new(&graph).shortest_path(black_box(origin), black_box(destination), &CancellationToken::new());
            }
        })
    });
}

criterion_group!(benches, build_benchmark, query_benchmark, random_pair_query_benchmark);
criterion_main!(benches);
