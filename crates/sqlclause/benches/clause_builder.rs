use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Map, Value, json};
use sqlclause::Query;

/// Query with `n` positional WHERE calls and one ORDER BY column per call.
fn build_query(n: usize) -> Query {
    let mut q = Query::new().sql("SELECT * FROM t", vec![]);
    for i in 0..n {
        q = q
            .and_where((format!("col{i}"), "=", i as i64))
            .order(format!("col{i}"));
    }
    q.limit(10)
}

fn mapping(n: usize) -> Map<String, Value> {
    (0..n)
        .map(|i| (format!("col{i:03}"), json!({">": i, "IN": [i, i + 1, i + 2]})))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let query = build_query(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &query, |b, query| {
            b.iter(|| black_box(query.build()));
        });
    }

    group.finish();
}

fn bench_chain_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause_builder/chain_and_build");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_query(n).build()));
        });
    }

    group.finish();
}

fn bench_lower_mapping(c: &mut Criterion) {
    let mut group = c.benchmark_group("clause_builder/lower_mapping");

    for n in [5, 20, 100] {
        let map = mapping(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &map, |b, map| {
            b.iter(|| black_box(Query::new().and_where(map.clone()).build()));
        });
    }

    group.finish();
}

fn bench_clone_then_write(c: &mut Criterion) {
    let base = build_query(50);
    c.bench_function("clause_builder/clone_then_write", |b| {
        b.iter(|| black_box(base.clone().limit(20)));
    });
}

criterion_group!(
    benches,
    bench_build,
    bench_chain_and_build,
    bench_lower_mapping,
    bench_clone_then_write
);
criterion_main!(benches);
