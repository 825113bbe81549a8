//! Criterion timings of the SQLite strategies, for comparison with the
//! harness's single-pass numbers.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ormbench_executors::{seed, sqlite, DEFAULT_POST_COUNT};

fn seeded_target() -> (tempfile::TempDir, String) {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("bench.db").to_str().unwrap().to_string();
    seed(&target, DEFAULT_POST_COUNT).unwrap();
    (dir, target)
}

fn bench_fetch_one(c: &mut Criterion) {
    let (_dir, target) = seeded_target();
    let mut group = c.benchmark_group("sqlite/fetch_one");

    for mut executor in sqlite::executors() {
        executor.init(&target).unwrap();
        let name = executor.name().to_string();

        group.bench_function(BenchmarkId::from_parameter(&name), |b| {
            b.iter(|| {
                let post = executor.fetch_one(black_box(1)).unwrap();
                black_box(post);
            });
        });

        executor.teardown().unwrap();
    }

    group.finish();
}

fn bench_fetch_all(c: &mut Criterion) {
    let (_dir, target) = seeded_target();
    let mut group = c.benchmark_group("sqlite/fetch_all");
    group.sample_size(20);

    for mut executor in sqlite::executors() {
        executor.init(&target).unwrap();
        let name = executor.name().to_string();

        group.bench_function(BenchmarkId::from_parameter(&name), |b| {
            b.iter(|| {
                let posts = executor.fetch_all().unwrap();
                black_box(posts.len());
            });
        });

        executor.teardown().unwrap();
    }

    group.finish();
}

criterion_group!(benches, bench_fetch_one, bench_fetch_all);
criterion_main!(benches);
