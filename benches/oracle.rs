use clump_oracle::oracle::metric;
use clump_oracle::{BruteForce, ComputeEngine, Descriptor, ResultOptions, Table};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::prelude::*;

/// `k` gaussian-ish blobs of `per` points in `d` dimensions.
fn blobs(rng: &mut StdRng, k: usize, per: usize, d: usize) -> Table<f64> {
    let mut values = Vec::with_capacity(k * per * d);
    for c in 0..k {
        for _ in 0..per {
            for _ in 0..d {
                values.push(c as f64 * 10.0 + rng.random::<f64>());
            }
        }
    }
    Table::wrap(values, k * per, d).unwrap()
}

fn bench_oracle(c: &mut Criterion) {
    let mut group = c.benchmark_group("oracle");

    let mut rng = StdRng::seed_from_u64(42);
    let data = blobs(&mut rng, 8, 125, 16);

    let desc = Descriptor::new(3.0, 5).with_result_options(ResultOptions::all());
    group.bench_function("brute_force_n1000_d16", |b| {
        b.iter(|| BruteForce.compute(black_box(&desc), black_box(&data), None).unwrap())
    });

    let labels: Vec<i32> = (0..data.row_count()).map(|i| (i / 125) as i32).collect();
    group.bench_function("davies_bouldin_n1000_d16_k8", |b| {
        b.iter(|| metric::score(black_box(&data), black_box(&labels)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_oracle);
criterion_main!(benches);
