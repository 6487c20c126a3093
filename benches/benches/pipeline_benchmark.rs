//! Pipeline benchmarks: normalization, gap detection and container I/O.
//!
//! Run with: `cargo bench --package klines-bench`

use chrono::TimeDelta;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use klines_bench::synthetic_candles;
use klines_lib::{TableStore, find_gaps, normalize};
use std::hint::black_box;
use tempfile::TempDir;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn normalize_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for n in SIZES {
        let raw = synthetic_candles(n, 0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &raw, |b, raw| {
            b.iter(|| normalize(black_box(raw)).unwrap());
        });
    }

    group.finish();
}

fn find_gaps_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_gaps");
    let frequency = TimeDelta::minutes(15);

    for n in SIZES {
        for (label, gap_every) in [("complete", 0), ("sparse", 97), ("dense", 3)] {
            let table = normalize(&synthetic_candles(n, gap_every)).unwrap();
            group.throughput(Throughput::Elements(n as u64));
            group.bench_with_input(BenchmarkId::new(label, n), &table, |b, table| {
                b.iter(|| find_gaps(black_box(table), frequency).unwrap());
            });
        }
    }

    group.finish();
}

fn store_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("store");
    group.sample_size(20);

    for n in SIZES {
        let table = normalize(&synthetic_candles(n, 0)).unwrap();
        let temp_dir = TempDir::new().unwrap();
        let store = TableStore::new(temp_dir.path().join("bench"));
        group.throughput(Throughput::Elements(n as u64));

        group.bench_with_input(BenchmarkId::new("save", n), &table, |b, table| {
            b.iter(|| store.save(black_box(table)).unwrap());
        });

        store.save(&table).unwrap();
        group.bench_function(BenchmarkId::new("load", n), |b| {
            b.iter(|| store.load().unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, normalize_benchmark, find_gaps_benchmark, store_benchmark);
criterion_main!(benches);
