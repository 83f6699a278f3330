//! # redbloom Benchmarks
//!
//! | Area | Measured |
//! |------|----------|
//! | Sizing | `FilterParameters::new` across capacities |
//! | Offsets | murmur3 double hashing for growing k |
//! | Engine | insert / may_exist round trips on the in-memory store |

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

use redbloom::domain::bit_offsets;
use redbloom::{FilterParameters, InMemoryBitStore, RemoteBloomFilter};

fn bench_sizing(c: &mut Criterion) {
    let mut group = c.benchmark_group("sizing");

    for (n, fpp) in [(3_000u64, 0.03), (100_000, 0.01), (10_000_000, 0.001)] {
        group.bench_with_input(
            BenchmarkId::new("filter_parameters", format!("{n}@{fpp}")),
            &(n, fpp),
            |b, &(n, fpp)| b.iter(|| FilterParameters::new(black_box(n), black_box(fpp))),
        );
    }

    group.finish();
}

fn bench_offsets(c: &mut Criterion) {
    let mut group = c.benchmark_group("bit_offsets");
    let element = b"topic_read:8839540:76930242";

    for k in [3u32, 5, 10, 20] {
        group.throughput(Throughput::Elements(k as u64));
        group.bench_with_input(BenchmarkId::from_parameter(k), &k, |b, &k| {
            b.iter(|| bit_offsets(black_box(element), k, 21_895))
        });
    }

    // Element length dominates hashing cost
    for len in [8usize, 64, 1024] {
        let element: Vec<u8> = (0..len).map(|_| rand::thread_rng().gen()).collect();
        group.throughput(Throughput::Bytes(len as u64));
        group.bench_with_input(BenchmarkId::new("element_bytes", len), &element, |b, element| {
            b.iter(|| bit_offsets(black_box(element), 5, 21_895))
        });
    }

    group.finish();
}

fn bench_engine(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let filter = RemoteBloomFilter::new(Arc::new(InMemoryBitStore::new()), 3000, 0.03).unwrap();

    let mut group = c.benchmark_group("engine_in_memory");

    group.bench_function("insert", |b| {
        let mut id = 0u64;
        b.iter(|| {
            id += 1;
            runtime
                .block_on(filter.insert_str("bench", &id.to_string(), 3600))
                .unwrap()
        })
    });

    group.bench_function("may_exist", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let element = rng.gen::<u64>().to_string();
            black_box(runtime.block_on(filter.may_exist_str("bench", &element)).unwrap())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_sizing, bench_offsets, bench_engine);
criterion_main!(benches);
