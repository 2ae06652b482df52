//! Flat index benchmarks.
//!
//! Covers the per-call cost of dedup over typical listing batches:
//! - Index build (one contiguous copy)
//! - Nearest-other query for every item (k = 2)
//!
//! Run: `cargo bench --bench flat_index`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use percolate_signals::index::FlatIndex;

/// all-MiniLM-L6-v2 dimensionality
const DIM: usize = 384;

/// Deterministic pseudo-random vectors (xorshift).
fn vectors(count: usize, dim: usize) -> Vec<Vec<f32>> {
    let mut state: u32 = 0x9E37_79B9;
    (0..count)
        .map(|_| {
            (0..dim)
                .map(|_| {
                    state ^= state << 13;
                    state ^= state >> 17;
                    state ^= state << 5;
                    (state as f32 / u32::MAX as f32) - 0.5
                })
                .collect()
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_index_build");

    for count in [50, 150, 500] {
        let batch = vectors(count, DIM);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch, |b, batch| {
            b.iter(|| FlatIndex::build(black_box(batch)).unwrap())
        });
    }

    group.finish();
}

fn bench_all_pairs_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat_index_search_all_k2");

    for count in [50, 150, 500] {
        let batch = vectors(count, DIM);
        let index = FlatIndex::build(&batch).unwrap();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &batch, |b, batch| {
            b.iter(|| {
                for query in batch {
                    black_box(index.search(black_box(query), 2).unwrap());
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_all_pairs_search);
criterion_main!(benches);
