//! Block render cost against voice count.

use std::hint::black_box;

use blockmix::{BLOCK_FRAMES, MAX_VOICES};
use criterion::{BenchmarkId, Criterion};

use super::scene;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let mut out = vec![0i16; BLOCK_FRAMES * 2];

    for &count in &[1, 8, 16, MAX_VOICES] {
        let mut mixer = scene(count);

        // One read of exactly one block renders exactly one block
        group.bench_with_input(BenchmarkId::new("block", count), &count, |b, _| {
            b.iter(|| mixer.get_samples(black_box(&mut out)))
        });
    }

    group.finish();
}
