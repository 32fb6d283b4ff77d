//! Cost of serving device-sized reads from the pull buffer.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};

use super::scene;
use crate::READ_SIZES;

pub fn bench_pull(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/pull");

    for &frames in READ_SIZES {
        let mut mixer = scene(16);
        let mut out = vec![0i16; frames * 2];

        group.bench_with_input(BenchmarkId::new("16_voices", frames), &frames, |b, _| {
            b.iter(|| mixer.get_samples(black_box(&mut out)))
        });
    }

    group.finish();
}
