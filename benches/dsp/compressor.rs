use std::hint::black_box;

use blockmix::{dsp::Compressor, CompressorConfig, BLOCK_FRAMES};
use criterion::Criterion;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    let loud: Vec<i32> = (0..BLOCK_FRAMES * 2)
        .map(|i| ((i as i32 * 97) % 120_000) - 60_000)
        .collect();
    let mut block = loud.clone();

    // Bypassed: peak scan only
    let mut bypass = Compressor::new(&CompressorConfig::default(), 44_100);
    group.bench_function("bypass", |b| {
        b.iter(|| {
            block.copy_from_slice(&loud);
            bypass.process(black_box(&mut block));
        })
    });

    // Engaged: peak scan plus the per-sample smoother
    let config = CompressorConfig {
        thresholds: [0.5, 0.9],
        multipliers: [0.6, 0.3],
        attack_seconds: 0.0,
        release_seconds: 0.2,
    };
    let mut engaged = Compressor::new(&config, 44_100);
    group.bench_function("engaged", |b| {
        b.iter(|| {
            block.copy_from_slice(&loud);
            engaged.process(black_box(&mut block));
        })
    });

    group.finish();
}
