//! Benchmarks for the mixer's render path.
//!
//! Run with: cargo bench
//!
//! Everything here runs inside the audio callback, so it has to finish well
//! within the device deadline.
//!
//! Reference timing at 44.1kHz sample rate:
//!   - 256 frames  = 5.8ms deadline
//!   - 512 frames  = 11.6ms deadline
//!   - 2048 frames = 46.4ms deadline (one internal block)
//!
//! Benchmark groups:
//!   - dsp/*        Compressor over a full block
//!   - scenarios/*  Whole-mixer renders at different voice counts and read sizes

use criterion::{criterion_group, criterion_main};

mod dsp;
mod scenarios;

/// Caller read sizes typical of device callbacks, in frames.
pub const READ_SIZES: &[usize] = &[64, 256, 512, 2048];

criterion_group!(
    benches,
    dsp::bench_compressor,
    scenarios::bench_voices,
    scenarios::bench_pull,
);
criterion_main!(benches);
