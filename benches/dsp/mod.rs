//! Benchmarks for low-level mixing primitives.

mod compressor;

pub use compressor::bench_compressor;
