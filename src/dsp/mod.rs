//! Low-level mixing primitives used by the engine.
//!
//! These components are allocation-free and realtime-safe. They work on the
//! wide integer accumulator (interleaved stereo `i32`) and stay focused on
//! the signal math so the engine can layer voice bookkeeping on top.

/// Two-tier adaptive compressor run over each rendered block.
pub mod compressor;
/// Fixed-point gain quantization.
pub mod gain;
/// Per-voice accumulation with optional linear-interpolation pitch shift.
pub mod resample;
/// Listener-relative distance attenuation and pan.
pub mod spatial;

pub use compressor::Compressor;
pub use gain::{quantize, StereoGain};
