//! Synthesized test assets, standing in for decoded sound files.

use blockmix::BufferHandle;
use color_eyre::eyre::Result;

/// Mono sine burst with a linear decay, as little-endian PCM bytes.
fn sine_bytes(sample_rate: u32, freq: f32, seconds: f32, decay: bool) -> Vec<u8> {
    let frames = (sample_rate as f32 * seconds) as usize;
    (0..frames)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let env = if decay { 1.0 - i as f32 / frames as f32 } else { 1.0 };
            ((t * freq * std::f32::consts::TAU).sin() * env * 12_000.0) as i16
        })
        .flat_map(|s| s.to_le_bytes())
        .collect()
}

pub fn ping(sample_rate: u32) -> Result<BufferHandle> {
    Ok(BufferHandle::create(1, &sine_bytes(sample_rate, 880.0, 0.25, true))?)
}

/// Exactly 100 cycles so the loop point is seamless.
pub fn hum(sample_rate: u32) -> Result<BufferHandle> {
    let freq = 220.0;
    let seconds = 100.0 / freq;
    Ok(BufferHandle::create(1, &sine_bytes(sample_rate, freq, seconds, false))?)
}
