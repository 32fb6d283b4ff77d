//! Whole-mixer scenario benchmarks.
//!
//! These model a game scene: a handful of ambience loops, positional
//! sources around the listener and bursts of one-shots.

mod pull;
mod voices;

pub use pull::bench_pull;
pub use voices::bench_voices;

use blockmix::{BufferHandle, Category, Emitter, Mixer, Vec3};

pub(crate) fn tone(frames: usize, period: usize) -> BufferHandle {
    let bytes: Vec<u8> = (0..frames)
        .map(|i| if i % period < period / 2 { 9_000i16 } else { -9_000 })
        .flat_map(|s| s.to_le_bytes())
        .collect();
    BufferHandle::create(1, &bytes).unwrap()
}

/// Fill `voices` slots with a mix of flat, positional and pitched loops.
pub(crate) fn scene(voices: usize) -> Mixer {
    let mut mixer = Mixer::default();
    mixer.effects_compressor([0.5, 0.8], [0.7, 0.4], 0.01, 0.2);
    let buffer = tone(22_050, 100);

    for i in 0..voices {
        let handle = match i % 3 {
            0 => mixer.add_loop(&buffer, Category::Effects, 0.5),
            1 => mixer.add_loop_positional(
                &buffer,
                Category::Ambience,
                0.5,
                Emitter::new(Vec3::new(i as f32 - 16.0, 0.0, 4.0), 2.0, 40.0),
            ),
            _ => mixer.add_loop(&buffer, Category::Effects, 0.3),
        };
        if i % 3 == 2 {
            if let Some(handle) = handle {
                mixer.loop_set_frequency(handle, 0.75 + i as f32 * 0.05).unwrap();
            }
        }
    }
    mixer
}
