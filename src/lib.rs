pub mod buffer; // Shared immutable PCM assets
pub mod config;
pub mod dsp;
pub mod engine; // Mixer state, block scheduling, control surface
pub mod error;
pub mod io;
pub mod voice; // Voice slots, allocation and handles

pub use buffer::{AudioBuffer, BufferHandle};
pub use config::{Category, CompressorConfig, MixerConfig};
pub use engine::{Emitter, Mixer, MixerStats, MusicSource, SharedMixer};
pub use error::MixerError;
pub use glam::Vec3;
pub use voice::LoopHandle;

/// Fixed-point unity gain (Q). Gains in [0, 1] map onto [0, GAIN_UNITY].
pub const GAIN_UNITY: i32 = 1024;
/// Frames rendered per internal pass, independent of caller read sizes.
pub const BLOCK_FRAMES: usize = 2048;
pub const MAX_VOICES: usize = 32;
pub const CATEGORY_COUNT: usize = 2;
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
