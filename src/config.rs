//! Construction-time settings for a [`Mixer`](crate::Mixer).
//!
//! Everything here can also be changed at runtime through the control
//! surface; the config only seeds the initial state.

use crate::{CATEGORY_COUNT, DEFAULT_SAMPLE_RATE};

/// Gain group a voice belongs to. Each category has its own base gain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    #[default]
    Effects,
    Ambience,
}

impl Category {
    pub const ALL: [Category; CATEGORY_COUNT] = [Category::Effects, Category::Ambience];

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MixerConfig {
    /// Output sample rate in Hz. Used to turn seconds into frame counts.
    pub sample_rate: u32,
    /// Group gain per [`Category`](crate::Category), each in [0, 1].
    pub category_gains: [f32; CATEGORY_COUNT],
    /// Gain handed to the music source every block.
    pub music_gain: f32,
    pub compressor: CompressorConfig,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            category_gains: [1.0; CATEGORY_COUNT],
            music_gain: 1.0,
            compressor: CompressorConfig::default(),
        }
    }
}

/// Two-tier compressor settings.
///
/// Thresholds are fractions of 16-bit full scale, multipliers are the gain
/// applied while the block peak sits above the matching threshold. A
/// threshold of 1.0 never triggers, so the default is a bypassed compressor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CompressorConfig {
    pub thresholds: [f32; 2],
    pub multipliers: [f32; 2],
    pub attack_seconds: f32,
    pub release_seconds: f32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            thresholds: [1.0, 1.0],
            multipliers: [1.0, 1.0],
            attack_seconds: 0.01,
            release_seconds: 0.5,
        }
    }
}
