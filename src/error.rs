//! Error type shared by buffer creation and the control surface.

/// Errors reported by the mixer.
///
/// Running out of voices is not an error: the sound simply does not play.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MixerError {
    #[error("unsupported channel count {0} (expected 1 or 2)")]
    InvalidChannelCount(u16),

    #[error("pcm data of {bytes} bytes is not a whole number of {frame_bytes}-byte frames")]
    MisalignedPcm { bytes: usize, frame_bytes: usize },

    #[error("audio buffer contains no frames")]
    EmptyBuffer,

    #[error("loop handle for slot {slot} (generation {generation}) no longer refers to a playing voice")]
    StaleHandle { slot: usize, generation: u32 },

    #[error("mixer lock poisoned by a panicking thread")]
    Poisoned,
}
