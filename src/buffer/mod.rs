//! Shared, immutable PCM assets.
//!
//! An [`AudioBuffer`] is created once per decoded asset and shared by every
//! voice playing it. The reference count is the `Arc` strong count: the
//! caller's [`BufferHandle`] holds one, each bound voice holds another, and
//! the samples are freed when the last one goes away.
//!
//! Creation copies and validates the PCM, so it allocates and must stay off
//! the render thread. The render thread only ever clones or releases the
//! `Arc`, and the mixer routes its releases back to the control side (see
//! [`Mixer::collect_retired`](crate::Mixer::collect_retired)).

use std::sync::Arc;

use crate::{error::MixerError, io::pcm::samples_from_bytes};

/// Interleaved 16-bit PCM, mono or stereo. Never mutated after creation.
#[derive(Debug)]
pub struct AudioBuffer {
    channels: u16,
    frames: usize,
    samples: Box<[i16]>,
}

impl AudioBuffer {
    /// Build a buffer from already-decoded interleaved samples.
    pub fn from_samples(channels: u16, samples: Vec<i16>) -> Result<Self, MixerError> {
        if !(1..=2).contains(&channels) {
            return Err(MixerError::InvalidChannelCount(channels));
        }
        if samples.len() % channels as usize != 0 {
            return Err(MixerError::MisalignedPcm {
                bytes: samples.len() * 2,
                frame_bytes: channels as usize * 2,
            });
        }
        if samples.is_empty() {
            return Err(MixerError::EmptyBuffer);
        }

        Ok(Self {
            channels,
            frames: samples.len() / channels as usize,
            samples: samples.into_boxed_slice(),
        })
    }

    /// Build a buffer from raw little-endian 16-bit PCM bytes.
    pub fn from_pcm_bytes(channels: u16, bytes: &[u8]) -> Result<Self, MixerError> {
        if !(1..=2).contains(&channels) {
            return Err(MixerError::InvalidChannelCount(channels));
        }
        let frame_bytes = channels as usize * 2;
        if bytes.len() % frame_bytes != 0 {
            return Err(MixerError::MisalignedPcm {
                bytes: bytes.len(),
                frame_bytes,
            });
        }

        Self::from_samples(channels, samples_from_bytes(bytes))
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn is_stereo(&self) -> bool {
        self.channels == 2
    }

    /// Number of frames (one sample per channel).
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Interleaved samples.
    pub fn samples(&self) -> &[i16] {
        &self.samples
    }
}

/// Caller-side reference to an [`AudioBuffer`].
///
/// Cloning adds a reference; dropping (or [`release`](Self::release))
/// removes one.
#[derive(Debug, Clone)]
pub struct BufferHandle(Arc<AudioBuffer>);

impl BufferHandle {
    /// Copy PCM bytes into a new shared buffer with a reference count of one.
    pub fn create(channels: u16, pcm: &[u8]) -> Result<Self, MixerError> {
        AudioBuffer::from_pcm_bytes(channels, pcm).map(Self::from)
    }

    /// Release this reference. The samples are freed once no voice or other
    /// handle still holds the buffer.
    pub fn release(self) {}

    /// Number of live references, voices included.
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }

    pub(crate) fn shared(&self) -> &Arc<AudioBuffer> {
        &self.0
    }
}

impl From<AudioBuffer> for BufferHandle {
    fn from(buffer: AudioBuffer) -> Self {
        Self(Arc::new(buffer))
    }
}

impl std::ops::Deref for BufferHandle {
    type Target = AudioBuffer;

    fn deref(&self) -> &AudioBuffer {
        &self.0
    }
}
