use std::sync::Arc;

use glam::Vec3;

use crate::{buffer::AudioBuffer, config::Category, dsp::gain::unit};

bitflags::bitflags! {
    /// Playback state bits for one voice.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct VoiceFlags: u8 {
        /// Audible; rendered every block
        const PLAYING = 0b0000_0001;
        /// Gain and pan follow the listener geometry
        const POSITIONAL = 0b0000_0010;
        /// Wraps to frame 0 at end of buffer
        const LOOPING = 0b0000_0100;
        /// Gain decays every block until the voice is freed
        const FADING_OUT = 0b0000_1000;
        /// Rendered through the resampling path
        const PITCH_SHIFTED = 0b0001_0000;
    }
}

/// One playback slot, bound (or not) to an [`AudioBuffer`].
///
/// A voice without `PLAYING` is free and holds no buffer reference.
#[derive(Debug)]
pub struct Voice {
    pub(crate) buffer: Option<Arc<AudioBuffer>>,
    pub(crate) cursor: usize,
    pub(crate) flags: VoiceFlags,
    pub(crate) category: Category,
    pub(crate) gain: f32,
    pub(crate) fade_rate: f32,
    pub(crate) position: Vec3,
    pub(crate) min_distance: f32,
    pub(crate) max_distance: f32,
    pub(crate) frequency: f32,
    generation: u32,
}

impl Voice {
    pub fn new() -> Self {
        Self {
            buffer: None,
            cursor: 0,
            flags: VoiceFlags::empty(),
            category: Category::Effects,
            gain: 0.0,
            fade_rate: 0.0,
            position: Vec3::ZERO,
            min_distance: 0.0,
            max_distance: 0.0,
            frequency: 1.0,
            generation: 0,
        }
    }

    /// Attach a buffer for a new logical sound, starting from frame 0.
    ///
    /// Does not start playback. Returns the reference previously held by the
    /// slot, if any, so the caller decides where it gets dropped.
    pub(crate) fn bind(
        &mut self,
        buffer: Arc<AudioBuffer>,
        category: Category,
        gain: f32,
    ) -> Option<Arc<AudioBuffer>> {
        let previous = self.buffer.replace(buffer);
        self.generation = self.generation.wrapping_add(1);
        self.cursor = 0;
        self.flags = VoiceFlags::empty();
        self.category = category;
        self.gain = unit(gain);
        self.fade_rate = 0.0;
        self.position = Vec3::ZERO;
        self.min_distance = 0.0;
        self.max_distance = 0.0;
        self.frequency = 1.0;
        previous
    }

    pub(crate) fn play(&mut self) {
        if self.buffer.is_some() {
            self.flags.insert(VoiceFlags::PLAYING);
        }
    }

    /// Free the slot: clear every flag and hand back the buffer reference.
    pub(crate) fn release(&mut self) -> Option<Arc<AudioBuffer>> {
        self.flags = VoiceFlags::empty();
        self.cursor = 0;
        self.gain = 0.0;
        self.fade_rate = 0.0;
        self.buffer.take()
    }

    pub fn is_free(&self) -> bool {
        self.buffer.is_none()
    }

    pub fn is_playing(&self) -> bool {
        self.flags.contains(VoiceFlags::PLAYING)
    }

    pub fn is_looping(&self) -> bool {
        self.flags.contains(VoiceFlags::LOOPING)
    }

    pub fn flags(&self) -> VoiceFlags {
        self.flags
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn frames(&self) -> usize {
        self.buffer.as_ref().map_or(0, |b| b.frames())
    }

    /// Frames left before natural completion.
    pub fn remaining_frames(&self) -> usize {
        self.frames().saturating_sub(self.cursor)
    }

    pub fn at_end(&self) -> bool {
        self.cursor >= self.frames()
    }
}

impl Default for Voice {
    fn default() -> Self {
        Self::new()
    }
}
