use std::sync::Arc;

use crate::{
    buffer::AudioBuffer,
    config::Category,
    error::MixerError,
    voice::{LoopHandle, Voice, VoiceFlags},
    MAX_VOICES,
};

/// Result of a successful [`VoicePool::acquire`].
#[derive(Debug)]
pub struct Acquired {
    pub slot: usize,
    /// Buffer reference dropped from a stolen slot.
    pub evicted: Option<Arc<AudioBuffer>>,
}

/// Fixed array of voice slots addressed by (index, generation).
pub struct VoicePool {
    voices: Box<[Voice]>,
}

impl VoicePool {
    pub fn new() -> Self {
        let voices = (0..MAX_VOICES).map(|_| Voice::new()).collect();
        Self { voices }
    }

    /// Bind `buffer` to a slot, stealing one if none is free.
    ///
    /// Free slots win. Otherwise the playing, non-looping voice closest to
    /// its natural end is stolen. When every voice loops, nothing is
    /// returned and the sound does not play. The voice comes back bound but
    /// not yet playing.
    pub fn acquire(
        &mut self,
        buffer: &Arc<AudioBuffer>,
        category: Category,
        gain: f32,
    ) -> Option<Acquired> {
        // First pass: find free voice index
        let free_idx = self.voices.iter().position(|v| v.is_free());

        // Second pass: steal the voice nearest completion
        let slot = free_idx.or_else(|| {
            self.voices
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_playing() && !v.is_looping())
                .min_by_key(|(_, v)| v.remaining_frames())
                .map(|(idx, _)| idx)
        })?;

        let evicted = self.voices[slot].bind(Arc::clone(buffer), category, gain);
        Some(Acquired { slot, evicted })
    }

    pub fn handle(&self, slot: usize) -> LoopHandle {
        LoopHandle::new(slot, self.voices[slot].generation())
    }

    /// Resolve a handle, rejecting it if the slot was freed or recycled.
    pub fn get(&self, handle: LoopHandle) -> Result<&Voice, MixerError> {
        match self.voices.get(handle.slot()) {
            Some(voice) if Self::matches(&*voice, handle) => Ok(voice),
            _ => Err(stale(handle)),
        }
    }

    pub fn get_mut(&mut self, handle: LoopHandle) -> Result<&mut Voice, MixerError> {
        match self.voices.get_mut(handle.slot()) {
            Some(voice) if Self::matches(&*voice, handle) => Ok(voice),
            _ => Err(stale(handle)),
        }
    }

    fn matches(voice: &Voice, handle: LoopHandle) -> bool {
        voice.generation() == handle.generation() && voice.is_playing()
    }

    pub fn slot(&self, slot: usize) -> &Voice {
        &self.voices[slot]
    }

    pub fn slot_mut(&mut self, slot: usize) -> &mut Voice {
        &mut self.voices[slot]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Voice> {
        self.voices.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Voice> {
        self.voices.iter_mut()
    }

    pub fn active_count(&self) -> usize {
        self.voices.iter().filter(|v| v.is_playing()).count()
    }

    /// End-of-block lifecycle pass.
    ///
    /// Fading voices lose `fade_rate × block_frames` of gain and are freed
    /// at or below zero; non-looping voices are freed once their cursor hits
    /// the end of the buffer. Released buffers go to `retire`.
    pub fn cull(&mut self, block_frames: usize, mut retire: impl FnMut(Arc<AudioBuffer>)) -> usize {
        let mut freed = 0;

        for voice in self.voices.iter_mut().filter(|v| v.is_playing()) {
            if voice.flags.contains(VoiceFlags::FADING_OUT) {
                voice.gain -= voice.fade_rate * block_frames as f32;
            }

            let faded = voice.flags.contains(VoiceFlags::FADING_OUT) && voice.gain <= 0.0;
            let finished = !voice.is_looping() && voice.at_end();

            if faded || finished {
                if let Some(buffer) = voice.release() {
                    retire(buffer);
                }
                freed += 1;
            }
        }

        freed
    }

    /// Free every slot regardless of state.
    pub fn release_all(&mut self, mut retire: impl FnMut(Arc<AudioBuffer>)) {
        for voice in self.voices.iter_mut() {
            if let Some(buffer) = voice.release() {
                retire(buffer);
            }
        }
    }
}

fn stale(handle: LoopHandle) -> MixerError {
    MixerError::StaleHandle {
        slot: handle.slot(),
        generation: handle.generation(),
    }
}

impl Default for VoicePool {
    fn default() -> Self {
        Self::new()
    }
}
