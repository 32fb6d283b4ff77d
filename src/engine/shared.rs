//! Thread-safe front for a [`Mixer`].
//!
//! One lock guards all mixer state. The audio thread holds it for a whole
//! `get_samples` call; every control call holds it for its own duration.
//! Control calls are short and bounded, so the render side never waits
//! long, and changes land on block boundaries.

use std::sync::{Arc, Mutex, MutexGuard};

use glam::Vec3;

use super::{Emitter, Mixer, MixerStats};
use crate::{buffer::BufferHandle, config::Category, error::MixerError, voice::LoopHandle};

#[derive(Clone)]
pub struct SharedMixer {
    inner: Arc<Mutex<Mixer>>,
}

impl SharedMixer {
    pub fn new(mixer: Mixer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(mixer)),
        }
    }

    /// Direct access for batches of changes under one lock.
    pub fn lock(&self) -> Result<MutexGuard<'_, Mixer>, MixerError> {
        self.inner.lock().map_err(|_| MixerError::Poisoned)
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut Mixer) -> R) -> Result<R, MixerError> {
        let mut mixer = self.lock()?;
        Ok(f(&mut mixer))
    }

    /// Render entry point for the audio thread.
    pub fn get_samples(&self, out: &mut [i16]) -> Result<(), MixerError> {
        self.with(|m| m.get_samples(out))
    }

    pub fn add(&self, buffer: &BufferHandle, category: Category, gain: f32) -> Result<bool, MixerError> {
        self.with(|m| m.add(buffer, category, gain))
    }

    pub fn add_positional(
        &self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
        emitter: Emitter,
    ) -> Result<bool, MixerError> {
        self.with(|m| m.add_positional(buffer, category, gain, emitter))
    }

    pub fn add_loop(
        &self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
    ) -> Result<Option<LoopHandle>, MixerError> {
        self.with(|m| m.add_loop(buffer, category, gain))
    }

    pub fn add_loop_positional(
        &self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
        emitter: Emitter,
    ) -> Result<Option<LoopHandle>, MixerError> {
        self.with(|m| m.add_loop_positional(buffer, category, gain, emitter))
    }

    pub fn remove_loop(&self, handle: LoopHandle) -> Result<(), MixerError> {
        self.with(|m| m.remove_loop(handle))?
    }

    pub fn loop_set_position(&self, handle: LoopHandle, position: Vec3) -> Result<(), MixerError> {
        self.with(|m| m.loop_set_position(handle, position))?
    }

    pub fn loop_set_gain(&self, handle: LoopHandle, gain: f32) -> Result<(), MixerError> {
        self.with(|m| m.loop_set_gain(handle, gain))?
    }

    pub fn loop_set_frequency(&self, handle: LoopHandle, ratio: f32) -> Result<(), MixerError> {
        self.with(|m| m.loop_set_frequency(handle, ratio))?
    }

    pub fn loop_fadeout(&self, handle: LoopHandle, seconds: f32) -> Result<(), MixerError> {
        self.with(|m| m.loop_fadeout(handle, seconds))?
    }

    pub fn update_listener(&self, position: Vec3) -> Result<(), MixerError> {
        self.with(|m| m.update_listener(position))
    }

    pub fn set_basegain(&self, category: Category, gain: f32) -> Result<(), MixerError> {
        self.with(|m| m.set_basegain(category, gain))
    }

    pub fn set_music_gain(&self, gain: f32) -> Result<(), MixerError> {
        self.with(|m| m.set_music_gain(gain))
    }

    pub fn effects_compressor(
        &self,
        thresholds: [f32; 2],
        multipliers: [f32; 2],
        attack_seconds: f32,
        release_seconds: f32,
    ) -> Result<(), MixerError> {
        self.with(|m| m.effects_compressor(thresholds, multipliers, attack_seconds, release_seconds))
    }

    pub fn stop_all(&self) -> Result<(), MixerError> {
        self.with(|m| m.stop_all())
    }

    pub fn stats(&self) -> Result<MixerStats, MixerError> {
        self.with(|m| m.stats())
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn control_and_render_from_different_threads() {
        let shared = SharedMixer::new(Mixer::default());
        let buffer = BufferHandle::create(1, &[0x10, 0x00, 0x10, 0x00]).unwrap();

        let control = {
            let shared = shared.clone();
            let buffer = buffer.clone();
            thread::spawn(move || {
                let mut handles = Vec::new();
                for _ in 0..8 {
                    handles.extend(shared.add_loop(&buffer, Category::Effects, 0.1).unwrap());
                }
                for handle in handles {
                    shared.loop_fadeout(handle, 0.0).unwrap();
                }
            })
        };

        let mut out = vec![0i16; 512];
        for _ in 0..16 {
            shared.get_samples(&mut out).unwrap();
        }
        control.join().unwrap();

        // Flush any voices started after the last render
        let mut tail = vec![0i16; crate::BLOCK_FRAMES * 2];
        shared.get_samples(&mut tail).unwrap();
        shared.get_samples(&mut tail).unwrap();
        assert_eq!(shared.stats().unwrap().active_voices, 0);
    }

    #[test]
    fn stale_handle_error_passes_through() {
        let shared = SharedMixer::new(Mixer::default());
        let buffer = BufferHandle::create(1, &[1, 0]).unwrap();
        let handle = shared.add_loop(&buffer, Category::Effects, 1.0).unwrap().unwrap();

        shared.stop_all().unwrap();

        assert!(matches!(
            shared.loop_set_frequency(handle, 2.0),
            Err(MixerError::StaleHandle { .. })
        ));
    }
}
