//! Control surface: starting sounds, steering loops, mixer-wide settings.
//!
//! Every call here runs on a caller thread and takes effect at the next
//! block boundary. Calls that start sounds first release buffers the render
//! path has parked, so freeing memory never happens during a render.

use glam::Vec3;
use tracing::{debug, info};

use super::{Mixer, MusicSource};
use crate::{
    buffer::BufferHandle,
    config::{Category, CompressorConfig},
    dsp::{
        gain::unit,
        resample::{sanitize_ratio, FREQUENCY_EPSILON},
    },
    error::MixerError,
    voice::{LoopHandle, VoiceFlags},
    MIN_TIME,
};

/// Placement of a positional voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Emitter {
    pub position: Vec3,
    /// Full gain at or inside this distance.
    pub min_distance: f32,
    /// Silent at or beyond this distance.
    pub max_distance: f32,
}

impl Emitter {
    pub fn new(position: Vec3, min_distance: f32, max_distance: f32) -> Self {
        Self {
            position,
            min_distance,
            max_distance,
        }
    }
}

impl Mixer {
    /// Play `buffer` once. Returns `false` when no voice was available.
    pub fn add(&mut self, buffer: &BufferHandle, category: Category, gain: f32) -> bool {
        self.start(buffer, category, gain, None, false).is_some()
    }

    /// Play `buffer` once from a point in the world.
    pub fn add_positional(
        &mut self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
        emitter: Emitter,
    ) -> bool {
        self.start(buffer, category, gain, Some(emitter), false)
            .is_some()
    }

    /// Loop `buffer` until removed or faded out.
    pub fn add_loop(
        &mut self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
    ) -> Option<LoopHandle> {
        self.start(buffer, category, gain, None, true)
    }

    pub fn add_loop_positional(
        &mut self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
        emitter: Emitter,
    ) -> Option<LoopHandle> {
        self.start(buffer, category, gain, Some(emitter), true)
    }

    fn start(
        &mut self,
        buffer: &BufferHandle,
        category: Category,
        gain: f32,
        emitter: Option<Emitter>,
        looping: bool,
    ) -> Option<LoopHandle> {
        self.collect_retired();

        let voices = &mut self.state.voices;
        let Some(acquired) = voices.acquire(buffer.shared(), category, gain) else {
            self.state.stats.sounds_dropped += 1;
            debug!(frames = buffer.frames(), looping, "no voice available, sound dropped");
            return None;
        };

        if let Some(evicted) = acquired.evicted {
            self.state.stats.voices_stolen += 1;
            debug!(slot = acquired.slot, "stole voice nearest completion");
            drop(evicted);
        }

        let voice = voices.slot_mut(acquired.slot);
        if let Some(emitter) = emitter {
            voice.flags.insert(VoiceFlags::POSITIONAL);
            voice.position = emitter.position;
            voice.min_distance = emitter.min_distance;
            voice.max_distance = emitter.max_distance;
        }
        if looping {
            voice.flags.insert(VoiceFlags::LOOPING);
        }
        voice.play();

        let handle = voices.handle(acquired.slot);
        debug!(
            slot = handle.slot(),
            generation = handle.generation(),
            looping,
            "voice started"
        );
        Some(handle)
    }

    /// Stop looping and let the voice finish at the next block boundary.
    pub fn remove_loop(&mut self, handle: LoopHandle) -> Result<(), MixerError> {
        let voice = self.state.voices.get_mut(handle)?;
        voice.flags.remove(VoiceFlags::LOOPING);
        voice.cursor = voice.frames();
        debug!(slot = handle.slot(), "loop removed");
        Ok(())
    }

    /// Move a loop's source. A non-positional voice keeps its flat gain.
    pub fn loop_set_position(&mut self, handle: LoopHandle, position: Vec3) -> Result<(), MixerError> {
        self.state.voices.get_mut(handle)?.position = position;
        Ok(())
    }

    pub fn loop_set_gain(&mut self, handle: LoopHandle, gain: f32) -> Result<(), MixerError> {
        self.state.voices.get_mut(handle)?.gain = unit(gain);
        Ok(())
    }

    /// Set the playback speed ratio. Ratios within a small epsilon of 1.0
    /// switch the voice back to the non-resampling path; non-positive ratios
    /// are clamped to a small positive minimum.
    pub fn loop_set_frequency(&mut self, handle: LoopHandle, ratio: f32) -> Result<(), MixerError> {
        let voice = self.state.voices.get_mut(handle)?;
        let ratio = sanitize_ratio(ratio);

        if (ratio - 1.0).abs() < FREQUENCY_EPSILON {
            voice.frequency = 1.0;
            voice.flags.remove(VoiceFlags::PITCH_SHIFTED);
        } else {
            voice.frequency = ratio;
            voice.flags.insert(VoiceFlags::PITCH_SHIFTED);
        }
        Ok(())
    }

    /// Fade the loop to silence over `seconds`, then free it.
    pub fn loop_fadeout(&mut self, handle: LoopHandle, seconds: f32) -> Result<(), MixerError> {
        let sample_rate = self.sample_rate as f32;
        let voice = self.state.voices.get_mut(handle)?;

        voice.fade_rate = voice.gain / (seconds.max(MIN_TIME) * sample_rate);
        voice.flags.insert(VoiceFlags::FADING_OUT);
        debug!(slot = handle.slot(), seconds, "loop fading out");
        Ok(())
    }

    /// Whether `handle` still refers to a playing voice.
    pub fn is_playing(&self, handle: LoopHandle) -> bool {
        self.state.voices.get(handle).is_ok()
    }

    pub fn update_listener(&mut self, position: Vec3) {
        self.state.listener = position;
    }

    pub fn listener(&self) -> Vec3 {
        self.state.listener
    }

    pub fn set_basegain(&mut self, category: Category, gain: f32) {
        self.state.category_gains[category.index()] = unit(gain);
        info!(?category, gain, "category gain changed");
    }

    pub fn set_music_gain(&mut self, gain: f32) {
        self.state.music_gain = unit(gain);
    }

    pub fn set_music(&mut self, source: impl MusicSource + 'static) {
        self.state.music = Some(Box::new(source));
    }

    pub fn clear_music(&mut self) {
        self.state.music = None;
    }

    /// Reconfigure the compressor. Zero time constants mean instantaneous.
    pub fn effects_compressor(
        &mut self,
        thresholds: [f32; 2],
        multipliers: [f32; 2],
        attack_seconds: f32,
        release_seconds: f32,
    ) {
        self.set_compressor(&CompressorConfig {
            thresholds,
            multipliers,
            attack_seconds,
            release_seconds,
        });
    }

    pub fn set_compressor(&mut self, config: &CompressorConfig) {
        self.state.compressor.configure(config, self.sample_rate);
        info!(
            thresholds = ?config.thresholds,
            multipliers = ?config.multipliers,
            attack = config.attack_seconds,
            release = config.release_seconds,
            "compressor configured"
        );
    }

    /// Current compression factor on the fixed-point scale.
    pub fn compression_factor(&self) -> i32 {
        self.state.compressor.factor()
    }

    /// Free every voice immediately. Already rendered carry-over still plays.
    pub fn stop_all(&mut self) {
        self.state.voices.release_all(drop);
        self.collect_retired();
        debug!("all voices stopped");
    }

    /// Drop buffer references the render path has released.
    pub fn collect_retired(&mut self) -> usize {
        self.state.retired.collect()
    }
}
