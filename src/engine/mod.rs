//! The mixer instance: render path and block scheduling.
//!
//! A [`Mixer`] owns all mixer state explicitly. There is no global: create
//! one with [`Mixer::new`], drive it with [`Mixer::get_samples`] from the
//! audio thread, and drop it (or call [`Mixer::shutdown`]) to tear down.
//! The control surface lives in `control.rs`; cross-thread use goes
//! through [`SharedMixer`].

mod control;
pub mod music;
pub mod retire;
pub mod scheduler;
pub mod shared;

use glam::Vec3;
use tracing::info;

pub use control::Emitter;
pub use music::MusicSource;
pub use shared::SharedMixer;

use self::{retire::RetireQueue, scheduler::PullBuffer};
use crate::{
    config::MixerConfig,
    dsp::{
        compressor::Compressor,
        gain::{quantize, unit},
        resample, spatial,
    },
    voice::VoicePool,
    BLOCK_FRAMES, CATEGORY_COUNT,
};

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixerStats {
    pub active_voices: usize,
    pub voices_stolen: u64,
    pub sounds_dropped: u64,
    pub blocks_rendered: u64,
}

/// Everything one render block reads or writes.
pub(crate) struct MixerState {
    pub(crate) listener: Vec3,
    pub(crate) category_gains: [f32; CATEGORY_COUNT],
    pub(crate) music_gain: f32,
    pub(crate) music: Option<Box<dyn MusicSource>>,
    pub(crate) compressor: Compressor,
    pub(crate) voices: VoicePool,
    pub(crate) retired: RetireQueue,
    pub(crate) stats: MixerStats,
}

impl MixerState {
    /// Render one full block into a zeroed accumulator.
    ///
    /// Voices, then music, then the compressor over the whole block, then
    /// the lifecycle pass. Touches only preallocated state.
    fn render_block(&mut self, block: &mut [i32]) {
        let listener = self.listener;

        for voice in self.voices.iter_mut().filter(|v| v.is_playing()) {
            let category_gain = self.category_gains[voice.category().index()];
            let gain = spatial::voice_gain(listener, voice, category_gain);
            resample::mix_voice(voice, block, gain);
        }

        if let Some(music) = self.music.as_mut() {
            music.mix_into(block, quantize(self.music_gain));
        }

        self.compressor.process(block);

        self.voices
            .cull(BLOCK_FRAMES, |buffer| self.retired.retire(buffer));
        self.stats.blocks_rendered += 1;
    }
}

pub struct Mixer {
    sample_rate: u32,
    state: MixerState,
    pull: PullBuffer,
}

impl Mixer {
    pub fn new(config: MixerConfig) -> Self {
        info!(
            sample_rate = config.sample_rate,
            block_frames = BLOCK_FRAMES,
            "mixer initialised"
        );

        Self {
            sample_rate: config.sample_rate.max(1),
            state: MixerState {
                listener: Vec3::ZERO,
                category_gains: config.category_gains.map(unit),
                music_gain: unit(config.music_gain),
                music: None,
                compressor: Compressor::new(&config.compressor, config.sample_rate.max(1)),
                voices: VoicePool::new(),
                retired: RetireQueue::new(),
                stats: MixerStats::default(),
            },
            pull: PullBuffer::new(),
        }
    }

    /// Install the music stream at construction time.
    pub fn with_music(mut self, source: impl MusicSource + 'static) -> Self {
        self.set_music(source);
        self
    }

    /// Produce interleaved stereo 16-bit PCM into `out`.
    ///
    /// `out` should hold whole frames. If its length is odd, the last
    /// sample is written as silence and does not consume mixer output.
    ///
    /// Realtime entry point: no allocation, no locking, bounded work.
    /// Control changes made since the previous block take effect at the
    /// next block boundary.
    pub fn get_samples(&mut self, out: &mut [i16]) {
        let Self { state, pull, .. } = self;
        pull.pull(out, |block| state.render_block(block));
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn stats(&self) -> MixerStats {
        MixerStats {
            active_voices: self.state.voices.active_count(),
            ..self.state.stats
        }
    }

    /// Release every voice and any parked buffers.
    pub fn shutdown(mut self) {
        self.stop_all();
        info!(
            blocks_rendered = self.state.stats.blocks_rendered,
            "mixer shut down"
        );
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new(MixerConfig::default())
    }
}
