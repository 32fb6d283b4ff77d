//! Demo - device setup and scene driver

use std::time::{Duration, Instant};

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use tracing::{error, info};

use blockmix::{io::to_f32, Category, Emitter, Mixer, MixerConfig, SharedMixer, Vec3};

use super::tones;

/// Largest device callback served without splitting, in frames.
const CALLBACK_FRAMES: usize = 4096;

pub struct Demo {
    seconds: f32,
    orbit_radius: f32,
}

impl Demo {
    pub fn new() -> Self {
        Self {
            seconds: 10.0,
            orbit_radius: 5.0,
        }
    }

    /// How long to play before exiting
    pub fn seconds(mut self, seconds: f32) -> Self {
        self.seconds = seconds;
        self
    }

    /// Distance of the circling hum from the listener
    pub fn orbit_radius(mut self, radius: f32) -> Self {
        self.orbit_radius = radius;
        self
    }

    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;
        if config.sample_format() != cpal::SampleFormat::F32 {
            return Err(eyre!("unsupported sample format {:?}", config.sample_format()));
        }

        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!(sample_rate, channels, "output device ready");

        let mixer = SharedMixer::new(Mixer::new(MixerConfig {
            sample_rate,
            ..Default::default()
        }));
        mixer.effects_compressor([0.6, 0.9], [0.7, 0.4], 0.005, 0.3)?;

        let ping = tones::ping(sample_rate)?;
        let hum = tones::hum(sample_rate)?;

        // Render side: pull stereo i16, widen to f32 and spread to device channels
        let render = mixer.clone();
        let mut pcm = vec![0i16; CALLBACK_FRAMES * 2];
        let mut float = vec![0.0f32; CALLBACK_FRAMES * 2];

        let stream = device.build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                for chunk in data.chunks_mut(CALLBACK_FRAMES * channels) {
                    let frames = chunk.len() / channels;
                    let pcm = &mut pcm[..frames * 2];
                    let float = &mut float[..frames * 2];

                    if render.get_samples(pcm).is_err() {
                        chunk.fill(0.0);
                        continue;
                    }
                    to_f32(pcm, float);

                    for (out, stereo) in chunk.chunks_mut(channels).zip(float.chunks_exact(2)) {
                        for (ch, sample) in out.iter_mut().enumerate() {
                            *sample = stereo[ch.min(1)];
                        }
                    }
                }
            },
            |err| error!("audio stream error: {}", err),
            None,
        )?;
        stream.play()?;

        // Control side: circle the hum around the listener, ping once a second
        let orbit = mixer
            .add_loop_positional(
                &hum,
                Category::Ambience,
                0.8,
                Emitter::new(Vec3::new(self.orbit_radius, 0.0, 0.0), 1.0, self.orbit_radius * 3.0),
            )?
            .ok_or_else(|| eyre!("no voice available for the orbiting loop"))?;

        let start = Instant::now();
        let mut next_ping = Duration::ZERO;
        while start.elapsed().as_secs_f32() < self.seconds {
            let t = start.elapsed().as_secs_f32();
            let angle = t * 0.8;
            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * self.orbit_radius;
            mixer.loop_set_position(orbit, position)?;
            mixer.loop_set_frequency(orbit, 1.0 + 0.1 * (t * 0.5).sin())?;

            if start.elapsed() >= next_ping {
                mixer.add(&ping, Category::Effects, 0.7)?;
                next_ping += Duration::from_secs(1);
            }
            std::thread::sleep(Duration::from_millis(20));
        }

        mixer.loop_fadeout(orbit, 1.0)?;
        std::thread::sleep(Duration::from_millis(1200));

        let stats = mixer.stats()?;
        info!(
            blocks = stats.blocks_rendered,
            stolen = stats.voices_stolen,
            dropped = stats.sounds_dropped,
            "demo finished"
        );
        Ok(())
    }
}

impl Default for Demo {
    fn default() -> Self {
        Self::new()
    }
}
