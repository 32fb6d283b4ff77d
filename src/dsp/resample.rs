//! Per-voice accumulation into the stereo mix buffer.

/*
Voice Accumulation
==================

Each block, every playing voice ADDS its contribution into one shared
accumulator of interleaved stereo i32 frames:

    accum: [L0, R0, L1, R1, ... L(N-1), R(N-1)]

The accumulator is wider than the output so 32 voices can sum past 16-bit
full scale; the compressor and the final clip deal with that later.


Direct Path
-----------

With no pitch shift, input frame `cursor + i` lands on output frame `i`:

    L[i] += left(cursor + i)  × gL / Q
    R[i] += right(cursor + i) × gR / Q

A mono source feeds the same sample to both sides (each with its own
gain). The cursor advances by the number of frames consumed.


Resampled Path
--------------

With a frequency ratio r, output frame i reads the fractional input
position

    pos = i × r

relative to the cursor. The two neighbouring input frames are blended by
the fractional part, expressed on the same Q scale as gain:

    frac = (pos − floor(pos)) × Q
    s    = s0 + (s1 − s0) × frac / Q

    r = 0.5:  pos  0.0  0.5  1.0  1.5  2.0 ...    (half speed, octave down)
    r = 2.0:  pos  0.0  2.0  4.0  6.0 ...          (double speed, octave up)

The number of output frames a window of `avail` input frames can feed is
avail / r, rounded UP: the last step whose start still lies inside the
window gets rendered instead of being dropped.

    avail = 5, r = 2.0   →   positions 0, 2, 4   →   3 frames (not 2)

The cursor stays integral. When a block ends mid-window, it advances by
floor(n × r) and the fractional phase restarts with the next block.


End of Buffer
-------------

Looping voices wrap to frame 0 and keep filling in the same call, so a
short loop may be consumed several times in one block. One-shot voices stop
early and leave the rest of the region to the other voices.
*/

use crate::{
    dsp::gain::{apply, StereoGain},
    voice::{Voice, VoiceFlags},
    GAIN_UNITY,
};

/// Frequency ratios closer than this to 1.0 take the direct path.
pub const FREQUENCY_EPSILON: f32 = 1e-3;

/// Lowest frequency ratio the kernel accepts; anything smaller is clamped.
pub const MIN_FREQUENCY_RATIO: f32 = 1.0 / GAIN_UNITY as f32;

/// Highest frequency ratio the kernel accepts, infinity included.
pub const MAX_FREQUENCY_RATIO: f32 = GAIN_UNITY as f32;

/// Clamp a requested ratio to the supported range. NaN means no shift.
#[inline]
pub fn sanitize_ratio(ratio: f32) -> f32 {
    if ratio.is_nan() {
        return 1.0;
    }
    ratio.clamp(MIN_FREQUENCY_RATIO, MAX_FREQUENCY_RATIO)
}

/// Add one voice's contribution to `accum` (interleaved stereo).
///
/// Returns the number of frames written, which is less than the region when
/// a one-shot voice runs out of samples.
pub fn mix_voice(voice: &mut Voice, accum: &mut [i32], gain: StereoGain) -> usize {
    if voice.flags.contains(VoiceFlags::PITCH_SHIFTED) {
        let ratio = sanitize_ratio(voice.frequency) as f64;
        mix_resampled(voice, accum, gain, ratio)
    } else {
        mix_direct(voice, accum, gain)
    }
}

/// Direct copy path: one input frame per output frame.
pub fn mix_direct(voice: &mut Voice, accum: &mut [i32], gain: StereoGain) -> usize {
    let Some(buffer) = voice.buffer.as_ref() else {
        return 0;
    };
    let frames = buffer.frames();
    let stereo = buffer.is_stereo();
    let samples = buffer.samples();
    let requested = accum.len() / 2;
    let looping = voice.flags.contains(VoiceFlags::LOOPING);

    let mut written = 0;
    while written < requested && frames > 0 {
        if voice.cursor >= frames {
            if !looping {
                break;
            }
            voice.cursor = 0;
        }

        let count = (frames - voice.cursor).min(requested - written);
        let out = &mut accum[written * 2..(written + count) * 2];

        if stereo {
            let src = &samples[voice.cursor * 2..(voice.cursor + count) * 2];
            for (o, s) in out.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
                o[0] += apply(s[0] as i32, gain.left);
                o[1] += apply(s[1] as i32, gain.right);
            }
        } else {
            let src = &samples[voice.cursor..voice.cursor + count];
            for (o, &s) in out.chunks_exact_mut(2).zip(src) {
                o[0] += apply(s as i32, gain.left);
                o[1] += apply(s as i32, gain.right);
            }
        }

        voice.cursor += count;
        written += count;
    }

    written
}

/// Linear-interpolation path for a frequency ratio other than 1.0.
pub fn mix_resampled(voice: &mut Voice, accum: &mut [i32], gain: StereoGain, ratio: f64) -> usize {
    let Some(buffer) = voice.buffer.as_ref() else {
        return 0;
    };
    let frames = buffer.frames();
    let channels = buffer.channels() as usize;
    let samples = buffer.samples();
    let requested = accum.len() / 2;
    let looping = voice.flags.contains(VoiceFlags::LOOPING);

    let mut written = 0;
    while written < requested && frames > 0 {
        if voice.cursor >= frames {
            if !looping {
                break;
            }
            voice.cursor = 0;
        }

        let avail = frames - voice.cursor;
        let producible = output_frames(avail, ratio);
        let count = producible.min(requested - written);
        if count == 0 {
            break;
        }

        for i in 0..count {
            let pos = i as f64 * ratio;
            let whole = pos.floor();
            let idx = voice.cursor + whole as usize;
            let frac = ((pos - whole) * GAIN_UNITY as f64) as i32;

            // Ceil neighbour: wraps for loops, holds the last frame otherwise
            let next = if idx + 1 < frames {
                idx + 1
            } else if looping {
                0
            } else {
                idx
            };

            let out = &mut accum[(written + i) * 2..(written + i) * 2 + 2];
            for (side, o) in out.iter_mut().enumerate() {
                let ch = side.min(channels - 1);
                let s0 = samples[idx * channels + ch] as i32;
                let s1 = samples[next * channels + ch] as i32;
                let s = s0 + (s1 - s0) * frac / GAIN_UNITY;
                *o += apply(s, if side == 0 { gain.left } else { gain.right });
            }
        }

        if count == producible {
            voice.cursor = frames;
        } else {
            voice.cursor = (voice.cursor + (count as f64 * ratio) as usize).min(frames);
        }
        written += count;
    }

    written
}

/// Output frames a window of `avail` input frames yields at `ratio`.
#[inline]
fn output_frames(avail: usize, ratio: f64) -> usize {
    let exact = avail as f64 / ratio;
    let mut frames = exact as usize;
    if (frames as f64) * ratio < avail as f64 {
        frames += 1;
    }
    frames
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{buffer::AudioBuffer, config::Category};

    fn voice_with(channels: u16, samples: Vec<i16>, flags: VoiceFlags) -> Voice {
        let buffer = Arc::new(AudioBuffer::from_samples(channels, samples).unwrap());
        let mut voice = Voice::new();
        voice.bind(buffer, Category::Effects, 1.0);
        voice.flags.insert(flags);
        voice.play();
        voice
    }

    #[test]
    fn mono_is_duplicated_to_both_sides() {
        let mut voice = voice_with(1, vec![100, -100, 100, -100], VoiceFlags::empty());
        let mut accum = [0i32; 8];

        let written = mix_direct(&mut voice, &mut accum, StereoGain::UNITY);

        assert_eq!(written, 4);
        assert_eq!(accum, [100, 100, -100, -100, 100, 100, -100, -100]);
        assert!(voice.at_end());
    }

    #[test]
    fn stereo_keeps_channels_apart() {
        let mut voice = voice_with(2, vec![10, 20, 30, 40], VoiceFlags::empty());
        let mut accum = [0i32; 4];

        mix_direct(&mut voice, &mut accum, StereoGain { left: 512, right: 1024 });

        assert_eq!(accum, [5, 20, 15, 40]);
    }

    #[test]
    fn contributions_add_to_existing_mix() {
        let mut voice = voice_with(1, vec![7, 7], VoiceFlags::empty());
        let mut accum = [1i32; 4];

        mix_direct(&mut voice, &mut accum, StereoGain::UNITY);

        assert_eq!(accum, [8, 8, 8, 8]);
    }

    #[test]
    fn one_shot_stops_early_and_leaves_the_rest() {
        let mut voice = voice_with(1, vec![5, 5], VoiceFlags::empty());
        let mut accum = [0i32; 8];

        let written = mix_direct(&mut voice, &mut accum, StereoGain::UNITY);

        assert_eq!(written, 2);
        assert_eq!(accum, [5, 5, 5, 5, 0, 0, 0, 0]);
    }

    #[test]
    fn loop_wraps_more_than_once_per_block() {
        let mut voice = voice_with(1, vec![1, 2, 3], VoiceFlags::LOOPING);
        let mut accum = [0i32; 16];

        let written = mix_direct(&mut voice, &mut accum, StereoGain::UNITY);

        assert_eq!(written, 8);
        let left: Vec<i32> = accum.iter().step_by(2).copied().collect();
        assert_eq!(left, vec![1, 2, 3, 1, 2, 3, 1, 2]);
        assert_eq!(voice.cursor(), 2);
    }

    #[test]
    fn unit_ratio_matches_direct_path() {
        let samples: Vec<i16> = (0..64).map(|i| (i * 523 % 2000 - 1000) as i16).collect();
        let gain = StereoGain { left: 700, right: 300 };

        let mut direct = voice_with(1, samples.clone(), VoiceFlags::empty());
        let mut shifted = voice_with(1, samples, VoiceFlags::empty());
        let mut a = [0i32; 96];
        let mut b = [0i32; 96];

        let wa = mix_direct(&mut direct, &mut a, gain);
        let wb = mix_resampled(&mut shifted, &mut b, gain, 1.0);

        assert_eq!(wa, wb);
        assert_eq!(a, b);
        assert_eq!(direct.cursor(), shifted.cursor());
    }

    #[test]
    fn half_ratio_interpolates_midpoints() {
        let mut voice = voice_with(1, vec![0, 100, 200], VoiceFlags::empty());
        let mut accum = [0i32; 12];

        let written = mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, 0.5);

        assert_eq!(written, 6);
        let left: Vec<i32> = accum.iter().step_by(2).copied().collect();
        // last frame holds rather than reading past the end
        assert_eq!(left, vec![0, 50, 100, 150, 200, 200]);
        assert!(voice.at_end());
    }

    #[test]
    fn double_ratio_rounds_up_partial_step() {
        let mut voice = voice_with(1, vec![1, 2, 3, 4, 5], VoiceFlags::empty());
        let mut accum = [0i32; 10];

        let written = mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, 2.0);

        assert_eq!(written, 3);
        let left: Vec<i32> = accum.iter().step_by(2).copied().collect();
        assert_eq!(left, vec![1, 3, 5, 0, 0]);
    }

    #[test]
    fn resampled_loop_wraps_within_block() {
        let mut voice = voice_with(1, vec![10, 20, 30, 40], VoiceFlags::LOOPING);
        let mut accum = [0i32; 8];

        let written = mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, 2.0);

        assert_eq!(written, 4);
        let left: Vec<i32> = accum.iter().step_by(2).copied().collect();
        assert_eq!(left, vec![10, 30, 10, 30]);
    }

    #[test]
    fn block_boundary_advances_cursor_by_consumed_input() {
        let mut voice = voice_with(1, vec![0; 100], VoiceFlags::empty());
        let mut accum = [0i32; 20];

        mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, 1.5);

        assert_eq!(voice.cursor(), 15);
    }

    #[test]
    fn dispatch_follows_pitch_flag() {
        let mut voice = voice_with(1, vec![0, 100, 200, 300], VoiceFlags::PITCH_SHIFTED);
        voice.frequency = 0.5;
        let mut accum = [0i32; 4];

        mix_voice(&mut voice, &mut accum, StereoGain::UNITY);

        assert_eq!(accum, [0, 0, 50, 50]);
    }

    #[test]
    fn ratio_is_clamped_positive() {
        assert_eq!(sanitize_ratio(0.0), MIN_FREQUENCY_RATIO);
        assert_eq!(sanitize_ratio(-3.0), MIN_FREQUENCY_RATIO);
        assert_eq!(sanitize_ratio(f32::NAN), 1.0);
        assert_eq!(sanitize_ratio(2.0), 2.0);
        assert_eq!(sanitize_ratio(f32::INFINITY), MAX_FREQUENCY_RATIO);
        assert_eq!(sanitize_ratio(f32::NEG_INFINITY), MIN_FREQUENCY_RATIO);
    }

    #[test]
    fn extreme_ratio_still_fills_the_block() {
        let mut voice = voice_with(1, vec![10, 20, 30, 40], VoiceFlags::LOOPING);
        let mut accum = [0i32; 8];

        let written = mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, MAX_FREQUENCY_RATIO as f64);

        // Each wrap yields one frame from the loop start
        assert_eq!(written, 4);
        assert_eq!(accum, [10; 8]);
    }

    #[test]
    fn non_finite_ratio_returns_instead_of_spinning() {
        let mut voice = voice_with(1, vec![10, 20, 30, 40], VoiceFlags::LOOPING);
        let mut accum = [0i32; 8];

        let written = mix_resampled(&mut voice, &mut accum, StereoGain::UNITY, f64::INFINITY);

        assert!(written <= 4);
    }
}
