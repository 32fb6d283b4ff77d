//! Listener-relative gain and pan for positional voices.

/*
Distance and Pan
================

Both laws are deliberately simple linear approximations, not physically
normalized ones.

Distance: linear falloff between the voice's min and max distance.

    gain
     1.0 ────────╲
                  ╲
                   ╲
     0.0            ╲──────────
         0      min      max     d

    distance_gain = clamp(1 − (d − min) / (max − min), 0, 1)

Pan: the lateral component of the unit vector from listener to voice,

    pan = (P.x − L.x) / d        ∈ [-1, 1]

scaled by a fixed speaker separation k = 1 / (4√2) ≈ 0.1768:

    left  = distance_gain × (1 − pan × k)
    right = distance_gain × (1 + pan × k)

A voice straight ahead gets equal sides; a voice hard right gets ~1.18 on
the right and ~0.82 on the left before the final clamp to [0, 1].

When the voice sits on the listener (d below a small epsilon) the direction
is undefined, so both sides get full gain.
*/

use glam::Vec3;

use crate::{
    dsp::gain::StereoGain,
    voice::{Voice, VoiceFlags},
};

/// Lateral pan scale, 1 / (4√2).
pub const SPEAKER_SEPARATION: f32 = 0.176_776_7;

/// Distances below this skip attenuation and pan.
pub const DISTANCE_EPSILON: f32 = 1e-4;

/// Real-valued (left, right) attenuation for a source at `position`.
pub fn attenuation(
    listener: Vec3,
    position: Vec3,
    min_distance: f32,
    max_distance: f32,
) -> (f32, f32) {
    let offset = position - listener;
    let distance = offset.length();
    if distance < DISTANCE_EPSILON {
        return (1.0, 1.0);
    }

    let range = max_distance - min_distance;
    let distance_gain = if range > 0.0 {
        (1.0 - (distance - min_distance) / range).clamp(0.0, 1.0)
    } else if distance <= min_distance {
        1.0
    } else {
        0.0
    };

    let pan = offset.x / distance;
    (
        distance_gain * (1.0 + pan * -SPEAKER_SEPARATION),
        distance_gain * (1.0 + pan * SPEAKER_SEPARATION),
    )
}

/// Final quantized stereo gain for one voice.
///
/// category gain × instance gain × (distance/pan attenuation for positional
/// voices), clamped to [0, 1] per side.
pub fn voice_gain(listener: Vec3, voice: &Voice, category_gain: f32) -> StereoGain {
    let base = category_gain * voice.gain;

    if voice.flags.contains(VoiceFlags::POSITIONAL) {
        let (left, right) = attenuation(
            listener,
            voice.position,
            voice.min_distance,
            voice.max_distance,
        );
        StereoGain::from_real(base * left, base * right)
    } else {
        StereoGain::from_real(base, base)
    }
}
