//! Fixed-point gain.

/*
Quantized Gain
==============

Every gain the mixer applies is carried as an integer in [0, Q] with
Q = GAIN_UNITY = 1024, rather than as a float:

    real gain   0.0    0.25    0.5    1.0
    quantized     0     256    512   1024

Applying it to a sample is one multiply and one divide:

    out = (sample × q) / Q

Integer division truncates toward zero, so a negative sample scaled by
q < Q lands one step closer to zero than floor() would put it. That is part
of the output format: reproducing it exactly is what keeps two renders of
the same scene bit-identical.

The multiply happens in i32. A 16-bit sample times 1024 is at most 2^25, so
there is plenty of headroom; only the compressor, which scales the already
summed accumulator, widens to i64.

Quantization itself truncates as well:

    q = (clamp(gain, 0, 1) × Q) as i32

so 1.0 maps to exactly Q and unity gain is lossless.
*/

use crate::GAIN_UNITY;

/// Map a real gain onto the fixed-point scale, clamping to [0, 1] first.
#[inline]
pub fn quantize(gain: f32) -> i32 {
    (unit(gain) * GAIN_UNITY as f32) as i32
}

/// Clamp a real gain to [0, 1]. NaN counts as silence.
#[inline]
pub fn unit(gain: f32) -> f32 {
    if gain.is_nan() {
        return 0.0;
    }
    gain.clamp(0.0, 1.0)
}

/// Scale one sample by a quantized gain.
#[inline]
pub fn apply(sample: i32, gain: i32) -> i32 {
    sample * gain / GAIN_UNITY
}

/// Quantized left/right gain pair for one voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StereoGain {
    pub left: i32,
    pub right: i32,
}

impl StereoGain {
    pub const UNITY: Self = Self {
        left: GAIN_UNITY,
        right: GAIN_UNITY,
    };

    pub const SILENT: Self = Self { left: 0, right: 0 };

    /// Quantize a real-valued pair, clamping each side to [0, 1].
    pub fn from_real(left: f32, right: f32) -> Self {
        Self {
            left: quantize(left),
            right: quantize(right),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.left == 0 && self.right == 0
    }
}
