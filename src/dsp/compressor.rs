use crate::{config::CompressorConfig, dsp::gain::quantize, GAIN_UNITY};

/*
Block Compressor
================

The summed accumulator can exceed 16-bit full scale when many voices play
at once. Rather than let the final clip flatten every peak, the mixer runs
one adaptive compressor over each whole block before clipping.

Vocabulary
----------

  peak          Largest absolute sample value in the block (both channels).

  tier          A (threshold, multiplier) pair. Above the higher threshold
                the harsher multiplier applies; above the lower one the
                milder; below both, no compression.

  factor        The compressor's current multiplier on the Q scale.
                Q (1024) means bypass. It never exceeds Q, so the
                compressor can only ever reduce level.

  attack        How fast the factor tightens toward a lower target.
  release       How fast it loosens back toward Q.


Per Block
---------

    1. peak   = max |sample|
    2. target = tier multiplier for that peak (or Q)
    3. factor moves toward target:

         tightening:  factor -= attack_step   (not past target)
         loosening:   factor += release_step  (not past target)

       Rates are quantized units per 1000 frames, scaled by the block:

         step = rate × frames / 1000

       A zero time constant means instantaneous: the target is adopted at
       once. The factor is clamped to [hardest multiplier, Q].

    4. while factor < Q, each channel runs a one-pole smoother:

         out = last + (in − last) × factor / Q
         last = out

       `last` persists across blocks, so there is no step in the signal
       when compression engages or lets go between blocks. At factor == Q
       the block passes untouched and `last` is left alone.

The smoother is computed in i64: the accumulator difference times Q can
exceed i32 with a full complement of loud voices.
*/

/// Frame count used as the unit for attack/release rates.
const RATE_FRAMES: i64 = 1000;

pub struct Compressor {
    // Tiers ordered by threshold, low tier first
    thresholds: [i32; 2],
    multipliers: [i32; 2],
    // Quantized units per RATE_FRAMES; None means instantaneous
    attack_rate: Option<i64>,
    release_rate: Option<i64>,

    factor: i32,
    last: [i32; 2],
}

impl Compressor {
    pub fn new(config: &CompressorConfig, sample_rate: u32) -> Self {
        let mut compressor = Self {
            thresholds: [i32::MAX; 2],
            multipliers: [GAIN_UNITY; 2],
            attack_rate: None,
            release_rate: None,
            factor: GAIN_UNITY,
            last: [0; 2],
        };
        compressor.configure(config, sample_rate);
        compressor
    }

    /// Replace thresholds, multipliers and time constants.
    ///
    /// The current factor and smoothing state carry over so a live change
    /// does not click.
    pub fn configure(&mut self, config: &CompressorConfig, sample_rate: u32) {
        let mut tiers = [
            (threshold_level(config.thresholds[0]), quantize(config.multipliers[0])),
            (threshold_level(config.thresholds[1]), quantize(config.multipliers[1])),
        ];
        tiers.sort_by_key(|&(threshold, _)| threshold);

        self.thresholds = [tiers[0].0, tiers[1].0];
        self.multipliers = [tiers[0].1, tiers[1].1];
        self.attack_rate = rate_per_thousand(config.attack_seconds, sample_rate);
        self.release_rate = rate_per_thousand(config.release_seconds, sample_rate);
        self.factor = self.factor.clamp(self.floor(), GAIN_UNITY);
    }

    /// Compress one interleaved stereo block in place.
    pub fn process(&mut self, block: &mut [i32]) {
        let frames = (block.len() / 2) as i64;
        let peak = block.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0);

        let target = self.target_for(peak);
        self.advance(target, frames);

        if self.factor >= GAIN_UNITY {
            return;
        }

        let factor = self.factor as i64;
        for frame in block.chunks_exact_mut(2) {
            for (sample, last) in frame.iter_mut().zip(self.last.iter_mut()) {
                let prev = *last as i64;
                let smoothed = prev + (*sample as i64 - prev) * factor / GAIN_UNITY as i64;
                *sample = smoothed as i32;
                *last = *sample;
            }
        }
    }

    /// Current compression factor on the Q scale.
    pub fn factor(&self) -> i32 {
        self.factor
    }

    pub fn is_active(&self) -> bool {
        self.factor < GAIN_UNITY
    }

    /// Forget the smoothing history and return to bypass.
    pub fn reset(&mut self) {
        self.factor = GAIN_UNITY;
        self.last = [0; 2];
    }

    fn target_for(&self, peak: u32) -> i32 {
        if peak > self.thresholds[1] as u32 {
            self.multipliers[1]
        } else if peak > self.thresholds[0] as u32 {
            self.multipliers[0]
        } else {
            GAIN_UNITY
        }
    }

    fn advance(&mut self, target: i32, frames: i64) {
        if target < self.factor {
            self.factor = match self.attack_rate {
                Some(rate) => (self.factor - step(rate, frames)).max(target),
                None => target,
            };
        } else if target > self.factor {
            self.factor = match self.release_rate {
                Some(rate) => (self.factor + step(rate, frames)).min(target),
                None => target,
            };
        }
        self.factor = self.factor.clamp(self.floor(), GAIN_UNITY);
    }

    // Hardest multiplier either tier can ask for
    fn floor(&self) -> i32 {
        self.multipliers[0].min(self.multipliers[1])
    }
}

/// Threshold as an absolute accumulator level. 1.0 is 16-bit full scale.
fn threshold_level(fraction: f32) -> i32 {
    if fraction.is_nan() {
        return i32::MAX;
    }
    (fraction.max(0.0) as f64 * i16::MAX as f64).min(i32::MAX as f64) as i32
}

/// Units per 1000 frames for a full Q swing over `seconds`.
fn rate_per_thousand(seconds: f32, sample_rate: u32) -> Option<i64> {
    if seconds.is_nan() || seconds <= 0.0 {
        return None;
    }
    let frames = seconds as f64 * sample_rate as f64;
    Some((GAIN_UNITY as f64 * RATE_FRAMES as f64 / frames).max(1.0) as i64)
}

#[inline]
fn step(rate: i64, frames: i64) -> i32 {
    (rate * frames / RATE_FRAMES).clamp(1, GAIN_UNITY as i64) as i32
}
