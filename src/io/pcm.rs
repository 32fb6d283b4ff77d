//! PCM format conversions.
//!
//! The mixer consumes and produces interleaved signed 16-bit PCM. Decoded
//! assets arrive as raw little-endian bytes, and float device callbacks want
//! f32 in [-1, 1]; these helpers cover both edges plus the final clip from
//! the wide accumulator.

/// Decode little-endian 16-bit PCM bytes into samples.
///
/// A trailing odd byte is ignored; callers validate alignment beforehand.
pub fn samples_from_bytes(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Saturate a wide accumulator sample to the 16-bit output range.
#[inline]
pub fn clip_to_i16(sample: i32) -> i16 {
    sample.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}

/// Convert 16-bit output into floats for hosts that render in f32.
#[inline]
pub fn to_f32(input: &[i16], out: &mut [f32]) {
    debug_assert_eq!(input.len(), out.len());

    for (o, &s) in out.iter_mut().zip(input.iter()) {
        *o = s as f32 / 32768.0;
    }
}
