//! Pull buffer between caller-sized reads and fixed-size render blocks.
//!
//! The mixer always renders exactly [`BLOCK_FRAMES`] at a time. Callers ask
//! for whatever their device callback wants; frames rendered but not yet
//! read stay in the carry-over block for the next call. Because rendering
//! only ever happens in whole blocks, output does not depend on how the
//! caller chunks its reads.

use crate::{io::pcm::clip_to_i16, BLOCK_FRAMES};

pub struct PullBuffer {
    // Interleaved stereo, wide accumulator samples
    block: Box<[i32]>,
    // Frames at the tail of `block` not yet handed out
    unread: usize,
}

impl PullBuffer {
    pub fn new() -> Self {
        Self {
            block: vec![0; BLOCK_FRAMES * 2].into_boxed_slice(),
            unread: 0,
        }
    }

    /// Fill `out` (interleaved stereo i16) with mixed frames.
    ///
    /// Carry-over is drained first; `render` is then invoked on a zeroed
    /// block as many times as needed. A trailing odd sample is not part of
    /// any frame and is set to silence.
    pub fn pull(&mut self, out: &mut [i16], mut render: impl FnMut(&mut [i32])) {
        let total = out.len() / 2;
        if let Some(tail) = out.get_mut(total * 2) {
            *tail = 0;
        }

        let mut written = self.drain(&mut out[..total * 2]);

        while written < total {
            self.block.fill(0);
            render(&mut self.block);
            self.unread = BLOCK_FRAMES;

            written += self.drain(&mut out[written * 2..total * 2]);
        }
    }

    /// Frames rendered but not yet read.
    pub fn unread(&self) -> usize {
        self.unread
    }

    /// Discard the carry-over.
    pub fn clear(&mut self) {
        self.unread = 0;
    }

    fn drain(&mut self, out: &mut [i16]) -> usize {
        let frames = (out.len() / 2).min(self.unread);
        let start = (BLOCK_FRAMES - self.unread) * 2;
        let src = &self.block[start..start + frames * 2];

        for (o, &s) in out[..frames * 2].iter_mut().zip(src) {
            *o = clip_to_i16(s);
        }

        self.unread -= frames;
        frames
    }
}

impl Default for PullBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Renders a ramp that keeps counting across blocks
    fn ramp() -> impl FnMut(&mut [i32]) {
        let mut next = 0;
        move |block: &mut [i32]| {
            for frame in block.chunks_exact_mut(2) {
                frame[0] = next;
                frame[1] = -next;
                next += 1;
            }
        }
    }

    #[test]
    fn small_reads_are_served_from_carry_over() {
        let mut pull = PullBuffer::new();
        let mut renders = 0;
        let mut out = [0i16; 8];

        pull.pull(&mut out, |block| {
            renders += 1;
            block[0] = 7;
        });
        assert_eq!(renders, 1);
        assert_eq!(pull.unread(), BLOCK_FRAMES - 4);
        assert_eq!(out[0], 7);

        pull.pull(&mut out, |_| renders += 1);
        assert_eq!(renders, 1);
        assert_eq!(pull.unread(), BLOCK_FRAMES - 8);
    }

    #[test]
    fn chunking_does_not_change_output() {
        let total = BLOCK_FRAMES * 2 + 300;

        let mut whole = vec![0i16; total * 2];
        PullBuffer::new().pull(&mut whole, ramp());

        let mut pieces = vec![0i16; total * 2];
        let mut pull = PullBuffer::new();
        let mut render = ramp();
        let mut offset = 0;
        for chunk in [1usize, 511, 2048, 37, 1500].iter().cycle() {
            if offset >= total {
                break;
            }
            let frames = (*chunk).min(total - offset);
            pull.pull(&mut pieces[offset * 2..(offset + frames) * 2], &mut render);
            offset += frames;
        }

        assert_eq!(whole, pieces);
    }

    #[test]
    fn output_is_clipped_to_sixteen_bits() {
        let mut pull = PullBuffer::new();
        let mut out = [0i16; 4];

        pull.pull(&mut out, |block| {
            block[0] = 100_000;
            block[1] = -100_000;
            block[2] = 12;
        });

        assert_eq!(out, [i16::MAX, i16::MIN, 12, 0]);
    }

    #[test]
    fn odd_trailing_sample_is_silenced() {
        let mut pull = PullBuffer::new();
        let mut out = [9i16; 5];

        pull.pull(&mut out, |block| block.fill(3));

        assert_eq!(out, [3, 3, 3, 3, 0]);
        assert_eq!(pull.unread(), BLOCK_FRAMES - 2);
    }

    #[test]
    fn clear_forces_a_fresh_block() {
        let mut pull = PullBuffer::new();
        let mut renders = 0;
        let mut out = [0i16; 2];

        pull.pull(&mut out, |_| renders += 1);
        pull.clear();
        pull.pull(&mut out, |_| renders += 1);

        assert_eq!(renders, 2);
    }
}
