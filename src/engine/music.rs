/// External music stream mixed into every block.
///
/// The mixer treats music as opaque: once per block the source receives the
/// interleaved stereo accumulator and the quantized music gain, and adds
/// its own samples in. It runs on the render thread, so implementations
/// must not block or allocate.
pub trait MusicSource: Send {
    fn mix_into(&mut self, block: &mut [i32], gain: i32);
}

impl<F> MusicSource for F
where
    F: FnMut(&mut [i32], i32) + Send,
{
    fn mix_into(&mut self, block: &mut [i32], gain: i32) {
        self(block, gain)
    }
}
