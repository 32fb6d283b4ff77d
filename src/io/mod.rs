// Purpose - format conversions at the edges of the mixer

pub mod pcm;

pub use pcm::{clip_to_i16, samples_from_bytes, to_f32};
