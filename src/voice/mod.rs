// Purpose: Voice slots, the fixed-capacity pool and the handles that address it
// This layer sits between the control surface and the dsp kernels

pub mod handle;
pub mod pool;
pub mod slot;

pub use handle::LoopHandle;
pub use pool::{Acquired, VoicePool};
pub use slot::{Voice, VoiceFlags};
