/// Token for controlling a looping voice after it has started.
///
/// Carries the slot index together with the slot's generation at the time
/// the voice was acquired. Every acquisition bumps the generation, so a
/// handle kept past the end of its sound is rejected instead of steering
/// whatever now occupies the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoopHandle {
    slot: u16,
    generation: u32,
}

impl LoopHandle {
    pub(crate) fn new(slot: usize, generation: u32) -> Self {
        Self {
            slot: slot as u16,
            generation,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot as usize
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}
