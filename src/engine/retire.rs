//! Hand-off of released buffer references from the render side.
//!
//! Dropping the last `Arc<AudioBuffer>` frees the samples, which must not
//! happen inside a render call. Voices freed during rendering push their
//! reference into a preallocated ring instead; control calls pop and drop
//! them later.

use std::sync::Arc;

use rtrb::{Consumer, Producer, RingBuffer};
use tracing::warn;

use crate::{buffer::AudioBuffer, MAX_VOICES};

/// Enough for several blocks' worth of culled voices between control calls.
const RETIRE_CAPACITY: usize = MAX_VOICES * 4;

pub struct RetireQueue {
    tx: Producer<Arc<AudioBuffer>>,
    rx: Consumer<Arc<AudioBuffer>>,
}

impl RetireQueue {
    pub fn new() -> Self {
        let (tx, rx) = RingBuffer::new(RETIRE_CAPACITY);
        Self { tx, rx }
    }

    /// Park a released reference. Never allocates.
    pub fn retire(&mut self, buffer: Arc<AudioBuffer>) {
        if let Err(rtrb::PushError::Full(buffer)) = self.tx.push(buffer) {
            warn!(capacity = RETIRE_CAPACITY, "retire queue full, releasing buffer in place");
            drop(buffer);
        }
    }

    /// Drop every parked reference. Returns how many were released.
    pub fn collect(&mut self) -> usize {
        let mut released = 0;
        while let Ok(buffer) = self.rx.pop() {
            drop(buffer);
            released += 1;
        }
        released
    }

    pub fn pending(&self) -> usize {
        self.rx.slots()
    }
}

impl Default for RetireQueue {
    fn default() -> Self {
        Self::new()
    }
}
