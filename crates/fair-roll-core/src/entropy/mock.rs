//! Mock entropy source for testing.

use super::traits::EntropySource;
use crate::error::EntropyError;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MockState {
    queued: VecDeque<u8>,
    consumed: usize,
}

/// Scripted entropy source
///
/// Serves queued bytes in order and fails once the script runs dry. Clones
/// share the same queue, so a test can keep one handle to inspect consumption
/// after moving another into the protocol.
#[derive(Clone, Debug, Default)]
pub struct MockEntropy {
    state: Arc<Mutex<MockState>>,
}

impl MockEntropy {
    /// Create an empty mock; every draw fails until bytes are queued
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock preloaded with raw bytes
    pub fn with_bytes(bytes: &[u8]) -> Self {
        let mock = Self::new();
        mock.push_bytes(bytes);
        mock
    }

    /// Queue raw bytes
    pub fn push_bytes(&self, bytes: &[u8]) {
        self.lock().queued.extend(bytes.iter().copied());
    }

    /// Queue a 32-bit sample in the byte order the bounded generator reads
    pub fn push_sample(&self, sample: u32) {
        self.push_bytes(&sample.to_le_bytes());
    }

    /// Queue a 32-byte secret key
    pub fn push_key(&self, key: [u8; 32]) {
        self.push_bytes(&key);
    }

    /// Total bytes handed out so far
    pub fn consumed(&self) -> usize {
        self.lock().consumed
    }

    /// Bytes still queued
    pub fn remaining(&self) -> usize {
        self.lock().queued.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl EntropySource for MockEntropy {
    fn fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        let wanted = dest.len();
        let mut state = self.lock();
        if state.queued.len() < wanted {
            return Err(EntropyError(format!(
                "mock exhausted: wanted {} bytes, {} queued",
                wanted,
                state.queued.len()
            )));
        }

        for (slot, byte) in dest.iter_mut().zip(state.queued.drain(..wanted)) {
            *slot = byte;
        }
        state.consumed += wanted;
        Ok(())
    }
}
