//! Byte-addressable linear memory. Grows in 32-byte words, never shrinks,
//! and new bytes are always zero. Reads past the current size also grow the
//! buffer, matching the reference cost-accounting behavior.

use crate::word::{self, Word};

pub const WORD_SIZE: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct LinearMemory {
    data: Vec<u8>,
}

impl LinearMemory {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    /// Grow so that byte `offset` is addressable, rounded up to the next
    /// multiple of 32. No-op if already covered.
    fn expand_if_needed(&mut self, offset: usize) {
        if offset < self.data.len() {
            return;
        }
        let words_after = (offset + 1).div_ceil(WORD_SIZE);
        self.data.resize(words_after * WORD_SIZE, 0);
    }

    pub fn store_byte(&mut self, offset: usize, value: u8) {
        self.expand_if_needed(offset);
        self.data[offset] = value;
    }

    pub fn store_word(&mut self, offset: usize, value: Word) {
        self.expand_if_needed(offset + WORD_SIZE - 1);
        self.data[offset..offset + WORD_SIZE].copy_from_slice(&word::to_be_bytes(value));
    }

    /// Copy of `length` bytes starting at `offset`. Expands first, so the
    /// returned bytes always exist (zero where untouched).
    pub fn load_range(&mut self, offset: usize, length: usize) -> Vec<u8> {
        if length == 0 {
            return Vec::new();
        }
        self.expand_if_needed(offset + length - 1);
        self.data[offset..offset + length].to_vec()
    }

    pub fn load_word(&mut self, offset: usize) -> Word {
        word::from_be_bytes(&self.load_range(offset, WORD_SIZE))
    }

    /// Number of 32-byte words currently active.
    pub fn active_words(&self) -> usize {
        self.data.len() / WORD_SIZE
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
