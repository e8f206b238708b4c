//! Immutable input buffer. Reads past the end yield zero, never fail.

use crate::memory::WORD_SIZE;
use crate::word::{self, Word};

#[derive(Debug, Clone, Default)]
pub struct Calldata {
    data: Vec<u8>,
}

impl Calldata {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn read_byte(&self, index: u64) -> u8 {
        self.data.get(index as usize).copied().unwrap_or(0)
    }

    /// 32 bytes starting at `offset` as a big-endian word, zero-padded
    /// past the end of the buffer.
    pub fn read_word(&self, offset: u64) -> Word {
        let mut buf = [0u8; WORD_SIZE];
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_byte(offset.saturating_add(i as u64));
        }
        word::from_be_bytes(&buf)
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_byte_past_end_is_zero() {
        let c = Calldata::new(vec![0x01, 0x02]);
        assert_eq!(c.read_byte(0), 0x01);
        assert_eq!(c.read_byte(1), 0x02);
        assert_eq!(c.read_byte(2), 0);
        assert_eq!(c.read_byte(u64::MAX), 0);
    }

    #[test]
    fn read_word_zero_pads_tail() {
        let c = Calldata::new(vec![0xff; 4]);
        let w = c.read_word(2);
        // two data bytes followed by 30 zeros
        let mut expected = [0u8; 32];
        expected[0] = 0xff;
        expected[1] = 0xff;
        assert_eq!(w, word::from_be_bytes(&expected));
    }

    #[test]
    fn read_word_entirely_past_end() {
        let c = Calldata::new(vec![0xff; 4]);
        assert_eq!(c.read_word(100), Word::zero());
        assert_eq!(c.read_word(u64::MAX), Word::zero());
    }

    #[test]
    fn size_is_exact() {
        assert_eq!(Calldata::default().size(), 0);
        assert_eq!(Calldata::new(vec![0; 5]).size(), 5);
    }
}
