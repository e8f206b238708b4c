//! Persistent key-value storage. Absent slots read as zero; writes always
//! succeed. No transactional semantics — the engine never rolls it back.

use std::collections::HashMap;

use crate::word::Word;

#[derive(Debug, Clone, Default)]
pub struct PersistentStorage {
    data: HashMap<Word, Word>,
}

impl PersistentStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Word) -> Word {
        self.data.get(&slot).copied().unwrap_or_default()
    }

    pub fn put(&mut self, slot: Word, value: Word) {
        self.data.insert(slot, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Word, &Word)> {
        self.data.iter()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_slot_reads_zero() {
        let s = PersistentStorage::new();
        assert_eq!(s.get(Word::from(42)), Word::zero());
    }

    #[test]
    fn put_then_get_round_trips() {
        let mut s = PersistentStorage::new();
        s.put(Word::from(1), Word::from(0xdead));
        assert_eq!(s.get(Word::from(1)), Word::from(0xdead));
        s.put(Word::from(1), Word::from(0xbeef));
        assert_eq!(s.get(Word::from(1)), Word::from(0xbeef));
    }

    #[test]
    fn zero_writes_are_stored() {
        let mut s = PersistentStorage::new();
        s.put(Word::from(7), Word::zero());
        assert_eq!(s.get(Word::from(7)), Word::zero());
        assert_eq!(s.len(), 1);
    }
}
