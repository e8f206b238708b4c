//! Bounded operand stack, max depth 1024.

use crate::machine::VmError;
use crate::word::Word;

pub const STACK_LIMIT: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct OperandStack {
    data: Vec<Word>,
}

impl OperandStack {
    pub fn new() -> Self {
        Self { data: Vec::with_capacity(64) }
    }

    pub fn push(&mut self, item: Word) -> Result<(), VmError> {
        if self.data.len() >= STACK_LIMIT {
            return Err(VmError::StackOverflow);
        }
        self.data.push(item);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<Word, VmError> {
        self.data.pop().ok_or(VmError::StackUnderflow)
    }

    /// Element `i` positions below the top without removing it;
    /// `peek(0)` is the top.
    pub fn peek(&self, i: usize) -> Result<Word, VmError> {
        if i >= self.data.len() {
            return Err(VmError::InvalidIndex(i));
        }
        Ok(self.data[self.data.len() - 1 - i])
    }

    /// Exchange the top with the element `i` positions below it.
    /// `swap(0)` is a no-op.
    pub fn swap(&mut self, i: usize) -> Result<(), VmError> {
        if i == 0 {
            return Ok(());
        }
        if i >= self.data.len() {
            return Err(VmError::StackUnderflow);
        }
        let top = self.data.len() - 1;
        self.data.swap(top, top - i);
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stack contents bottom to top.
    pub fn as_slice(&self) -> &[Word] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_reverse_push_order() {
        let mut s = OperandStack::new();
        for i in 0..10u64 {
            s.push(Word::from(i)).unwrap();
        }
        for i in (0..10u64).rev() {
            assert_eq!(s.pop().unwrap(), Word::from(i));
        }
        assert!(s.is_empty());
    }

    #[test]
    fn overflow_at_limit() {
        let mut s = OperandStack::new();
        for _ in 0..STACK_LIMIT {
            s.push(Word::one()).unwrap();
        }
        assert!(matches!(s.push(Word::one()), Err(VmError::StackOverflow)));
        assert_eq!(s.depth(), STACK_LIMIT);
    }

    #[test]
    fn underflow_on_empty_pop() {
        let mut s = OperandStack::new();
        assert!(matches!(s.pop(), Err(VmError::StackUnderflow)));
    }

    #[test]
    fn peek_does_not_remove() {
        let mut s = OperandStack::new();
        s.push(Word::from(1)).unwrap();
        s.push(Word::from(2)).unwrap();
        assert_eq!(s.peek(0).unwrap(), Word::from(2));
        assert_eq!(s.peek(1).unwrap(), Word::from(1));
        assert!(matches!(s.peek(2), Err(VmError::InvalidIndex(2))));
        assert_eq!(s.depth(), 2);
    }

    #[test]
    fn swap_exchanges_with_top() {
        let mut s = OperandStack::new();
        s.push(Word::from(1)).unwrap();
        s.push(Word::from(2)).unwrap();
        s.push(Word::from(3)).unwrap();
        s.swap(2).unwrap();
        assert_eq!(s.peek(0).unwrap(), Word::from(1));
        assert_eq!(s.peek(2).unwrap(), Word::from(3));
        // swap(0) is a no-op even on an empty stack
        let mut empty = OperandStack::new();
        empty.swap(0).unwrap();
        assert!(matches!(empty.swap(1), Err(VmError::StackUnderflow)));
    }
}
