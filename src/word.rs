//! Thin adapter over `primitive_types::U256`, the VM's native word.

use primitive_types::{U256, U512};

/// The VM's 256-bit unsigned word. Arithmetic wraps modulo 2^256.
pub type Word = U256;

/// Big-endian 32-byte encoding of a word.
pub fn to_be_bytes(w: Word) -> [u8; 32] {
    let mut buf = [0u8; 32];
    w.to_big_endian(&mut buf);
    buf
}

/// Decode a big-endian byte slice (at most 32 bytes) into a word,
/// zero-extending on the left.
pub fn from_be_bytes(bytes: &[u8]) -> Word {
    U256::from_big_endian(bytes)
}

/// Narrow a word to u64 if it fits, `None` on overflow. Geth limits
/// calldata offsets the same way.
pub fn to_u64(w: Word) -> Option<u64> {
    if w > U256::from(u64::MAX) {
        None
    } else {
        Some(w.low_u64())
    }
}

/// Narrow a word to usize by truncation. Memory offsets follow the
/// reference behavior of taking the low 64 bits.
pub fn to_usize_truncated(w: Word) -> usize {
    w.low_u64() as usize
}

/// (a + b) mod n with a 512-bit intermediate, 0 when n is zero.
pub fn add_mod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return U256::zero();
    }
    let sum = U512::from(a) + U512::from(b);
    low_word(sum % U512::from(n))
}

/// (a * b) mod n with a 512-bit intermediate, 0 when n is zero.
pub fn mul_mod(a: Word, b: Word, n: Word) -> Word {
    if n.is_zero() {
        return U256::zero();
    }
    let prod = U512::from(a) * U512::from(b);
    low_word(prod % U512::from(n))
}

fn low_word(x: U512) -> Word {
    let mut buf = [0u8; 64];
    x.to_big_endian(&mut buf);
    U256::from_big_endian(&buf[32..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn be_bytes_round_trip() {
        let w = Word::from(0xdeadbeefu64);
        let bytes = to_be_bytes(w);
        assert_eq!(bytes[28..], [0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(from_be_bytes(&bytes), w);
    }

    #[test]
    fn to_u64_overflow() {
        assert_eq!(to_u64(Word::from(12)), Some(12));
        assert_eq!(to_u64(Word::from(u64::MAX)), Some(u64::MAX));
        assert_eq!(to_u64(Word::from(u64::MAX) + 1), None);
        assert_eq!(to_u64(Word::MAX), None);
    }

    #[test]
    fn add_mod_exceeding_word_width() {
        // MAX + 2 overflows 2^256; with a 512-bit intermediate the result
        // modulo MAX is exactly 2.
        assert_eq!(add_mod(Word::MAX, Word::from(2), Word::MAX), Word::from(2));
        assert_eq!(add_mod(Word::from(7), Word::from(5), Word::from(10)), Word::from(2));
    }

    #[test]
    fn mul_mod_exceeding_word_width() {
        assert_eq!(
            mul_mod(Word::MAX, Word::from(2), Word::MAX),
            Word::zero()
        );
        assert_eq!(mul_mod(Word::from(7), Word::from(5), Word::from(4)), Word::from(3));
    }

    #[test]
    fn modular_ops_zero_modulus() {
        assert_eq!(add_mod(Word::from(1), Word::from(2), Word::zero()), Word::zero());
        assert_eq!(mul_mod(Word::from(3), Word::from(4), Word::zero()), Word::zero());
    }
}
