//! Variable keys for pose graph nodes
//!
//! A key packs a character tag into the top byte and an index into the
//! remaining 56 bits, so `x3` and `l3` are distinct variables that still
//! order deterministically.

use std::fmt;

const CHR_BITS: u32 = 8;
const INDEX_BITS: u32 = u64::BITS - CHR_BITS;
const INDEX_MASK: u64 = (1 << INDEX_BITS) - 1;

/// Key of the fictitious root node used to encode absolute priors as
/// relative measurements
pub const ANCHOR_KEY: Key = Key::symbol('A', 0);

/// Unique identifier of a variable in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key(pub u64);

impl Key {
    /// Build a key from a character tag and an index
    ///
    /// Only the low byte of `chr` is kept and the index is truncated to 56 bits.
    pub const fn symbol(chr: char, index: u64) -> Self {
        Self(((chr as u64 & 0xff) << INDEX_BITS) | (index & INDEX_MASK))
    }

    /// Character tag of the key
    pub fn chr(&self) -> char {
        char::from((self.0 >> INDEX_BITS) as u8)
    }

    /// Index part of the key
    pub fn index(&self) -> u64 {
        self.0 & INDEX_MASK
    }

    pub fn is_anchor(&self) -> bool {
        *self == ANCHOR_KEY
    }
}

impl From<u64> for Key {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chr = self.chr();
        if chr.is_ascii_graphic() {
            write!(f, "{}{}", chr, self.index())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_roundtrip() {
        let key = Key::symbol('x', 42);
        assert_eq!(key.chr(), 'x');
        assert_eq!(key.index(), 42);
        assert_eq!(key.to_string(), "x42");
    }

    #[test]
    fn test_anchor_orders_before_lowercase_symbols() {
        assert!(ANCHOR_KEY < Key::symbol('x', 0));
        assert!(ANCHOR_KEY < Key::symbol('l', 0));
        assert!(ANCHOR_KEY.is_anchor());
        assert_eq!(ANCHOR_KEY.to_string(), "A0");
    }

    #[test]
    fn test_plain_integer_keys() {
        let key = Key::from(7);
        assert_eq!(key.index(), 7);
        assert_eq!(key.to_string(), "7");
        assert!(!key.is_anchor());
    }
}
