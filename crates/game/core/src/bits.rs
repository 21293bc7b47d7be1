//! Fixed-width bit vector used for tag masks.
//!
//! One const-generic type covers every mask width: a `BitVector<1>` holds 64
//! bits, `BitVector<4>` holds 256. The engine picks its width through
//! [`GameplayConfig::TAG_MASK_WORDS`](crate::config::GameplayConfig).

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, Not};

/// A fixed-width set of bits stored as `WORDS` little-endian `u64` words.
///
/// Bit `i` lives in word `i / 64` at position `i % 64`. Out-of-range indices
/// are ignored by mutators and read as unset, so callers never panic on a
/// stale index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitVector<const WORDS: usize> {
    words: [u64; WORDS],
}

impl<const WORDS: usize> BitVector<WORDS> {
    /// Total number of addressable bits.
    pub const BITS: usize = WORDS * 64;

    /// The empty set.
    pub const EMPTY: Self = Self { words: [0; WORDS] };

    /// Creates an empty bit vector.
    #[inline]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Creates a bit vector with only `index` set.
    #[inline]
    pub fn single(index: usize) -> Self {
        let mut bits = Self::EMPTY;
        bits.set(index);
        bits
    }

    /// Builds a bit vector directly from its words.
    #[inline]
    pub const fn from_words(words: [u64; WORDS]) -> Self {
        Self { words }
    }

    /// Raw word view.
    #[inline]
    pub const fn words(&self) -> &[u64; WORDS] {
        &self.words
    }

    #[inline]
    pub fn set(&mut self, index: usize) {
        if index < Self::BITS {
            self.words[index / 64] |= 1u64 << (index % 64);
        }
    }

    #[inline]
    pub fn clear(&mut self, index: usize) {
        if index < Self::BITS {
            self.words[index / 64] &= !(1u64 << (index % 64));
        }
    }

    #[inline]
    pub fn test(&self, index: usize) -> bool {
        index < Self::BITS && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Clears every bit.
    #[inline]
    pub fn reset(&mut self) {
        self.words = [0; WORDS];
    }

    #[must_use]
    pub fn and(&self, other: &Self) -> Self {
        let mut out = *self;
        for (word, rhs) in out.words.iter_mut().zip(other.words.iter()) {
            *word &= *rhs;
        }
        out
    }

    #[must_use]
    pub fn or(&self, other: &Self) -> Self {
        let mut out = *self;
        for (word, rhs) in out.words.iter_mut().zip(other.words.iter()) {
            *word |= *rhs;
        }
        out
    }

    /// Bits of `self` that are not in `other`.
    #[must_use]
    pub fn and_not(&self, other: &Self) -> Self {
        let mut out = *self;
        for (word, rhs) in out.words.iter_mut().zip(other.words.iter()) {
            *word &= !*rhs;
        }
        out
    }

    #[must_use]
    pub fn not(&self) -> Self {
        let mut out = *self;
        for word in out.words.iter_mut() {
            *word = !*word;
        }
        out
    }

    /// Population count.
    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    /// True when at least one bit is shared with `other`.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .any(|(a, b)| a & b != 0)
    }

    /// True when every bit of `other` is also set in `self`.
    #[inline]
    pub fn contains_all(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter())
            .all(|(a, b)| a & b == *b)
    }

    /// Iterates set bit indices in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(w, &word)| {
            let mut remaining = word;
            core::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(w * 64 + bit)
            })
        })
    }
}

impl<const WORDS: usize> Default for BitVector<WORDS> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<const WORDS: usize> fmt::Debug for BitVector<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

impl<const WORDS: usize> BitAnd for BitVector<WORDS> {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        BitVector::and(&self, &rhs)
    }
}

impl<const WORDS: usize> BitOr for BitVector<WORDS> {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        BitVector::or(&self, &rhs)
    }
}

impl<const WORDS: usize> Not for BitVector<WORDS> {
    type Output = Self;
    fn not(self) -> Self {
        BitVector::not(&self)
    }
}

impl<const WORDS: usize> BitAndAssign for BitVector<WORDS> {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = BitVector::and(self, &rhs);
    }
}

impl<const WORDS: usize> BitOrAssign for BitVector<WORDS> {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = BitVector::or(self, &rhs);
    }
}

impl<const WORDS: usize> FromIterator<usize> for BitVector<WORDS> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut bits = Self::EMPTY;
        for index in iter {
            bits.set(index);
        }
        bits
    }
}

// serde only implements arrays up to a fixed length, so words go over the
// wire as a plain sequence and are length-checked on the way back in.
#[cfg(feature = "serde")]
impl<const WORDS: usize> serde::Serialize for BitVector<WORDS> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.words.as_slice().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de, const WORDS: usize> serde::Deserialize<'de> for BitVector<WORDS> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw: Vec<u64> = Vec::deserialize(deserializer)?;
        let words: [u64; WORDS] = raw.try_into().map_err(|raw: Vec<u64>| {
            serde::de::Error::invalid_length(raw.len(), &"a bit vector word array")
        })?;
        Ok(Self { words })
    }
}
