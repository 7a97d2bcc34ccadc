//! Packed bit array implementation.
//!
//! [BitArray] stores one boolean per bit of a [u64] word, so a million
//! elements occupy ~122 KiB instead of the megabyte a `Vec<bool>` needs.
//! Random-index insertion and removal shift the tail one word at a time,
//! propagating a single carry bit across word boundaries, so a structural
//! edit costs O(words touched) rather than O(bits moved).
//!
//! Bits past the logical length are unspecified garbage: they are never
//! observable through the public API (equality, hashing, iteration, and
//! encoding all mask them out) and are overwritten on append.

use crate::word::{
    get_bit, locate, select_from, select_range, set_bit, single_bit_mask, Word, EMPTY_WORD,
    FULL_WORD, WORD_BITS,
};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error as CodecError, FixedSize, RangeCfg, Read, ReadExt, Write};
use core::{
    fmt::{self, Formatter, Write as _},
    hash::{Hash, Hasher},
    ops::Index,
};

/// Largest number of elements a [BitArray] can hold: the largest multiple of
/// [u64::BITS] representable as a [usize], so capacity in bits never
/// overflows.
pub const MAX_ELEMENTS: usize = usize::MAX - (WORD_BITS - 1);

/// Default capacity in elements (one word).
const DEFAULT_CAPACITY: usize = WORD_BITS;

/// A random-access, growable sequence of booleans packed one element per bit.
#[derive(Clone)]
pub struct BitArray {
    /// The word buffer. Length is always `capacity() / 64`.
    words: Vec<Word>,
    /// The number of live elements. Bits at indices `[len, capacity())` are
    /// garbage.
    len: usize,
}

impl BitArray {
    /// Creates an empty array with the default capacity of one word.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty array able to hold at least `bits` elements before
    /// growing. Capacity is rounded up to the next multiple of 64.
    #[inline]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            words: vec![EMPTY_WORD; Self::words_for(bits)],
            len: 0,
        }
    }

    /// Returns the number of elements in the array.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of elements the array can hold without growing.
    /// Always a multiple of 64.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.words.len() * WORD_BITS
    }

    /// Gets the value of the element at `index`.
    ///
    /// Returns `None` if the index is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.get_unchecked(index))
    }

    /// Sets the element at `index` to `value` and returns the previous value.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, value: bool) -> bool {
        self.assert_index(index);
        let (word_index, offset) = locate(index);
        let old = get_bit(self.words[word_index], offset);
        self.words[word_index] = set_bit(self.words[word_index], offset, value);
        old
    }

    /// Inserts `bit` at `index`, shifting every element at or above `index`
    /// one position higher. Grows the array if it is full.
    ///
    /// Appending (`index == len`) touches a single word; any other index
    /// ripples a carry through the words holding the tail.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`, or if the array already holds
    /// [MAX_ELEMENTS] elements.
    pub fn insert(&mut self, index: usize, bit: bool) {
        assert!(
            index <= self.len,
            "insertion index {index} out of bounds for length {}",
            self.len
        );
        self.ensure_capacity();
        let (word_index, offset) = locate(index);

        // Append touches one word and never ripples.
        if index == self.len {
            self.words[word_index] = set_bit(self.words[word_index], offset, bit);
            self.len += 1;
            return;
        }

        // Insert into the first word, then ripple the displaced bit through
        // every word up to the one that will hold the shifted last element.
        let last = self.len / WORD_BITS;
        let mut carry = self.insert_in_word(word_index, offset, bit);
        for word in word_index + 1..=last {
            carry = self.insert_in_word(word, 0, carry);
        }
        // The carry out of the last live word was past `len`: garbage.
        let _ = carry;
        self.len += 1;
    }

    /// Removes and returns the element at `index`, shifting every element
    /// above it one position lower.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> bool {
        self.assert_index(index);
        let (word_index, offset) = locate(index);
        let removed = get_bit(self.words[word_index], offset);

        // Removing the last element never ripples.
        if index + 1 == self.len {
            self.len -= 1;
            return removed;
        }

        // Walk from the word holding the last element down to the target,
        // feeding each word's first bit into the slot vacated at the top of
        // the word below it. The fill for the very last slot is garbage.
        let last = (self.len - 1) / WORD_BITS;
        let mut carry = false;
        let mut word = last;
        while word > word_index {
            carry = self.remove_from_word(word, 0, carry);
            word -= 1;
        }
        self.remove_from_word(word_index, offset, carry);
        self.len -= 1;
        removed
    }

    /// Appends an element to the end of the array.
    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.insert(self.len, bit);
    }

    /// Removes the last element from the array and returns it.
    ///
    /// Returns `None` if the array is empty.
    #[inline]
    pub fn pop(&mut self) -> Option<bool> {
        if self.is_empty() {
            return None;
        }
        Some(self.remove(self.len - 1))
    }

    /// Discards the buffer and reinitializes to the default capacity with no
    /// elements.
    pub fn clear(&mut self) {
        self.words = vec![EMPTY_WORD; Self::words_for(DEFAULT_CAPACITY)];
        self.len = 0;
    }

    /// Reallocates the array to hold exactly `ceil(bits / 64)` words.
    ///
    /// If `bits < len`, the length is silently truncated to `bits` (a
    /// documented contract, not an error). `bits == 0` reinitializes to the
    /// default capacity.
    pub fn resize(&mut self, bits: usize) {
        if bits == 0 {
            self.clear();
            return;
        }
        self.words.resize(Self::words_for(bits), EMPTY_WORD);
        self.len = self.len.min(bits);
    }

    /// Returns the number of elements set to `true`.
    ///
    /// Counts whole words at a time; only the partially-occupied last word
    /// is masked.
    pub fn count_ones(&self) -> usize {
        let full = self.len / WORD_BITS;
        let mut count: usize = self.words[..full]
            .iter()
            .map(|word| word.count_ones() as usize)
            .sum();
        let partial = self.len % WORD_BITS;
        if partial != 0 {
            count += select_range(self.words[full], 0, partial).count_ones() as usize;
        }
        count
    }

    /// Returns the number of elements set to `false`.
    #[inline]
    pub fn count_zeros(&self) -> usize {
        self.len - self.count_ones()
    }

    /// Finds the first occurrence of `needle`, skipping whole words that
    /// cannot contain it (an all-zero word holds no `true`, an all-one word
    /// no `false`) with a single comparison each.
    ///
    /// Worth using when `needle` really is a needle in a haystack of
    /// `!needle`; otherwise a plain scan is as fast.
    pub fn index_of_needle(&self, needle: bool) -> Option<usize> {
        let barren = if needle { EMPTY_WORD } else { FULL_WORD };
        let limit = Self::words_for(self.len).saturating_sub(1);
        let mut word = 0;
        while word < limit && self.words[word] == barren {
            word += 1;
        }
        (word * WORD_BITS..self.len).find(|&index| self.get_unchecked(index) == needle)
    }

    /// Creates an iterator over the elements.
    pub fn iter(&self) -> BitIterator<'_> {
        BitIterator {
            array: self,
            pos: 0,
        }
    }

    // ---------- Helper Functions ----------

    /// Calculates the number of words needed to store `bits` elements.
    #[inline(always)]
    fn words_for(bits: usize) -> usize {
        bits.div_ceil(WORD_BITS)
    }

    #[inline(always)]
    fn get_unchecked(&self, index: usize) -> bool {
        let (word_index, offset) = locate(index);
        get_bit(self.words[word_index], offset)
    }

    /// Asserts that the index is within bounds.
    #[inline(always)]
    fn assert_index(&self, index: usize) {
        assert!(
            index < self.len,
            "index {index} out of bounds for length {}",
            self.len
        );
    }

    /// Shifts the bits of word `word_index` at offsets `[offset, 64)` up by
    /// one, drops `bit` into the vacated slot, and returns the bit pushed
    /// out of the top of the word.
    #[inline]
    fn insert_in_word(&mut self, word_index: usize, offset: usize, bit: bool) -> bool {
        let word = self.words[word_index];
        let tail = select_from(word, offset);
        let head = word ^ tail;
        let carry = get_bit(tail, WORD_BITS - 1);
        self.words[word_index] = head | (tail << 1) | ((bit as Word) << offset);
        carry
    }

    /// Pops the bit of word `word_index` at `offset`, shifts the bits above
    /// it down by one, and appends `fill` at the vacated top slot. Returns
    /// the popped bit.
    #[inline]
    fn remove_from_word(&mut self, word_index: usize, offset: usize, fill: bool) -> bool {
        let word = self.words[word_index];
        let tail = select_from(word, offset);
        let head = word ^ tail;
        let popped = get_bit(tail, offset);
        let shifted = (tail & !single_bit_mask(offset)) >> 1;
        self.words[word_index] = head | shifted | ((fill as Word) << (WORD_BITS - 1));
        popped
    }

    /// Grows the array if it is full: doubles the capacity, capped at
    /// [MAX_ELEMENTS]. Growth from zero falls back to the default capacity.
    fn ensure_capacity(&mut self) {
        assert!(
            self.len < MAX_ELEMENTS,
            "bit array is completely full: len = {}",
            self.len
        );
        if self.len == self.capacity() {
            self.resize(self.len.saturating_mul(2).min(MAX_ELEMENTS));
        }
    }

    /// Returns the word holding bits `[index * 64, index * 64 + 64)` with
    /// any garbage past `len` masked to zero.
    #[inline]
    fn live_word(&self, index: usize) -> Word {
        let word = self.words[index];
        let partial = self.len % WORD_BITS;
        if partial != 0 && index == self.len / WORD_BITS {
            select_range(word, 0, partial)
        } else {
            word
        }
    }
}

// ---------- Constructors ----------

impl Default for BitArray {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: AsRef<[bool]>> From<T> for BitArray {
    fn from(t: T) -> Self {
        let bools = t.as_ref();
        let mut array = Self::with_capacity(bools.len());
        for &bit in bools {
            array.push(bit);
        }
        array
    }
}

impl FromIterator<bool> for BitArray {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut array = Self::with_capacity(iter.size_hint().0);
        for bit in iter {
            array.push(bit);
        }
        array
    }
}

impl Extend<bool> for BitArray {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        for bit in iter {
            self.push(bit);
        }
    }
}

// ---------- Converters ----------

impl From<BitArray> for Vec<bool> {
    fn from(array: BitArray) -> Self {
        array.iter().collect()
    }
}

// ---------- Equality & Hashing ----------

impl PartialEq for BitArray {
    /// Compares live bits only; spare capacity and garbage bits are ignored.
    fn eq(&self, other: &Self) -> bool {
        if self.len != other.len {
            return false;
        }
        let words = Self::words_for(self.len);
        (0..words).all(|word| self.live_word(word) == other.live_word(word))
    }
}

impl Eq for BitArray {}

impl Hash for BitArray {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len.hash(state);
        for word in 0..Self::words_for(self.len) {
            self.live_word(word).hash(state);
        }
    }
}

// ---------- Debug ----------

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // For very large arrays, only show a preview
        const MAX_DISPLAY: usize = 64;
        const HALF_DISPLAY: usize = MAX_DISPLAY / 2;

        // Closure for writing a bit
        let write_bit = |formatter: &mut Formatter<'_>, index: usize| -> fmt::Result {
            formatter.write_char(if self.get_unchecked(index) { '1' } else { '0' })
        };

        f.write_str("BitArray[")?;
        if self.len <= MAX_DISPLAY {
            // Show all bits
            for i in 0..self.len {
                write_bit(f, i)?;
            }
        } else {
            // Show first and last bits with ellipsis
            for i in 0..HALF_DISPLAY {
                write_bit(f, i)?;
            }

            f.write_str("...")?;

            for i in (self.len - HALF_DISPLAY)..self.len {
                write_bit(f, i)?;
            }
        }
        f.write_str("]")
    }
}

// ---------- Operations ----------

impl Index<usize> for BitArray {
    type Output = bool;

    /// Allows accessing elements using the `[]` operator.
    ///
    /// Panics if out of bounds.
    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        self.assert_index(index);
        if self.get_unchecked(index) {
            &true
        } else {
            &false
        }
    }
}

// ---------- Codec ----------

impl Write for BitArray {
    fn write(&self, buf: &mut impl BufMut) {
        // Prefix with the number of elements
        self.len.write(buf);

        // Write live words, masking any garbage in the last one
        for word in 0..Self::words_for(self.len) {
            self.live_word(word).write(buf);
        }
    }
}

impl Read for BitArray {
    type Cfg = RangeCfg;

    fn read_cfg(buf: &mut impl Buf, range: &Self::Cfg) -> Result<Self, CodecError> {
        // Parse length
        let len = usize::read_cfg(buf, range)?;

        // Parse words
        let num_words = Self::words_for(len);
        let mut words = Vec::with_capacity(num_words);
        for _ in 0..num_words {
            words.push(Word::read(buf)?);
        }

        // Ensure there were no bits past the declared length
        let partial = len % WORD_BITS;
        if partial != 0 {
            let last = words[num_words - 1];
            if select_range(last, 0, partial) != last {
                return Err(CodecError::Invalid("BitArray", "trailing bits"));
            }
        }

        Ok(Self { words, len })
    }
}

impl EncodeSize for BitArray {
    fn encode_size(&self) -> usize {
        self.len.encode_size() + (Word::SIZE * Self::words_for(self.len))
    }
}

// ---------- Iterator ----------

/// Iterator over elements of a [BitArray].
pub struct BitIterator<'a> {
    /// Reference to the array being iterated over
    array: &'a BitArray,

    /// Current position in the array (0-indexed)
    pos: usize,
}

impl Iterator for BitIterator<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.array.len() {
            return None;
        }

        let bit = self.array.get_unchecked(self.pos);
        self.pos += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.len() - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for BitIterator<'_> {}

impl<'a> IntoIterator for &'a BitArray {
    type Item = bool;
    type IntoIter = BitIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
