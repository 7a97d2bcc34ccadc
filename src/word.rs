//! Word-level primitives shared by every component of the array.
//!
//! Bits are addressed LSB-first: logical offset `o` within a word is the bit
//! selected by `1 << o`. Every primitive in the crate uses this one ordering;
//! both ripple directions of the shift engine are derived from
//! [select_range] so they stay exact mirrors of each other.

/// Storage unit for packed bits.
pub(crate) type Word = u64;

/// Number of bit slots in a [Word].
pub(crate) const WORD_BITS: usize = Word::BITS as usize;

/// Empty word (all bits set to 0).
pub(crate) const EMPTY_WORD: Word = 0;

/// Full word (all bits set to 1).
pub(crate) const FULL_WORD: Word = Word::MAX;

/// Maps a logical bit index to `(word index, offset within word)`.
#[inline(always)]
pub(crate) const fn locate(index: usize) -> (usize, usize) {
    (index / WORD_BITS, index % WORD_BITS)
}

/// Returns a mask with only the bit at `offset` set.
#[inline(always)]
pub(crate) const fn single_bit_mask(offset: usize) -> Word {
    1 << offset
}

/// Returns the value of the bit at `offset`.
#[inline(always)]
pub(crate) const fn get_bit(word: Word, offset: usize) -> bool {
    word & single_bit_mask(offset) != 0
}

/// Returns `word` with the bit at `offset` set to `value`.
#[inline(always)]
pub(crate) const fn set_bit(word: Word, offset: usize, value: bool) -> Word {
    if value {
        word | single_bit_mask(offset)
    } else {
        word & !single_bit_mask(offset)
    }
}

/// Returns `word` with every bit outside `[start, start + length)` forced to
/// zero. Surviving bits keep their positions (they are selected, not
/// shifted).
#[inline(always)]
pub(crate) fn select_range(word: Word, start: usize, length: usize) -> Word {
    debug_assert!(
        start + length <= WORD_BITS,
        "range [{start}, {start} + {length}) exceeds word size"
    );
    if length == 0 {
        return EMPTY_WORD;
    }
    let mask = FULL_WORD.unbounded_shr((WORD_BITS - length) as u32) << start;
    word & mask
}

/// Returns `word` with every bit below `start` forced to zero.
#[inline(always)]
pub(crate) fn select_from(word: Word, start: usize) -> Word {
    select_range(word, start, WORD_BITS - start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate() {
        assert_eq!(locate(0), (0, 0));
        assert_eq!(locate(1), (0, 1));
        assert_eq!(locate(63), (0, 63));
        assert_eq!(locate(64), (1, 0));
        assert_eq!(locate(65), (1, 1));
        assert_eq!(locate(128), (2, 0));
        assert_eq!(locate(200), (3, 8));
    }

    #[test]
    fn test_get_set_bit() {
        let mut word = EMPTY_WORD;
        for offset in 0..WORD_BITS {
            assert!(!get_bit(word, offset));
            word = set_bit(word, offset, true);
            assert!(get_bit(word, offset));
        }
        assert_eq!(word, FULL_WORD);
        for offset in 0..WORD_BITS {
            word = set_bit(word, offset, false);
            assert!(!get_bit(word, offset));
        }
        assert_eq!(word, EMPTY_WORD);

        // Setting a bit to its current value is a no-op
        let word = 0b1010;
        assert_eq!(set_bit(word, 1, true), word);
        assert_eq!(set_bit(word, 0, false), word);
    }

    #[test]
    fn test_select_range() {
        let word = FULL_WORD;
        for start in 0..WORD_BITS {
            for length in 0..=(WORD_BITS - start) {
                let selected = select_range(word, start, length);
                assert_eq!(selected.count_ones() as usize, length);
                if length > 0 {
                    assert_eq!(selected.trailing_zeros() as usize, start);
                }
            }
        }

        // Survivors keep their positions
        let word = 0b1101_0110;
        assert_eq!(select_range(word, 1, 3), 0b0000_0110);
        assert_eq!(select_range(word, 4, 4), 0b1101_0000);
        assert_eq!(select_range(word, 0, WORD_BITS), word);
        assert_eq!(select_range(word, 0, 0), 0);
    }

    #[test]
    fn test_select_from() {
        let word = FULL_WORD;
        assert_eq!(select_from(word, 0), FULL_WORD);
        assert_eq!(select_from(word, 63), 1 << 63);
        assert_eq!(select_from(0b1100, 2), 0b1100);
        assert_eq!(select_from(0b1100, 3), 0b1000);
    }
}
