//! A random-access, growable array of booleans that packs each element into a
//! single bit of a [u64] word.
//!
//! [BitArray] behaves like a `Vec<bool>` (index-based get/set/insert/remove,
//! amortized-doubling growth) at roughly 1/8th to 1/64th of the memory
//! footprint. Structural edits at arbitrary indices move the tail one word at
//! a time, rippling a single carry bit across word boundaries, instead of
//! moving elements one by one.
//!
//! # Example
//!
//! ```
//! use bitarray::BitArray;
//!
//! let mut bits = BitArray::new();
//! bits.push(true);
//! bits.push(true);
//! bits.insert(1, false);
//! assert_eq!(bits.get(1), Some(false));
//! assert_eq!(bits.remove(1), false);
//! assert_eq!(bits.count_ones(), 2);
//!
//! // Text round-trip
//! assert_eq!(bits.to_string(), "Size = 2, [1 1]");
//! let parsed: BitArray = "Size = 2, [1 1]".parse().unwrap();
//! assert_eq!(parsed, bits);
//! ```
//!
//! The array is not synchronized: callers requiring concurrent access must
//! impose their own mutual exclusion around every mutating call.

mod array;
pub use array::{BitArray, BitIterator, MAX_ELEMENTS};
mod text;
pub use text::ParseBitArrayError;
mod word;
