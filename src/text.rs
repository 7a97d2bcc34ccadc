//! Human-readable serialization of a [BitArray].
//!
//! The format is `Size = <n>, [<bit> <bit> ... ]` with space-separated `0`/`1`
//! tokens, e.g. `Size = 3, [1 0 1]` or `Size = 0, []`.

use crate::BitArray;
use core::{
    fmt::{self, Display, Formatter, Write as _},
    str::FromStr,
};
use thiserror::Error;

/// Error returned when parsing a malformed [BitArray] string.
///
/// A single kind covers every failure: a missing or incorrect `Size = `
/// prefix, a non-numeric size, lost `, [`/`]` framing, tokens other than
/// `0`/`1`, and a token count that disagrees with the declared size.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("not a valid bit array string")]
pub struct ParseBitArrayError;

impl Display for BitArray {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Size = {}, [", self.len())?;
        let mut bits = self.iter();
        if let Some(first) = bits.next() {
            f.write_char(if first { '1' } else { '0' })?;
            for bit in bits {
                f.write_char(' ')?;
                f.write_char(if bit { '1' } else { '0' })?;
            }
        }
        f.write_char(']')
    }
}

impl FromStr for BitArray {
    type Err = ParseBitArrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("Size = ").ok_or(ParseBitArrayError)?;
        let (size, rest) = rest.split_once(", [").ok_or(ParseBitArrayError)?;
        let size: usize = size.parse().map_err(|_| ParseBitArrayError)?;
        let body = rest.strip_suffix(']').ok_or(ParseBitArrayError)?;

        let mut array = BitArray::with_capacity(size);
        if size == 0 {
            if !body.is_empty() {
                return Err(ParseBitArrayError);
            }
            return Ok(array);
        }

        let mut tokens = body.split(' ');
        for _ in 0..size {
            match tokens.next() {
                Some("0") => array.push(false),
                Some("1") => array.push(true),
                _ => return Err(ParseBitArrayError),
            }
        }
        if tokens.next().is_some() {
            return Err(ParseBitArrayError);
        }
        Ok(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_display() {
        let array = BitArray::new();
        assert_eq!(array.to_string(), "Size = 0, []");

        let array = BitArray::from(&[true]);
        assert_eq!(array.to_string(), "Size = 1, [1]");

        let array = BitArray::from(&[true, true, true, false, true, true, true]);
        assert_eq!(array.to_string(), "Size = 7, [1 1 1 0 1 1 1]");

        let array = BitArray::from(&[false, false, false, false]);
        assert_eq!(array.to_string(), "Size = 4, [0 0 0 0]");
    }

    #[test]
    fn test_roundtrip() {
        // Empty
        let array = BitArray::new();
        assert_eq!(array.to_string().parse::<BitArray>().unwrap(), array);

        // Random 200-element array spanning several words
        let mut rng = StdRng::seed_from_u64(11);
        let array: BitArray = (0..200).map(|_| rng.gen::<bool>()).collect();
        let parsed: BitArray = array.to_string().parse().unwrap();
        assert_eq!(parsed.len(), 200);
        assert_eq!(parsed, array);
    }

    #[test]
    fn test_parse_valid() {
        let array: BitArray = "Size = 3, [1 0 1]".parse().unwrap();
        assert_eq!(Vec::<bool>::from(array), vec![true, false, true]);

        let array: BitArray = "Size = 0, []".parse().unwrap();
        assert!(array.is_empty());
    }

    #[test]
    fn test_parse_malformed() {
        let malformed = [
            "",
            "[1 0 1]",
            // Wrong or damaged prefix
            "Count = 3, [1 0 1]",
            "size = 3, [1 0 1]",
            "Size := 3, [1 0 1]",
            // Non-numeric / negative size
            "Size = x, [1 0 1]",
            "Size = -1, []",
            "Size = , [1]",
            // Fewer tokens than declared
            "Size = 3, [1 0]",
            "Size = 3, []",
            "Size = 1, []",
            // More tokens than declared
            "Size = 1, [1 0]",
            "Size = 0, [1]",
            // Tokens that are not single bits
            "Size = 3, [1 0 2]",
            "Size = 2, [10 1]",
            "Size = 2, [1  0]",
            // Lost framing
            "Size = 3, 1 0 1]",
            "Size = 3, [1 0 1",
        ];
        for s in malformed {
            assert_eq!(
                s.parse::<BitArray>(),
                Err(ParseBitArrayError),
                "accepted: {s:?}"
            );
        }
    }
}
