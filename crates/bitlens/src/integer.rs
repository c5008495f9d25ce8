//! Unsigned and two's-complement integer readings of a pattern.

use crate::{
    bits::sign_extend,
    errors::{Error, Result},
    pattern::BitPattern,
    width::Width,
};

/// Both integer readings of the same bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IntegerView {
    pub width: Width,
    pub unsigned: u64,
    pub signed: i64,
}

/// The pattern read as a base-2 numeral, bit 0 most significant.
pub fn decode_unsigned(pattern: &BitPattern) -> u64 {
    pattern.value()
}

/// Two's-complement reading: `unsigned - 2^width` when the sign bit is set.
pub fn decode_signed(pattern: &BitPattern) -> i64 {
    sign_extend(pattern.value(), pattern.width().bits())
}

pub fn decode(pattern: &BitPattern) -> IntegerView {
    IntegerView {
        width: pattern.width(),
        unsigned: decode_unsigned(pattern),
        signed: decode_signed(pattern),
    }
}

/// Splits the pattern into `width`-sized integers, MSB chunk first.
///
/// Returns an empty list when `width` is wider than the pattern.
pub fn decode_chunks(pattern: &BitPattern, width: Width) -> Vec<IntegerView> {
    BitPattern::chunks(&pattern.to_bytes(), width)
        .iter()
        .map(decode)
        .collect()
}

/// Encodes `value` at `width`. Non-negative values up to `2^width - 1` are
/// stored as-is; negative values down to `-2^(width-1)` in two's complement.
pub fn encode(value: i128, width: Width) -> Result<BitPattern> {
    let min = width.min_signed() as i128;
    let max = width.max_unsigned() as i128;

    if value < min || value > max {
        return Err(Error::range(value, format!("{width} integer")));
    }

    BitPattern::from_u64((value as u64) & width.max_unsigned(), width)
}

/// Encodes a value that must fit the unsigned range of `width`.
pub fn encode_unsigned(value: u64, width: Width) -> Result<BitPattern> {
    BitPattern::from_u64(value, width)
        .map_err(|_| Error::range(value, format!("{width} unsigned integer")))
}

/// Encodes a value that must fit the signed range of `width`.
pub fn encode_signed(value: i64, width: Width) -> Result<BitPattern> {
    if value < width.min_signed() || value > width.max_signed() {
        return Err(Error::range(value, format!("{width} signed integer")));
    }

    BitPattern::from_u64((value as u64) & width.max_unsigned(), width)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_byte() {
        let pattern = BitPattern::from_u64(0b0100_0001, Width::W8).unwrap();
        assert_eq!(decode_unsigned(&pattern), 65);
        assert_eq!(decode_signed(&pattern), 65);
    }

    #[test]
    fn test_decode_negative() {
        let pattern = BitPattern::from_u64(0xFF, Width::W8).unwrap();
        assert_eq!(decode_unsigned(&pattern), 255);
        assert_eq!(decode_signed(&pattern), -1);

        let pattern = BitPattern::from_u64(0x8000_0000, Width::W32).unwrap();
        assert_eq!(decode_signed(&pattern), i32::MIN as i64);

        let pattern = BitPattern::from_u64(u64::MAX, Width::W64).unwrap();
        assert_eq!(decode_unsigned(&pattern), u64::MAX);
        assert_eq!(decode_signed(&pattern), -1);
    }

    #[test]
    fn test_decode_chunks() {
        let pattern = BitPattern::from_u64(0x00FF_7F80, Width::W32).unwrap();
        let halves = decode_chunks(&pattern, Width::W16);
        assert_eq!(halves.len(), 2);
        assert_eq!(halves[0].unsigned, 0x00FF);
        assert_eq!(halves[1].signed, 0x7F80);

        let bytes = decode_chunks(&pattern, Width::W8);
        assert_eq!(
            bytes.iter().map(|v| v.signed).collect::<Vec<_>>(),
            vec![0, -1, 127, -128]
        );

        assert!(decode_chunks(&pattern, Width::W64).is_empty());
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode(-1, Width::W8).unwrap().value(), 0xFF);
        assert_eq!(encode(255, Width::W8).unwrap().value(), 0xFF);
        assert_eq!(encode(-128, Width::W8).unwrap().value(), 0x80);
        assert_eq!(encode(u64::MAX as i128, Width::W64).unwrap().value(), u64::MAX);
        assert_eq!(encode(i64::MIN as i128, Width::W64).unwrap().value(), 1 << 63);
    }

    #[test]
    fn test_encode_out_of_range() {
        assert!(matches!(encode(256, Width::W8), Err(Error::Range { .. })));
        assert!(matches!(encode(-129, Width::W8), Err(Error::Range { .. })));
        assert!(matches!(
            encode(u64::MAX as i128 + 1, Width::W64),
            Err(Error::Range { .. })
        ));
    }

    #[test]
    fn test_encode_signed_and_unsigned() {
        assert_eq!(encode_signed(-2, Width::W16).unwrap().value(), 0xFFFE);
        assert!(encode_signed(128, Width::W8).is_err());
        assert!(encode_unsigned(70000, Width::W16).is_err());
        assert_eq!(encode_unsigned(70000, Width::W32).unwrap().value(), 70000);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn signed_matches_unsigned(
            width in prop::sample::select(Width::ALL.to_vec()),
            raw in any::<u64>(),
        ) {
            let pattern = BitPattern::from_u64(raw & width.max_unsigned(), width).unwrap();
            let unsigned = decode_unsigned(&pattern) as i128;
            let signed = decode_signed(&pattern) as i128;

            if pattern.bit(0).unwrap() == 0 {
                prop_assert_eq!(signed, unsigned);
            } else {
                prop_assert_eq!(signed, unsigned - (1i128 << width.bits()));
            }
        }

        #[test]
        fn signed_encode_roundtrip(value in any::<i64>()) {
            let pattern = encode_signed(value, Width::W64).unwrap();
            prop_assert_eq!(decode_signed(&pattern), value);
        }
    }
}
