//! Immutable fixed-width bit container.
//!
//! Bit 0 is the most significant bit and byte order is big-endian; see
//! [crate::bits]. Every operation that changes a bit returns a new pattern.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::{
    bits,
    errors::{Error, Result},
    width::Width,
};

/// A sequence of exactly `width` bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BitPattern {
    width: Width,
    value: u64,
}

impl BitPattern {
    /// Builds a pattern from big-endian bytes. `bytes.len() * 8` must equal `width`.
    pub fn from_bytes(bytes: &[u8], width: Width) -> Result<Self> {
        if bytes.len() * 8 != width.bits() {
            return Err(Error::width(width.to_string(), bytes.len() * 8));
        }

        Ok(Self {
            width,
            value: bits::from_be_bytes(bytes),
        })
    }

    /// Builds a pattern from a 1, 2, 4 or 8 byte slice, inferring the width.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes(bytes, Width::from_byte_len(bytes.len())?)
    }

    /// Builds a pattern whose unsigned reading is `value`. Fails if `value >= 2^width`.
    pub fn from_u64(value: u64, width: Width) -> Result<Self> {
        if value > width.max_unsigned() {
            return Err(Error::range(value, format!("{width} pattern")));
        }

        Ok(Self { width, value })
    }

    /// Keeps the low `width` bits of `value`.
    pub(crate) fn masked(value: u64, width: Width) -> Self {
        Self {
            width,
            value: value & width.max_unsigned(),
        }
    }

    /// Splits `bytes` into consecutive patterns of `width`; a trailing partial chunk is dropped.
    pub fn chunks(bytes: &[u8], width: Width) -> Vec<Self> {
        bytes
            .chunks_exact(width.bytes())
            .map(|chunk| Self {
                width,
                value: bits::from_be_bytes(chunk),
            })
            .collect()
    }

    pub fn width(&self) -> Width {
        self.width
    }

    /// Raw register value; equal to the unsigned integer reading.
    pub fn value(&self) -> u64 {
        self.value
    }

    /// Returns bit `index` (0 = MSB) as 0 or 1.
    pub fn bit(&self, index: usize) -> Result<u8> {
        bits::read_bit_at(self.value, self.width.bits(), index)
    }

    /// Reads `len` bits starting at `offset` (MSB-first) as an unsigned value.
    pub fn bits(&self, offset: usize, len: usize) -> Result<u64> {
        bits::read_bits_at(self.value, self.width.bits(), offset, len)
    }

    /// Returns a copy with bit `index` inverted. Flipping twice restores the original.
    pub fn with_bit_flipped(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;

        Ok(Self {
            width: self.width,
            value: bits::toggle(self.value, self.width.bits(), index),
        })
    }

    /// Returns a copy with bit `index` forced to `bit` (any non-zero value sets it).
    pub fn with_bit_set(&self, index: usize, bit: u8) -> Result<Self> {
        if self.bit(index)? == (bit != 0) as u8 {
            return Ok(*self);
        }

        self.with_bit_flipped(index)
    }

    /// Big-endian bytes; the exact inverse of [BitPattern::from_bytes].
    pub fn to_bytes(&self) -> Vec<u8> {
        bits::to_be_bytes(self.value, self.width.bytes())
    }

    /// `0`/`1` characters, MSB first.
    pub fn to_bit_string(&self) -> String {
        format!("{:0width$b}", self.value, width = self.width.bits())
    }

    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(self.to_bytes())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.width.bits() {
            return Err(Error::IndexOutOfRange {
                index,
                width: self.width.bits(),
            });
        }

        Ok(())
    }
}

impl fmt::Display for BitPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn any_pattern() -> impl Strategy<Value = BitPattern> {
        (prop::sample::select(Width::ALL.to_vec()), any::<u64>()).prop_map(|(width, raw)| {
            BitPattern {
                width,
                value: raw & width.max_unsigned(),
            }
        })
    }

    proptest! {
        #[test]
        fn bytes_roundtrip(pattern in any_pattern()) {
            let back = BitPattern::from_bytes(&pattern.to_bytes(), pattern.width()).unwrap();
            prop_assert_eq!(back, pattern);
        }

        #[test]
        fn flip_is_involution(pattern in any_pattern(), raw_index in 0usize..64) {
            let index = raw_index % pattern.width().bits();
            let once = pattern.with_bit_flipped(index).unwrap();
            prop_assert_ne!(once, pattern);
            prop_assert_eq!(once.with_bit_flipped(index).unwrap(), pattern);
        }

        #[test]
        fn flip_changes_only_one_bit(pattern in any_pattern(), raw_index in 0usize..64) {
            let index = raw_index % pattern.width().bits();
            let flipped = pattern.with_bit_flipped(index).unwrap();
            prop_assert_eq!((flipped.value() ^ pattern.value()).count_ones(), 1);
            prop_assert_ne!(flipped.bit(index).unwrap(), pattern.bit(index).unwrap());
        }
    }
}
