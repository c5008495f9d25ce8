//! Low-level bit read and manipulation utilities for fixed-width registers.
//!
//! Bits are addressed in MSB-first order: bit 0 is the most significant bit of
//! a `width`-bit value, which is also the high bit of its first big-endian byte.

use crate::errors::{Error, Result};

/// All-ones mask covering the low `n` bits (`n` up to 64).
pub fn mask(n: usize) -> u64 {
    if n >= 64 { u64::MAX } else { (1u64 << n) - 1 }
}

/// Reads a single bit at `bit_pos` (0 = MSB). Returns 0 or 1.
pub fn read_bit_at(value: u64, width: usize, bit_pos: usize) -> Result<u8> {
    if bit_pos >= width {
        return Err(Error::IndexOutOfRange {
            index: bit_pos,
            width,
        });
    }

    Ok(extract(value, width, bit_pos, 1) as u8)
}

/// Reads `n` bits starting at `bit_pos` as an unsigned value. MSB-first.
pub fn read_bits_at(value: u64, width: usize, bit_pos: usize, n: usize) -> Result<u64> {
    if bit_pos > width {
        return Err(Error::IndexOutOfRange {
            index: bit_pos,
            width,
        });
    }
    if n == 0 {
        return Ok(0);
    }

    if bit_pos.checked_add(n).is_none_or(|end| end > width) {
        return Err(Error::IndexOutOfRange {
            index: bit_pos.saturating_add(n - 1),
            width,
        });
    }

    Ok(extract(value, width, bit_pos, n))
}

/// Unchecked field read; callers guarantee `bit_pos + n <= width <= 64`.
pub(crate) fn extract(value: u64, width: usize, bit_pos: usize, n: usize) -> u64 {
    let shift = width - bit_pos - n;
    if shift >= 64 {
        return 0;
    }

    (value >> shift) & mask(n)
}

/// Returns `value` with the bit at MSB-first `bit_pos` inverted.
pub(crate) fn toggle(value: u64, width: usize, bit_pos: usize) -> u64 {
    value ^ (1u64 << (width - 1 - bit_pos))
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Folds a big-endian byte slice (at most 8 bytes) into a register value.
pub(crate) fn from_be_bytes(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | byte as u64)
}

/// Emits the low `n_bytes` bytes of `value` in big-endian order.
pub(crate) fn to_be_bytes(value: u64, n_bytes: usize) -> Vec<u8> {
    value.to_be_bytes()[8 - n_bytes..].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_bit_at() {
        assert_eq!(read_bit_at(0b1000_0000, 8, 0).unwrap(), 1);
        assert_eq!(read_bit_at(0b1000_0000, 8, 7).unwrap(), 0);
        assert_eq!(read_bit_at(0b0000_0001, 8, 7).unwrap(), 1);
    }

    #[test]
    fn test_read_bit_out_of_range() {
        assert_eq!(
            read_bit_at(0xFF, 8, 8).unwrap_err(),
            Error::IndexOutOfRange { index: 8, width: 8 }
        );
    }

    #[test]
    fn test_read_bits_at() {
        assert_eq!(read_bits_at(0b11_000001, 8, 0, 2).unwrap(), 0b11);
        assert_eq!(read_bits_at(0b11_000001, 8, 2, 6).unwrap(), 0b000001);
        assert_eq!(read_bits_at(0xDEAD_BEEF, 32, 8, 16).unwrap(), 0xADBE);
        assert_eq!(read_bits_at(u64::MAX, 64, 0, 64).unwrap(), u64::MAX);
    }

    #[test]
    fn test_read_bits_at_out_of_range() {
        assert_eq!(
            read_bits_at(0xFF, 8, 4, 5).unwrap_err(),
            Error::IndexOutOfRange { index: 8, width: 8 }
        );
    }

    #[test]
    fn test_read_zero_bits() {
        assert_eq!(read_bits_at(0xFF, 8, 8, 0).unwrap(), 0);
        assert_eq!(
            read_bits_at(0xFF, 8, 100, 0).unwrap_err(),
            Error::IndexOutOfRange {
                index: 100,
                width: 8
            }
        );
    }

    #[test]
    fn test_toggle() {
        assert_eq!(toggle(0, 32, 0), 0x8000_0000);
        assert_eq!(toggle(0x8000_0000, 32, 0), 0);
        assert_eq!(toggle(0, 8, 7), 1);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0b11111111, 8), -1);
        assert_eq!(sign_extend(0x7F, 8), 127);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
    }

    #[test]
    fn test_byte_conversion() {
        assert_eq!(from_be_bytes(&[0x12, 0x34]), 0x1234);
        assert_eq!(to_be_bytes(0x1234, 2), vec![0x12, 0x34]);
        assert_eq!(to_be_bytes(0x1234, 4), vec![0, 0, 0x12, 0x34]);
    }
}
