//! Supported pattern widths.

use std::fmt;

use crate::errors::{Error, Result};

/// Width of a [crate::pattern::BitPattern] in bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Width {
    W8,
    W16,
    W32,
    W64,
}

impl Width {
    /// Every width, narrowest first.
    pub const ALL: [Width; 4] = [Width::W8, Width::W16, Width::W32, Width::W64];

    pub fn bits(self) -> usize {
        match self {
            Width::W8 => 8,
            Width::W16 => 16,
            Width::W32 => 32,
            Width::W64 => 64,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() / 8
    }

    /// Largest unsigned value representable at this width.
    pub fn max_unsigned(self) -> u64 {
        crate::bits::mask(self.bits())
    }

    pub fn min_signed(self) -> i64 {
        crate::bits::sign_extend(1u64 << (self.bits() - 1), self.bits())
    }

    pub fn max_signed(self) -> i64 {
        (self.max_unsigned() >> 1) as i64
    }

    pub fn from_bits(bits: usize) -> Result<Self> {
        match bits {
            8 => Ok(Width::W8),
            16 => Ok(Width::W16),
            32 => Ok(Width::W32),
            64 => Ok(Width::W64),
            other => Err(Error::width("8, 16, 32 or 64", other)),
        }
    }

    pub fn from_byte_len(len: usize) -> Result<Self> {
        Self::from_bits(len.saturating_mul(8))
    }

    /// Narrowest width whose unsigned range holds `value`.
    pub fn smallest_for(value: u64) -> Self {
        Self::ALL
            .into_iter()
            .find(|w| value <= w.max_unsigned())
            .unwrap_or(Width::W64)
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-bit", self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        assert_eq!(Width::from_bits(32).unwrap(), Width::W32);
        assert!(matches!(
            Width::from_bits(24),
            Err(Error::WidthMismatch { actual: 24, .. })
        ));
    }

    #[test]
    fn test_ranges() {
        assert_eq!(Width::W8.max_unsigned(), 255);
        assert_eq!(Width::W8.min_signed(), -128);
        assert_eq!(Width::W8.max_signed(), 127);
        assert_eq!(Width::W64.max_unsigned(), u64::MAX);
        assert_eq!(Width::W64.min_signed(), i64::MIN);
        assert_eq!(Width::W64.max_signed(), i64::MAX);
    }

    #[test]
    fn test_smallest_for() {
        assert_eq!(Width::smallest_for(0), Width::W8);
        assert_eq!(Width::smallest_for(256), Width::W16);
        assert_eq!(Width::smallest_for(0x1_0000), Width::W32);
        assert_eq!(Width::smallest_for(u64::MAX), Width::W64);
    }
}
