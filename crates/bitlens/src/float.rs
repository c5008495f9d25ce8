//! IEEE 754 decomposition, classification and reconstruction.
//!
//! A pattern of width 16, 32 or 64 is read as binary16, binary32 or binary64.
//! Fields are laid out MSB-first: the sign is bit 0, followed by the biased
//! exponent and then the mantissa (trailing significand).
//!
//! NaNs are split by the top mantissa bit: 1 is quiet, 0 is signaling.
//! The bits below it are the NaN payload.

use std::{cmp::Ordering, fmt};

use crate::{
    bits,
    errors::{Error, Result},
    pattern::BitPattern,
    width::Width,
};

/// IEEE 754 binary interchange format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatFormat {
    Binary16,
    Binary32,
    Binary64,
}

impl FloatFormat {
    /// Format stored in a pattern of `width`; 8-bit patterns have none.
    pub fn for_width(width: Width) -> Result<Self> {
        match width {
            Width::W16 => Ok(FloatFormat::Binary16),
            Width::W32 => Ok(FloatFormat::Binary32),
            Width::W64 => Ok(FloatFormat::Binary64),
            Width::W8 => Err(Error::width("16, 32 or 64", width.bits())),
        }
    }

    pub fn width(self) -> Width {
        match self {
            FloatFormat::Binary16 => Width::W16,
            FloatFormat::Binary32 => Width::W32,
            FloatFormat::Binary64 => Width::W64,
        }
    }

    pub fn exponent_bits(self) -> usize {
        match self {
            FloatFormat::Binary16 => 5,
            FloatFormat::Binary32 => 8,
            FloatFormat::Binary64 => 11,
        }
    }

    pub fn mantissa_bits(self) -> usize {
        self.width().bits() - 1 - self.exponent_bits()
    }

    pub fn bias(self) -> i32 {
        (1 << (self.exponent_bits() - 1)) - 1
    }

    pub fn max_exponent(self) -> u64 {
        bits::mask(self.exponent_bits())
    }

    pub fn max_mantissa(self) -> u64 {
        bits::mask(self.mantissa_bits())
    }

    /// Field that bit `index` belongs to.
    pub fn field_of(self, index: usize) -> Result<FloatField> {
        let width = self.width().bits();
        match index {
            0 => Ok(FloatField::Sign),
            i if i <= self.exponent_bits() => Ok(FloatField::Exponent),
            i if i < width => Ok(FloatField::Mantissa),
            _ => Err(Error::IndexOutOfRange { index, width }),
        }
    }
}

/// One of the three IEEE 754 fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatField {
    Sign,
    Exponent,
    Mantissa,
}

/// Every pattern falls in exactly one class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatClass {
    PositiveZero,
    NegativeZero,
    Subnormal,
    Normal,
    PositiveInfinity,
    NegativeInfinity,
    QuietNaN,
    SignalingNaN,
}

impl FloatClass {
    pub fn is_nan(self) -> bool {
        matches!(self, FloatClass::QuietNaN | FloatClass::SignalingNaN)
    }

    pub fn is_infinite(self) -> bool {
        matches!(
            self,
            FloatClass::PositiveInfinity | FloatClass::NegativeInfinity
        )
    }

    pub fn is_zero(self) -> bool {
        matches!(self, FloatClass::PositiveZero | FloatClass::NegativeZero)
    }

    pub fn is_finite(self) -> bool {
        !self.is_nan() && !self.is_infinite()
    }
}

impl fmt::Display for FloatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FloatClass::PositiveZero => "+0",
            FloatClass::NegativeZero => "-0",
            FloatClass::Subnormal => "subnormal",
            FloatClass::Normal => "normal",
            FloatClass::PositiveInfinity => "+inf",
            FloatClass::NegativeInfinity => "-inf",
            FloatClass::QuietNaN => "qNaN",
            FloatClass::SignalingNaN => "sNaN",
        };
        f.write_str(label)
    }
}

/// Raw sign, biased exponent and mantissa of a float pattern.
///
/// Every field always fits its slot: values come from [decompose] or the
/// range-checked [FloatFields::new].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatFields {
    format: FloatFormat,
    sign: u8,
    exponent: u64,
    mantissa: u64,
}

impl FloatFields {
    /// Fails with a range error when a field is wider than its slot.
    pub fn new(format: FloatFormat, sign: u8, exponent: u64, mantissa: u64) -> Result<Self> {
        if sign > 1 {
            return Err(Error::range(sign, "sign bit"));
        }
        if exponent > format.max_exponent() {
            return Err(Error::range(
                exponent,
                format!("{}-bit exponent", format.exponent_bits()),
            ));
        }
        if mantissa > format.max_mantissa() {
            return Err(Error::range(
                mantissa,
                format!("{}-bit mantissa", format.mantissa_bits()),
            ));
        }

        Ok(Self {
            format,
            sign,
            exponent,
            mantissa,
        })
    }

    pub fn format(&self) -> FloatFormat {
        self.format
    }

    /// 0 for positive, 1 for negative.
    pub fn sign(&self) -> u8 {
        self.sign
    }

    /// Biased exponent.
    pub fn exponent(&self) -> u64 {
        self.exponent
    }

    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    pub fn class(&self) -> FloatClass {
        let exponent_all_ones = self.exponent == self.format.max_exponent();
        let quiet_bit = self.quiet_bit();

        match (self.exponent, self.mantissa) {
            (0, 0) if self.sign == 0 => FloatClass::PositiveZero,
            (0, 0) => FloatClass::NegativeZero,
            (0, _) => FloatClass::Subnormal,
            (_, 0) if exponent_all_ones && self.sign == 0 => FloatClass::PositiveInfinity,
            (_, 0) if exponent_all_ones => FloatClass::NegativeInfinity,
            (_, m) if exponent_all_ones && m & quiet_bit != 0 => FloatClass::QuietNaN,
            _ if exponent_all_ones => FloatClass::SignalingNaN,
            _ => FloatClass::Normal,
        }
    }

    /// Exponent with the bias removed; subnormals use `1 - bias`. `None` for
    /// zeros, infinities and NaNs.
    pub fn unbiased_exponent(&self) -> Option<i32> {
        match self.class() {
            FloatClass::Normal => Some(self.exponent as i32 - self.format.bias()),
            FloatClass::Subnormal => Some(1 - self.format.bias()),
            _ => None,
        }
    }

    /// Significand including the implicit leading bit for normals, in `[0, 2)`.
    /// `None` for infinities and NaNs.
    pub fn significand(&self) -> Option<f64> {
        let fraction = self.mantissa as f64 / (1u64 << self.format.mantissa_bits()) as f64;
        match self.class() {
            FloatClass::Normal => Some(1.0 + fraction),
            FloatClass::Subnormal | FloatClass::PositiveZero | FloatClass::NegativeZero => {
                Some(fraction)
            }
            _ => None,
        }
    }

    /// Number for normal and subnormal values, the class otherwise.
    pub fn value(&self) -> FloatValue {
        match self.class() {
            FloatClass::Normal | FloatClass::Subnormal => FloatValue::Finite(self.to_f64()),
            class => FloatValue::Special(class),
        }
    }

    /// Native value of the fields, NaN and infinities included.
    pub fn to_f64(&self) -> f64 {
        match self.format {
            FloatFormat::Binary32 => f32::from_bits(self.raw() as u32) as f64,
            FloatFormat::Binary64 => f64::from_bits(self.raw()),
            FloatFormat::Binary16 => {
                let sign = if self.sign == 1 { -1.0 } else { 1.0 };
                match (
                    self.class(),
                    self.significand(),
                    self.unbiased_exponent(),
                ) {
                    (class, _, _) if class.is_nan() => f64::NAN,
                    (class, _, _) if class.is_infinite() => sign * f64::INFINITY,
                    (_, Some(significand), Some(exponent)) => {
                        sign * significand * 2f64.powi(exponent)
                    }
                    _ => sign * 0.0,
                }
            }
        }
    }

    /// Mantissa bits below the quiet bit; `None` unless the fields are a NaN.
    pub fn nan_payload(&self) -> Option<u64> {
        self.class()
            .is_nan()
            .then(|| self.mantissa & (self.quiet_bit() - 1))
    }

    /// Non-NaN encodings are all canonical. A NaN is canonical only as the
    /// default quiet NaN, i.e. with an empty payload.
    pub fn is_canonical(&self) -> bool {
        match self.class() {
            FloatClass::QuietNaN => self.nan_payload() == Some(0),
            FloatClass::SignalingNaN => false,
            _ => true,
        }
    }

    /// Absolute value: the same fields with a positive sign, NaNs included.
    pub fn with_sign_cleared(&self) -> Self {
        Self { sign: 0, ..*self }
    }

    /// Grouped bit string `s_eeeee_mmmmmmmmmm`.
    pub fn bit_string(&self) -> String {
        format!(
            "{}_{:0e$b}_{:0m$b}",
            self.sign,
            self.exponent,
            self.mantissa,
            e = self.format.exponent_bits(),
            m = self.format.mantissa_bits()
        )
    }

    fn quiet_bit(&self) -> u64 {
        1u64 << (self.format.mantissa_bits() - 1)
    }

    /// Unsigned key whose order is the IEEE 754 total order: negative
    /// encodings are inverted, positive ones lifted above them.
    fn total_order_key(&self) -> u64 {
        let width = self.format.width().bits();
        let raw = self.raw();

        if self.sign == 1 {
            !raw & bits::mask(width)
        } else {
            raw | (1u64 << (width - 1))
        }
    }

    fn raw(&self) -> u64 {
        let mantissa_bits = self.format.mantissa_bits();
        let width = self.format.width().bits();
        ((self.sign as u64) << (width - 1)) | (self.exponent << mantissa_bits) | self.mantissa
    }
}

/// Result of [evaluate]: a number for normal and subnormal values, the class otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FloatValue {
    Finite(f64),
    Special(FloatClass),
}

impl fmt::Display for FloatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FloatValue::Finite(v) if (1e-6..1e16).contains(&v.abs()) => write!(f, "{v}"),
            FloatValue::Finite(v) => write!(f, "{v:e}"),
            FloatValue::Special(class) => write!(f, "{class}"),
        }
    }
}

/// Splits a 16, 32 or 64-bit pattern into its IEEE 754 fields.
pub fn decompose(pattern: &BitPattern) -> Result<FloatFields> {
    let format = FloatFormat::for_width(pattern.width())?;
    let width = format.width().bits();
    let exponent_bits = format.exponent_bits();
    let value = pattern.value();

    Ok(FloatFields {
        format,
        sign: bits::extract(value, width, 0, 1) as u8,
        exponent: bits::extract(value, width, 1, exponent_bits),
        mantissa: bits::extract(value, width, 1 + exponent_bits, format.mantissa_bits()),
    })
}

/// Inverse of [decompose].
pub fn reconstruct(fields: &FloatFields) -> BitPattern {
    BitPattern::masked(fields.raw(), fields.format.width())
}

pub fn classify(pattern: &BitPattern) -> Result<FloatClass> {
    Ok(decompose(pattern)?.class())
}

/// Numeric value for normal and subnormal patterns, the class label otherwise.
pub fn evaluate(pattern: &BitPattern) -> Result<FloatValue> {
    Ok(decompose(pattern)?.value())
}

/// IEEE 754 `totalOrder` comparison of two patterns of the same format.
///
/// From lowest to highest: -qNaN, -sNaN, -inf, negative finites, -0, +0,
/// positive finites, +inf, +sNaN, +qNaN. NaNs of one sign are further ordered
/// by payload, larger payloads lying further from zero.
pub fn total_cmp(a: &BitPattern, b: &BitPattern) -> Result<Ordering> {
    let (a, b) = (decompose(a)?, decompose(b)?);
    if a.format != b.format {
        return Err(Error::width(a.format.width().to_string(), b.format.width().bits()));
    }

    Ok(a.total_order_key().cmp(&b.total_order_key()))
}

/// `totalOrder(a, b)`: true when `a` orders at or below `b`.
pub fn total_order(a: &BitPattern, b: &BitPattern) -> Result<bool> {
    Ok(total_cmp(a, b)?.is_le())
}

/// `totalOrderMag(a, b)`: [total_order] of the absolute values.
pub fn total_order_mag(a: &BitPattern, b: &BitPattern) -> Result<bool> {
    total_order(&abs(a)?, &abs(b)?)
}

/// The pattern with its sign bit cleared.
pub fn abs(pattern: &BitPattern) -> Result<BitPattern> {
    Ok(reconstruct(&decompose(pattern)?.with_sign_cleared()))
}

pub fn from_f64(value: f64) -> BitPattern {
    BitPattern::masked(value.to_bits(), Width::W64)
}

pub fn from_f32(value: f32) -> BitPattern {
    BitPattern::masked(value.to_bits() as u64, Width::W32)
}

/// A pattern together with its float fields and value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatReading {
    pub pattern: BitPattern,
    pub fields: FloatFields,
    pub value: FloatValue,
}

impl FloatReading {
    pub fn of(pattern: &BitPattern) -> Result<Self> {
        let fields = decompose(pattern)?;
        Ok(Self {
            pattern: *pattern,
            fields,
            value: fields.value(),
        })
    }
}

/// Before/after readings around a single bit flip.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatFlip {
    pub index: usize,
    pub field: FloatField,
    pub before: FloatReading,
    pub after: FloatReading,
}

/// Flips bit `index` and re-reads the pattern as a float.
pub fn flip_bit_and_reevaluate(pattern: &BitPattern, index: usize) -> Result<FloatFlip> {
    let format = FloatFormat::for_width(pattern.width())?;
    let flipped = pattern.with_bit_flipped(index)?;
    let field = format.field_of(index)?;

    let before = FloatReading::of(pattern)?;
    let after = FloatReading::of(&flipped)?;

    tracing::trace!(
        index,
        ?field,
        before = %before.value,
        after = %after.value,
        "flipped float bit"
    );

    Ok(FloatFlip {
        index,
        field,
        before,
        after,
    })
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn binary32_roundtrip(raw in any::<u32>()) {
            let pattern = BitPattern::from_u64(raw as u64, Width::W32).unwrap();
            prop_assert_eq!(reconstruct(&decompose(&pattern).unwrap()), pattern);
        }

        #[test]
        fn binary64_roundtrip(raw in any::<u64>()) {
            let pattern = BitPattern::from_u64(raw, Width::W64).unwrap();
            prop_assert_eq!(reconstruct(&decompose(&pattern).unwrap()), pattern);
        }

        #[test]
        fn binary64_class_agrees_with_std(raw in any::<u64>()) {
            let value = f64::from_bits(raw);
            let class = classify(&from_f64(value)).unwrap();

            prop_assert_eq!(class.is_nan(), value.is_nan());
            prop_assert_eq!(class.is_infinite(), value.is_infinite());
            prop_assert_eq!(class.is_zero(), value == 0.0);
            prop_assert_eq!(class == FloatClass::Subnormal, value.is_subnormal());
            prop_assert_eq!(class == FloatClass::Normal, value.is_normal());
        }

        #[test]
        fn binary32_evaluate_matches_std(raw in any::<u32>()) {
            let value = f32::from_bits(raw);
            let pattern = BitPattern::from_u64(raw as u64, Width::W32).unwrap();

            if let FloatValue::Finite(v) = evaluate(&pattern).unwrap() {
                prop_assert_eq!(v, value as f64);
            } else {
                prop_assert!(!value.is_normal() && !value.is_subnormal());
            }
        }

        #[test]
        fn total_cmp_matches_std_binary64(a in any::<u64>(), b in any::<u64>()) {
            let expected = f64::from_bits(a).total_cmp(&f64::from_bits(b));
            let actual = total_cmp(
                &BitPattern::from_u64(a, Width::W64).unwrap(),
                &BitPattern::from_u64(b, Width::W64).unwrap(),
            )
            .unwrap();
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn total_cmp_matches_std_binary32(a in any::<u32>(), b in any::<u32>()) {
            let expected = f32::from_bits(a).total_cmp(&f32::from_bits(b));
            prop_assert_eq!(total_cmp(&from_f32(f32::from_bits(a)), &from_f32(f32::from_bits(b))).unwrap(), expected);
        }

        #[test]
        fn binary16_roundtrip(raw in any::<u16>()) {
            let pattern = BitPattern::from_u64(raw as u64, Width::W16).unwrap();
            prop_assert_eq!(reconstruct(&decompose(&pattern).unwrap()), pattern);
        }
    }
}
