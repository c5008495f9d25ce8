//! Literal parsing and normalization into [BitPattern]s.
//!
//! | prefix              | meaning                                   |
//! |---------------------|-------------------------------------------|
//! | `0b0100_0001`       | binary digits (`_` ignored)               |
//! | `0x3F80_0000`       | hexadecimal digits (`_` ignored)          |
//! | `0f-1.5`            | floating-point number                     |
//! | `0ui65`             | unsigned integer                          |
//! | `0i-2`              | signed integer                            |
//! | `0s#cp1252#text`    | text encoded with a named table           |
//! | `0sb64#QQ==`        | base64 bytes (standard or URL alphabet)   |
//! | anything else       | UTF-8 text                                |

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};

use crate::{
    chars::{self, TableRegistry, UTF_8},
    errors::{Error, Result},
    float, integer,
    pattern::BitPattern,
    width::Width,
};

/// A parsed input value, not yet tied to a width.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Binary { value: u64, digits: usize },
    Hex { value: u64, digits: usize },
    Float(f64),
    Unsigned(u64),
    Signed(i64),
    /// Text with a table name; `None` means UTF-8.
    Text { encoding: Option<String>, text: String },
    Base64(Vec<u8>),
}

impl Literal {
    pub fn parse(input: &str) -> Result<Self> {
        if let Some(digits) = input.strip_prefix("0b") {
            let (value, digits) = parse_digits(input, digits, 2)?;
            return Ok(Literal::Binary { value, digits });
        }
        if let Some(digits) = input.strip_prefix("0x") {
            let (value, digits) = parse_digits(input, digits, 16)?;
            return Ok(Literal::Hex { value, digits });
        }
        if let Some(number) = input.strip_prefix("0f") {
            return number
                .parse::<f64>()
                .map(Literal::Float)
                .map_err(|e| Error::literal(input, e.to_string()));
        }
        if let Some(number) = input.strip_prefix("0ui") {
            return number
                .parse::<u64>()
                .map(Literal::Unsigned)
                .map_err(|e| Error::literal(input, e.to_string()));
        }
        if let Some(number) = input.strip_prefix("0i") {
            return number
                .parse::<i64>()
                .map(Literal::Signed)
                .map_err(|e| Error::literal(input, e.to_string()));
        }
        if let Some(encoded) = input.strip_prefix("0sb64#") {
            return decode_base64(encoded)
                .map(Literal::Base64)
                .ok_or_else(|| Error::literal(input, "invalid base64"));
        }
        if let Some(rest) = input.strip_prefix("0s#") {
            let (encoding, text) = rest
                .split_once('#')
                .ok_or_else(|| Error::literal(input, "expected 0s#<encoding>#<text>"))?;
            let encoding = (encoding != UTF_8).then(|| encoding.to_string());
            return Ok(Literal::Text {
                encoding,
                text: text.to_string(),
            });
        }

        Ok(Literal::Text {
            encoding: None,
            text: input.to_string(),
        })
    }

    /// Raw bytes for text and base64 literals; `None` for numeric literals.
    pub fn bytes(&self, registry: &TableRegistry) -> Result<Option<Vec<u8>>> {
        Ok(self.encoded(registry)?.map(|(bytes, _)| bytes))
    }

    /// Bytes together with the code unit width they were written in.
    fn encoded(&self, registry: &TableRegistry) -> Result<Option<(Vec<u8>, Width)>> {
        match self {
            Literal::Text {
                encoding: None,
                text,
            } => Ok(Some((text.as_bytes().to_vec(), Width::W8))),
            Literal::Text {
                encoding: Some(name),
                text,
            } => {
                let table = registry.get(name)?;
                let unit = Width::from_bits(table.unit_bits())?;
                let bytes = chars::encode_bytes(text, table.as_ref(), unit.bits())?;
                Ok(Some((bytes, unit)))
            }
            Literal::Base64(bytes) => Ok(Some((bytes.clone(), Width::W8))),
            _ => Ok(None),
        }
    }

    /// Normalizes the literal into patterns.
    ///
    /// Numeric literals produce one pattern and fail with a range error when
    /// they do not fit `width`. Without a width, binary and hex literals use
    /// their digit count when it matches a width, integers the narrowest
    /// fitting width and floats 64 bits. Byte literals are chunked by `width`;
    /// without one they form a single pattern when their length is a width,
    /// else one pattern per code unit of their table (bytes for UTF-8 and
    /// base64).
    pub fn patterns(&self, width: Option<Width>, registry: &TableRegistry) -> Result<Vec<BitPattern>> {
        let patterns = match self {
            Literal::Binary { value, digits } => vec![digits_pattern(*value, *digits, 1, width)?],
            Literal::Hex { value, digits } => vec![digits_pattern(*value, *digits, 4, width)?],
            Literal::Unsigned(value) => {
                let width = width.unwrap_or_else(|| Width::smallest_for(*value));
                vec![integer::encode_unsigned(*value, width)?]
            }
            Literal::Signed(value) => {
                let width = width.unwrap_or_else(|| smallest_signed(*value));
                vec![integer::encode_signed(*value, width)?]
            }
            Literal::Float(value) => vec![float_pattern(*value, width.unwrap_or(Width::W64))?],
            Literal::Text { .. } | Literal::Base64(_) => match self.encoded(registry)? {
                Some((bytes, unit)) => bytes_patterns(&bytes, width, unit)?,
                None => Vec::new(),
            },
        };

        tracing::debug!(
            literal = ?self,
            count = patterns.len(),
            "normalized literal"
        );

        Ok(patterns)
    }
}

impl FromStr for Literal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Literal::parse(s)
    }
}

fn parse_digits(input: &str, digits: &str, radix: u32) -> Result<(u64, usize)> {
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(Error::literal(input, "no digits"));
    }

    let value = u64::from_str_radix(&cleaned, radix).map_err(|e| match e.kind() {
        std::num::IntErrorKind::PosOverflow => Error::range(input, "64 bits"),
        _ => Error::literal(input, e.to_string()),
    })?;

    Ok((value, cleaned.len()))
}

fn digits_pattern(value: u64, digits: usize, bits_per_digit: usize, width: Option<Width>) -> Result<BitPattern> {
    let width = match width {
        Some(width) => width,
        None => Width::from_bits(digits * bits_per_digit).unwrap_or_else(|_| Width::smallest_for(value)),
    };

    BitPattern::from_u64(value, width)
}

fn smallest_signed(value: i64) -> Width {
    Width::ALL
        .into_iter()
        .find(|w| value >= w.min_signed() && value <= w.max_signed())
        .unwrap_or(Width::W64)
}

fn float_pattern(value: f64, width: Width) -> Result<BitPattern> {
    match width {
        Width::W64 => Ok(float::from_f64(value)),
        Width::W32 => {
            let narrowed = value as f32;
            if value.is_finite() && narrowed.is_infinite() {
                return Err(Error::range(value, "binary32"));
            }
            Ok(float::from_f32(narrowed))
        }
        Width::W8 | Width::W16 => Err(Error::width("32 or 64", width.bits())),
    }
}

fn bytes_patterns(bytes: &[u8], width: Option<Width>, unit: Width) -> Result<Vec<BitPattern>> {
    let width = match width {
        Some(width) => width,
        None => Width::from_byte_len(bytes.len()).unwrap_or(unit),
    };

    let patterns = BitPattern::chunks(bytes, width);
    if patterns.is_empty() {
        return Err(Error::width(width.to_string(), bytes.len() * 8));
    }

    Ok(patterns)
}

fn decode_base64(encoded: &str) -> Option<Vec<u8>> {
    [&STANDARD, &URL_SAFE, &STANDARD_NO_PAD, &URL_SAFE_NO_PAD]
        .into_iter()
        .find_map(|engine| engine.decode(encoded).ok())
}
