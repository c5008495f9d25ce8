//! Error type shared by every encode-direction operation.
//!
//! Decoding a well-formed [crate::pattern::BitPattern] never fails; the
//! variants below only come out of constructors, encoders and bit indexing.

use thiserror::Error;

/// Errors produced while building bit patterns or encoding values into them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Input size does not match a supported width, or a unit width does not
    /// evenly divide the pattern width.
    #[error("width mismatch: expected {expected}, got {actual} bits")]
    WidthMismatch { expected: String, actual: usize },

    /// Numeric value is out of range for the target width or field.
    #[error("value {value} out of range for {target}")]
    Range { value: String, target: String },

    /// Bit index is outside `[0, width - 1]`.
    #[error("bit index {index} out of range for a {width}-bit pattern")]
    IndexOutOfRange { index: usize, width: usize },

    /// Character has no entry in the selected encoding table.
    #[error("character {character:?} cannot be encoded with {encoding}")]
    UnencodableCharacter { character: char, encoding: String },

    /// Literal text could not be parsed.
    #[error("invalid literal {literal:?}: {reason}")]
    InvalidLiteral { literal: String, reason: String },

    /// No encoding table is registered under this name.
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn range(value: impl ToString, target: impl Into<String>) -> Self {
        Error::Range {
            value: value.to_string(),
            target: target.into(),
        }
    }

    pub(crate) fn width(expected: impl Into<String>, actual: usize) -> Self {
        Error::WidthMismatch {
            expected: expected.into(),
            actual,
        }
    }

    pub(crate) fn literal(literal: &str, reason: impl Into<String>) -> Self {
        Error::InvalidLiteral {
            literal: literal.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::IndexOutOfRange {
            index: 32,
            width: 32,
        };
        assert_eq!(
            err.to_string(),
            "bit index 32 out of range for a 32-bit pattern"
        );

        let err = Error::UnencodableCharacter {
            character: 'é',
            encoding: "ascii".to_string(),
        };
        assert_eq!(err.to_string(), "character 'é' cannot be encoded with ascii");
    }

    #[test]
    fn test_range_helper() {
        assert_eq!(
            Error::range(256, "8-bit unsigned"),
            Error::Range {
                value: "256".to_string(),
                target: "8-bit unsigned".to_string()
            }
        );
    }
}
