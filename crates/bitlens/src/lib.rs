//! # bitlens
//!
//! Shows what a fixed-width bit pattern means under several readings at
//! once: unsigned and two's-complement integers, IEEE-754 floats (binary16,
//! binary32 and binary64) and characters under pluggable code tables.
//!
//! Bit index 0 is the most significant bit; bytes are big-endian.
//!
//! ## Example
//!
//! ```
//! use bitlens::pattern::BitPattern;
//! use bitlens::report::InterpretationReport;
//! use bitlens::float::{FloatClass, FloatValue};
//! use bitlens::width::Width;
//!
//! let pattern = BitPattern::from_u64(0x3F80_0000, Width::W32).unwrap();
//! let report = InterpretationReport::build(&pattern);
//!
//! assert_eq!(report.integer.unsigned, 1_065_353_216);
//! let float = report.float.unwrap();
//! assert_eq!(float.class, FloatClass::Normal);
//! assert_eq!(float.value, FloatValue::Finite(1.0));
//!
//! let flip = InterpretationReport::flip(&pattern, 0).unwrap();
//! assert_eq!(flip.float_values().unwrap().1, FloatValue::Finite(-1.0));
//! ```

pub mod bits;
pub mod chars;
pub mod errors;
pub mod float;
pub mod integer;
pub mod literal;
pub mod pattern;
pub mod report;
#[cfg(feature = "serde")]
pub mod serde;
pub mod tables;
pub mod width;

pub use errors::{Error, Result};
pub use pattern::BitPattern;
pub use report::{InterpretationReport, Interpreter, ReportConfig};
pub use width::Width;
