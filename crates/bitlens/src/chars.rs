//! Character code unit decoding and string encoding.
//!
//! A pattern is split into fixed-width code units (MSB chunk first) and each
//! unit is looked up in a [CodeTable]. Units the table does not map come back
//! as [CodeUnit::Unmapped]; decoding never fails on content.

use std::{borrow::Cow, fmt, sync::Arc};

use crate::{
    bits,
    errors::{Error, Result},
    pattern::BitPattern,
    tables,
    width::Width,
};

/// Name of the whole-pattern UTF-8 view, also accepted as a text literal encoding.
pub const UTF_8: &str = "utf_8";

/// A named, finite mapping between code units and characters.
pub trait CodeTable: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    /// Unit width the encoding is defined for.
    fn unit_bits(&self) -> usize;

    fn decode(&self, unit: u64) -> Option<char>;

    fn encode(&self, character: char) -> Option<u64>;
}

/// Single-byte table: bytes below `mapped_below` map to the same code point,
/// unless listed in `overrides` (a `None` entry marks an undefined byte).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleByteTable {
    name: Cow<'static, str>,
    mapped_below: u16,
    overrides: Cow<'static, [(u8, Option<char>)]>,
}

impl SingleByteTable {
    pub const fn new_static(
        name: &'static str,
        mapped_below: u16,
        overrides: &'static [(u8, Option<char>)],
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            mapped_below,
            overrides: Cow::Borrowed(overrides),
        }
    }

    pub fn new(
        name: impl Into<String>,
        mapped_below: u16,
        overrides: Vec<(u8, Option<char>)>,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            mapped_below,
            overrides: Cow::Owned(overrides),
        }
    }
}

impl CodeTable for SingleByteTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_bits(&self) -> usize {
        8
    }

    fn decode(&self, unit: u64) -> Option<char> {
        let byte = u8::try_from(unit).ok()?;

        if let Some((_, mapped)) = self.overrides.iter().find(|(b, _)| *b == byte) {
            return *mapped;
        }

        (u16::from(byte) < self.mapped_below).then_some(char::from(byte))
    }

    fn encode(&self, character: char) -> Option<u64> {
        (0..=u8::MAX)
            .find(|&byte| self.decode(byte as u64) == Some(character))
            .map(u64::from)
    }
}

/// Unicode scalar values stored in fixed-width units (UTF-16 or UTF-32 code units).
///
/// Surrogates and values above the unit range are unmapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeTable {
    name: Cow<'static, str>,
    unit_bits: usize,
}

impl UnicodeTable {
    pub const fn new_static(name: &'static str, unit_bits: usize) -> Self {
        Self {
            name: Cow::Borrowed(name),
            unit_bits,
        }
    }
}

impl CodeTable for UnicodeTable {
    fn name(&self) -> &str {
        &self.name
    }

    fn unit_bits(&self) -> usize {
        self.unit_bits
    }

    fn decode(&self, unit: u64) -> Option<char> {
        if unit > bits::mask(self.unit_bits) {
            return None;
        }

        u32::try_from(unit).ok().and_then(char::from_u32)
    }

    fn encode(&self, character: char) -> Option<u64> {
        let code = character as u64;
        (code <= bits::mask(self.unit_bits)).then_some(code)
    }
}

/// One decoded code unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum CodeUnit {
    Mapped { raw: u64, character: char },
    Unmapped { raw: u64 },
}

impl CodeUnit {
    pub fn raw(&self) -> u64 {
        match self {
            CodeUnit::Mapped { raw, .. } | CodeUnit::Unmapped { raw } => *raw,
        }
    }

    pub fn character(&self) -> Option<char> {
        match self {
            CodeUnit::Mapped { character, .. } => Some(*character),
            CodeUnit::Unmapped { .. } => None,
        }
    }
}

/// All code units of a pattern under one table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CharacterView {
    pub encoding: String,
    pub unit_bits: usize,
    pub units: Vec<CodeUnit>,
}

impl CharacterView {
    /// Decoded text with every unmapped unit replaced by `placeholder`.
    pub fn render(&self, placeholder: char) -> String {
        self.units
            .iter()
            .map(|unit| unit.character().unwrap_or(placeholder))
            .collect()
    }

    pub fn unmapped_count(&self) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.character().is_none())
            .count()
    }
}

/// Splits `pattern` into `unit_bits` chunks and maps each through `table`.
///
/// Fails only when `unit_bits` is zero or does not divide the pattern width.
pub fn decode_units(
    pattern: &BitPattern,
    unit_bits: usize,
    table: &dyn CodeTable,
) -> Result<CharacterView> {
    let width = pattern.width().bits();
    if unit_bits == 0 || width % unit_bits != 0 {
        return Err(Error::width(format!("a divisor of {width}"), unit_bits));
    }

    let units = (0..width / unit_bits)
        .map(|i| {
            let raw = bits::extract(pattern.value(), width, i * unit_bits, unit_bits);
            match table.decode(raw) {
                Some(character) => CodeUnit::Mapped { raw, character },
                None => CodeUnit::Unmapped { raw },
            }
        })
        .collect();

    Ok(CharacterView {
        encoding: table.name().to_string(),
        unit_bits,
        units,
    })
}

/// Reads the pattern bytes as one UTF-8 sequence.
///
/// Each decoded character keeps its full encoded bytes as `raw`; each byte of
/// an invalid or truncated sequence becomes its own unmapped unit.
pub fn decode_utf8(pattern: &BitPattern) -> CharacterView {
    let bytes = pattern.to_bytes();
    let mut units = Vec::new();

    for chunk in bytes.utf8_chunks() {
        units.extend(chunk.valid().chars().map(|character| {
            let mut buf = [0u8; 4];
            CodeUnit::Mapped {
                raw: bits::from_be_bytes(character.encode_utf8(&mut buf).as_bytes()),
                character,
            }
        }));
        units.extend(
            chunk
                .invalid()
                .iter()
                .map(|&byte| CodeUnit::Unmapped { raw: byte as u64 }),
        );
    }

    CharacterView {
        encoding: UTF_8.to_string(),
        unit_bits: 8,
        units,
    }
}

/// Encodes every character of `text` as a big-endian `unit_bits` unit.
///
/// `unit_bits` must be 8, 16, 32 or 64. The output may have any length.
pub fn encode_bytes(text: &str, table: &dyn CodeTable, unit_bits: usize) -> Result<Vec<u8>> {
    let unit = Width::from_bits(unit_bits)?;
    let mut out = Vec::with_capacity(text.len() * unit.bytes());

    for character in text.chars() {
        let code = table
            .encode(character)
            .filter(|code| *code <= unit.max_unsigned())
            .ok_or_else(|| Error::UnencodableCharacter {
                character,
                encoding: table.name().to_string(),
            })?;

        out.extend(bits::to_be_bytes(code, unit.bytes()));
    }

    Ok(out)
}

/// Encodes `text` into a single pattern of width `unit_bits * chars`.
pub fn encode_string(text: &str, table: &dyn CodeTable, unit_bits: usize) -> Result<BitPattern> {
    let bytes = encode_bytes(text, table, unit_bits)?;
    let width = Width::from_bits(bytes.len() * 8)?;

    BitPattern::from_bytes(&bytes, width)
}

/// Lookup of tables by name. Registering a table under an existing name replaces it.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    tables: Vec<Arc<dyn CodeTable>>,
}

impl TableRegistry {
    pub fn empty() -> Self {
        Self { tables: Vec::new() }
    }

    /// Registry holding every built-in table of [crate::tables].
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for table in tables::builtin() {
            registry.register(table);
        }

        registry
    }

    pub fn register(&mut self, table: Arc<dyn CodeTable>) -> &mut Self {
        self.tables.retain(|t| t.name() != table.name());
        self.tables.push(table);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn CodeTable>> {
        self.tables
            .iter()
            .find(|t| t.name() == name)
            .cloned()
            .ok_or_else(|| Error::UnknownEncoding(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn CodeTable>> {
        self.tables.iter()
    }
}

impl Default for TableRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
