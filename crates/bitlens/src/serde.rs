//! JSON-deserializable report configuration.
//!
//! These types describe which character views a report contains and any
//! extra single-byte tables to register. They are converted into a
//! [crate::report::ReportConfig] with `TryFrom`.
//!
//! ```json
//! {
//!   "views": [{ "encoding": "latin_1" }, { "encoding": "utf_16", "unit_bits": 16 }],
//!   "tables": [{ "name": "latin_1_star", "mapped_below": 256, "overrides": { "0x2A": "★" } }]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    chars::SingleByteTable,
    errors::{Error, Result},
};

/// Top-level configuration. An empty `views` list means every registered table.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ReportConfigDef {
    #[serde(default)]
    pub views: Vec<ViewDef>,
    #[serde(default)]
    pub tables: Vec<TableDef>,
}

/// One character view of the report.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ViewDef {
    /// Registered table name, e.g. `cp1252`.
    pub encoding: String,
    /// Unit width in bits; defaults to the table's own unit width.
    #[serde(default)]
    pub unit_bits: Option<usize>,
}

/// A single-byte table defined in configuration.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TableDef {
    pub name: String,
    /// Bytes below this value map to the same code point.
    #[serde(default = "default_mapped_below")]
    pub mapped_below: u16,
    /// Byte (decimal or `0x` hex) to character; `null` marks the byte undefined.
    #[serde(default)]
    pub overrides: BTreeMap<String, Option<char>>,
}

fn default_mapped_below() -> u16 {
    0x80
}

impl TableDef {
    pub fn try_into_table(self) -> Result<SingleByteTable> {
        if self.name.trim().is_empty() {
            return Err(Error::UnknownEncoding(self.name));
        }
        if self.mapped_below > 0x100 {
            return Err(Error::range(self.mapped_below, "single-byte table bound"));
        }

        let overrides = self
            .overrides
            .iter()
            .map(|(key, character)| Ok((parse_byte(key)?, *character)))
            .collect::<Result<Vec<_>>>()?;

        Ok(SingleByteTable::new(self.name, self.mapped_below, overrides))
    }
}

fn parse_byte(key: &str) -> Result<u8> {
    let parsed = match key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => key.parse::<u8>(),
    };

    parsed.map_err(|_| Error::literal(key, "expected a byte value"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        chars::CodeTable,
        pattern::BitPattern,
        report::{Interpreter, ReportConfig},
        width::Width,
    };

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "views": [{ "encoding": "latin_1_star" }, { "encoding": "utf_16", "unit_bits": 16 }],
            "tables": [{ "name": "latin_1_star", "mapped_below": 256, "overrides": { "0x2A": "★", "65": null } }]
        }"#;

        let def: ReportConfigDef = serde_json::from_str(json).unwrap();
        let config = ReportConfig::try_from(def).unwrap();
        assert_eq!(config.views(), vec![("latin_1_star", 8), ("utf_16", 16)]);

        let report = Interpreter::new(config).build(&BitPattern::from_u64(0x2A41, Width::W16).unwrap());
        assert_eq!(report.characters[0].render('?'), "★?");
        assert_eq!(report.characters[1].render('?'), "\u{2A41}");
    }

    #[test]
    fn test_empty_config_uses_every_table() {
        let def: ReportConfigDef = serde_json::from_str("{}").unwrap();
        let config = ReportConfig::try_from(def).unwrap();
        assert_eq!(config.views().len(), config.registry().names().len());
    }

    #[test]
    fn test_unknown_view() {
        let def: ReportConfigDef =
            serde_json::from_str(r#"{ "views": [{ "encoding": "ebcdic" }] }"#).unwrap();
        assert_eq!(
            ReportConfig::try_from(def).unwrap_err(),
            Error::UnknownEncoding("ebcdic".to_string())
        );
    }

    #[test]
    fn test_bad_override_key() {
        let table = TableDef {
            name: "broken".to_string(),
            mapped_below: 0x80,
            overrides: BTreeMap::from([("0x100".to_string(), Some('x'))]),
        };
        assert!(matches!(
            table.try_into_table(),
            Err(Error::InvalidLiteral { .. })
        ));
    }

    #[test]
    fn test_default_mapped_below() {
        let table: TableDef = serde_json::from_str(r#"{ "name": "seven_bit" }"#).unwrap();
        let table = table.try_into_table().unwrap();
        assert_eq!(table.decode(0x7F), Some('\u{7F}'));
        assert_eq!(table.decode(0x80), None);
    }
}
