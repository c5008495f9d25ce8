//! Built-in code tables.
//!
//! Single-byte tables are data only: an identity range plus overrides.
//! Adding a variant means adding a table here (or registering one at runtime),
//! never touching the decoder.

use std::sync::Arc;

use crate::chars::{CodeTable, SingleByteTable, UnicodeTable};

pub static ASCII: SingleByteTable = SingleByteTable::new_static("ascii", 0x80, &[]);

pub static LATIN_1: SingleByteTable = SingleByteTable::new_static("latin_1", 0x100, &[]);

pub static CP1252: SingleByteTable = SingleByteTable::new_static("cp1252", 0x100, CP1252_HIGH);

pub static ISO8859_15: SingleByteTable =
    SingleByteTable::new_static("iso8859_15", 0x100, ISO8859_15_DIFF);

pub static MAC_ROMAN: SingleByteTable =
    SingleByteTable::new_static("mac_roman", 0x80, MAC_ROMAN_HIGH);

/// Big-endian UTF-16 code units. Lone surrogates are unmapped.
pub static UTF_16: UnicodeTable = UnicodeTable::new_static("utf_16", 16);

/// Big-endian UTF-32 code units.
pub static UTF_32: UnicodeTable = UnicodeTable::new_static("utf_32", 32);

/// Every built-in table, single-byte tables first.
pub fn builtin() -> Vec<Arc<dyn CodeTable>> {
    vec![
        Arc::new(ASCII.clone()),
        Arc::new(CP1252.clone()),
        Arc::new(LATIN_1.clone()),
        Arc::new(ISO8859_15.clone()),
        Arc::new(MAC_ROMAN.clone()),
        Arc::new(UTF_16.clone()),
        Arc::new(UTF_32.clone()),
    ]
}

// 0x80..=0x9F differ from Latin-1; five bytes are undefined.
const CP1252_HIGH: &[(u8, Option<char>)] = &[
    (0x80, Some('\u{20AC}')),
    (0x81, None),
    (0x82, Some('\u{201A}')),
    (0x83, Some('\u{0192}')),
    (0x84, Some('\u{201E}')),
    (0x85, Some('\u{2026}')),
    (0x86, Some('\u{2020}')),
    (0x87, Some('\u{2021}')),
    (0x88, Some('\u{02C6}')),
    (0x89, Some('\u{2030}')),
    (0x8A, Some('\u{0160}')),
    (0x8B, Some('\u{2039}')),
    (0x8C, Some('\u{0152}')),
    (0x8D, None),
    (0x8E, Some('\u{017D}')),
    (0x8F, None),
    (0x90, None),
    (0x91, Some('\u{2018}')),
    (0x92, Some('\u{2019}')),
    (0x93, Some('\u{201C}')),
    (0x94, Some('\u{201D}')),
    (0x95, Some('\u{2022}')),
    (0x96, Some('\u{2013}')),
    (0x97, Some('\u{2014}')),
    (0x98, Some('\u{02DC}')),
    (0x99, Some('\u{2122}')),
    (0x9A, Some('\u{0161}')),
    (0x9B, Some('\u{203A}')),
    (0x9C, Some('\u{0153}')),
    (0x9D, None),
    (0x9E, Some('\u{017E}')),
    (0x9F, Some('\u{0178}')),
];

const ISO8859_15_DIFF: &[(u8, Option<char>)] = &[
    (0xA4, Some('\u{20AC}')),
    (0xA6, Some('\u{0160}')),
    (0xA8, Some('\u{0161}')),
    (0xB4, Some('\u{017D}')),
    (0xB8, Some('\u{017E}')),
    (0xBC, Some('\u{0152}')),
    (0xBD, Some('\u{0153}')),
    (0xBE, Some('\u{0178}')),
];

const MAC_ROMAN_HIGH: &[(u8, Option<char>)] = &[
    (0x80, Some('\u{00C4}')),
    (0x81, Some('\u{00C5}')),
    (0x82, Some('\u{00C7}')),
    (0x83, Some('\u{00C9}')),
    (0x84, Some('\u{00D1}')),
    (0x85, Some('\u{00D6}')),
    (0x86, Some('\u{00DC}')),
    (0x87, Some('\u{00E1}')),
    (0x88, Some('\u{00E0}')),
    (0x89, Some('\u{00E2}')),
    (0x8A, Some('\u{00E4}')),
    (0x8B, Some('\u{00E3}')),
    (0x8C, Some('\u{00E5}')),
    (0x8D, Some('\u{00E7}')),
    (0x8E, Some('\u{00E9}')),
    (0x8F, Some('\u{00E8}')),
    (0x90, Some('\u{00EA}')),
    (0x91, Some('\u{00EB}')),
    (0x92, Some('\u{00ED}')),
    (0x93, Some('\u{00EC}')),
    (0x94, Some('\u{00EE}')),
    (0x95, Some('\u{00EF}')),
    (0x96, Some('\u{00F1}')),
    (0x97, Some('\u{00F3}')),
    (0x98, Some('\u{00F2}')),
    (0x99, Some('\u{00F4}')),
    (0x9A, Some('\u{00F6}')),
    (0x9B, Some('\u{00F5}')),
    (0x9C, Some('\u{00FA}')),
    (0x9D, Some('\u{00F9}')),
    (0x9E, Some('\u{00FB}')),
    (0x9F, Some('\u{00FC}')),
    (0xA0, Some('\u{2020}')),
    (0xA1, Some('\u{00B0}')),
    (0xA2, Some('\u{00A2}')),
    (0xA3, Some('\u{00A3}')),
    (0xA4, Some('\u{00A7}')),
    (0xA5, Some('\u{2022}')),
    (0xA6, Some('\u{00B6}')),
    (0xA7, Some('\u{00DF}')),
    (0xA8, Some('\u{00AE}')),
    (0xA9, Some('\u{00A9}')),
    (0xAA, Some('\u{2122}')),
    (0xAB, Some('\u{00B4}')),
    (0xAC, Some('\u{00A8}')),
    (0xAD, Some('\u{2260}')),
    (0xAE, Some('\u{00C6}')),
    (0xAF, Some('\u{00D8}')),
    (0xB0, Some('\u{221E}')),
    (0xB1, Some('\u{00B1}')),
    (0xB2, Some('\u{2264}')),
    (0xB3, Some('\u{2265}')),
    (0xB4, Some('\u{00A5}')),
    (0xB5, Some('\u{00B5}')),
    (0xB6, Some('\u{2202}')),
    (0xB7, Some('\u{2211}')),
    (0xB8, Some('\u{220F}')),
    (0xB9, Some('\u{03C0}')),
    (0xBA, Some('\u{222B}')),
    (0xBB, Some('\u{00AA}')),
    (0xBC, Some('\u{00BA}')),
    (0xBD, Some('\u{03A9}')),
    (0xBE, Some('\u{00E6}')),
    (0xBF, Some('\u{00F8}')),
    (0xC0, Some('\u{00BF}')),
    (0xC1, Some('\u{00A1}')),
    (0xC2, Some('\u{00AC}')),
    (0xC3, Some('\u{221A}')),
    (0xC4, Some('\u{0192}')),
    (0xC5, Some('\u{2248}')),
    (0xC6, Some('\u{2206}')),
    (0xC7, Some('\u{00AB}')),
    (0xC8, Some('\u{00BB}')),
    (0xC9, Some('\u{2026}')),
    (0xCA, Some('\u{00A0}')),
    (0xCB, Some('\u{00C0}')),
    (0xCC, Some('\u{00C3}')),
    (0xCD, Some('\u{00D5}')),
    (0xCE, Some('\u{0152}')),
    (0xCF, Some('\u{0153}')),
    (0xD0, Some('\u{2013}')),
    (0xD1, Some('\u{2014}')),
    (0xD2, Some('\u{201C}')),
    (0xD3, Some('\u{201D}')),
    (0xD4, Some('\u{2018}')),
    (0xD5, Some('\u{2019}')),
    (0xD6, Some('\u{00F7}')),
    (0xD7, Some('\u{25CA}')),
    (0xD8, Some('\u{00FF}')),
    (0xD9, Some('\u{0178}')),
    (0xDA, Some('\u{2044}')),
    (0xDB, Some('\u{20AC}')),
    (0xDC, Some('\u{2039}')),
    (0xDD, Some('\u{203A}')),
    (0xDE, Some('\u{FB01}')),
    (0xDF, Some('\u{FB02}')),
    (0xE0, Some('\u{2021}')),
    (0xE1, Some('\u{00B7}')),
    (0xE2, Some('\u{201A}')),
    (0xE3, Some('\u{201E}')),
    (0xE4, Some('\u{2030}')),
    (0xE5, Some('\u{00C2}')),
    (0xE6, Some('\u{00CA}')),
    (0xE7, Some('\u{00C1}')),
    (0xE8, Some('\u{00CB}')),
    (0xE9, Some('\u{00C8}')),
    (0xEA, Some('\u{00CD}')),
    (0xEB, Some('\u{00CE}')),
    (0xEC, Some('\u{00CF}')),
    (0xED, Some('\u{00CC}')),
    (0xEE, Some('\u{00D3}')),
    (0xEF, Some('\u{00D4}')),
    (0xF0, Some('\u{F8FF}')),
    (0xF1, Some('\u{00D2}')),
    (0xF2, Some('\u{00DA}')),
    (0xF3, Some('\u{00DB}')),
    (0xF4, Some('\u{00D9}')),
    (0xF5, Some('\u{0131}')),
    (0xF6, Some('\u{02C6}')),
    (0xF7, Some('\u{02DC}')),
    (0xF8, Some('\u{00AF}')),
    (0xF9, Some('\u{02D8}')),
    (0xFA, Some('\u{02D9}')),
    (0xFB, Some('\u{02DA}')),
    (0xFC, Some('\u{00B8}')),
    (0xFD, Some('\u{02DD}')),
    (0xFE, Some('\u{02DB}')),
    (0xFF, Some('\u{02C7}')),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(table: &dyn CodeTable) -> Vec<Option<char>> {
        (0..=255u64).map(|b| table.decode(b)).collect()
    }

    #[test]
    fn test_ascii_range() {
        let decoded = decode_all(&ASCII);
        assert!(decoded[..0x80].iter().all(Option::is_some));
        assert!(decoded[0x80..].iter().all(Option::is_none));
    }

    #[test]
    fn test_cp1252_undefined_bytes() {
        let undefined: Vec<usize> = decode_all(&CP1252)
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(undefined, vec![0x81, 0x8D, 0x8F, 0x90, 0x9D]);
    }

    #[test]
    fn test_mac_roman_is_total_and_bijective() {
        let decoded: Vec<char> = decode_all(&MAC_ROMAN).into_iter().flatten().collect();
        assert_eq!(decoded.len(), 256);

        for (byte, character) in decoded.iter().enumerate() {
            assert_eq!(MAC_ROMAN.encode(*character), Some(byte as u64));
        }
    }

    #[test]
    fn test_iso8859_15_euro() {
        assert_eq!(ISO8859_15.decode(0xA4), Some('€'));
        assert_eq!(ISO8859_15.encode('¤'), None);
        assert_eq!(LATIN_1.decode(0xA4), Some('¤'));
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<String> = builtin().iter().map(|t| t.name().to_string()).collect();
        let total = names.len();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}
