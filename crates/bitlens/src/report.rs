//! Aggregated interpretations of one pattern.
//!
//! Building a report never fails: every codec used here runs in its decode
//! direction, and character views whose unit width does not divide the
//! pattern width are skipped.

use std::sync::Arc;

use crate::{
    chars::{self, CharacterView, CodeTable, TableRegistry},
    errors::{Error, Result},
    float::{self, FloatClass, FloatField, FloatFields, FloatFormat, FloatValue},
    integer::{self, IntegerView},
    pattern::BitPattern,
    width::Width,
};

/// Which (table, unit width) views a report contains.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    registry: TableRegistry,
    views: Vec<(Arc<dyn CodeTable>, usize)>,
}

impl ReportConfig {
    /// No character views; tables are looked up in `registry`.
    pub fn new(registry: TableRegistry) -> Self {
        Self {
            registry,
            views: Vec::new(),
        }
    }

    /// Every built-in table at its natural unit width.
    pub fn builtin() -> Self {
        let registry = TableRegistry::builtin();
        let views = registry
            .iter()
            .map(|table| (Arc::clone(table), table.unit_bits()))
            .collect();

        Self { registry, views }
    }

    /// Adds a view of the registered table `encoding` with `unit_bits` units.
    pub fn add_view(&mut self, encoding: &str, unit_bits: usize) -> Result<&mut Self> {
        if unit_bits == 0 || unit_bits > 64 {
            return Err(Error::width("1 to 64", unit_bits));
        }

        let table = self.registry.get(encoding)?;
        self.views.push((table, unit_bits));
        Ok(self)
    }

    pub fn register(&mut self, table: Arc<dyn CodeTable>) -> &mut Self {
        self.registry.register(table);
        self
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    /// `(encoding, unit_bits)` of every configured view, in report order.
    pub fn views(&self) -> Vec<(&str, usize)> {
        self.views
            .iter()
            .map(|(table, unit_bits)| (table.name(), *unit_bits))
            .collect()
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Float reading of a 16, 32 or 64-bit pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FloatView {
    pub fields: FloatFields,
    pub class: FloatClass,
    pub value: FloatValue,
    pub unbiased_exponent: Option<i32>,
    pub significand: Option<f64>,
    pub grouped_bits: String,
}

impl FloatView {
    fn of(fields: FloatFields) -> Self {
        Self {
            fields,
            class: fields.class(),
            value: fields.value(),
            unbiased_exponent: fields.unbiased_exponent(),
            significand: fields.significand(),
            grouped_bits: fields.bit_string(),
        }
    }
}

/// Every interpretation of one pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterpretationReport {
    pub pattern: BitPattern,
    pub bits: String,
    pub hex: String,
    pub base64: String,
    pub integer: IntegerView,
    /// Integer readings of each narrower width the pattern splits into, narrowest first.
    pub integer_chunks: Vec<IntegerView>,
    pub float: Option<FloatView>,
    pub characters: Vec<CharacterView>,
    /// All pattern bytes read as one UTF-8 sequence.
    pub utf8: CharacterView,
}

impl InterpretationReport {
    /// Report with every built-in character view.
    pub fn build(pattern: &BitPattern) -> Self {
        Interpreter::default().build(pattern)
    }

    /// Reports for `pattern` and for `pattern` with bit `index` flipped.
    pub fn flip(pattern: &BitPattern, index: usize) -> Result<FlipReport> {
        Interpreter::default().flip(pattern, index)
    }
}

/// Reports before and after a single bit flip.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlipReport {
    pub index: usize,
    /// Float field hit by the flip; `None` for 8-bit patterns.
    pub field: Option<FloatField>,
    pub before: InterpretationReport,
    pub after: InterpretationReport,
}

impl FlipReport {
    /// Float value before and after, when the width has a float format.
    pub fn float_values(&self) -> Option<(FloatValue, FloatValue)> {
        match (&self.before.float, &self.after.float) {
            (Some(before), Some(after)) => Some((before.value, after.value)),
            _ => None,
        }
    }

    /// Names of the character views whose decoded units changed.
    pub fn changed_encodings(&self) -> Vec<&str> {
        self.before
            .characters
            .iter()
            .zip(&self.after.characters)
            .chain([(&self.before.utf8, &self.after.utf8)])
            .filter(|(before, after)| before.units != after.units)
            .map(|(before, _)| before.encoding.as_str())
            .collect()
    }
}

/// Builds reports with a fixed [ReportConfig]. Holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct Interpreter {
    config: ReportConfig,
}

impl Interpreter {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn build(&self, pattern: &BitPattern) -> InterpretationReport {
        let integer_chunks = Width::ALL
            .into_iter()
            .filter(|w| *w < pattern.width())
            .flat_map(|w| integer::decode_chunks(pattern, w))
            .collect();

        let float = float::decompose(pattern).ok().map(FloatView::of);

        let characters: Vec<CharacterView> = self
            .config
            .views
            .iter()
            .filter_map(|(table, unit_bits)| {
                match chars::decode_units(pattern, *unit_bits, table.as_ref()) {
                    Ok(view) => {
                        tracing::trace!(
                            encoding = table.name(),
                            unit_bits,
                            unmapped = view.unmapped_count(),
                            "decoded view"
                        );
                        Some(view)
                    }
                    Err(_) => {
                        tracing::trace!(encoding = table.name(), unit_bits, "skipped view");
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            width = pattern.width().bits(),
            value = pattern.value(),
            views = characters.len(),
            "built interpretation report"
        );

        InterpretationReport {
            pattern: *pattern,
            bits: pattern.to_bit_string(),
            hex: pattern.to_hex(),
            base64: pattern.to_base64(),
            integer: integer::decode(pattern),
            integer_chunks,
            float,
            characters,
            utf8: chars::decode_utf8(pattern),
        }
    }

    /// Reports for each pattern, in input order.
    pub fn build_many(&self, patterns: &[BitPattern]) -> Vec<InterpretationReport> {
        patterns.iter().map(|p| self.build(p)).collect()
    }

    pub fn flip(&self, pattern: &BitPattern, index: usize) -> Result<FlipReport> {
        let flipped = pattern.with_bit_flipped(index)?;
        let field = FloatFormat::for_width(pattern.width())
            .ok()
            .and_then(|format| format.field_of(index).ok());

        tracing::debug!(index, ?field, "flipping bit");

        Ok(FlipReport {
            index,
            field,
            before: self.build(pattern),
            after: self.build(&flipped),
        })
    }
}

#[cfg(feature = "serde")]
impl TryFrom<crate::serde::ReportConfigDef> for ReportConfig {
    type Error = Error;

    fn try_from(def: crate::serde::ReportConfigDef) -> Result<Self> {
        let mut registry = TableRegistry::builtin();
        for table in def.tables {
            registry.register(Arc::new(table.try_into_table()?));
        }

        if def.views.is_empty() {
            let views = registry
                .iter()
                .map(|table| (Arc::clone(table), table.unit_bits()))
                .collect();
            return Ok(Self { registry, views });
        }

        let mut config = ReportConfig::new(registry);
        for view in def.views {
            let unit_bits = match view.unit_bits {
                Some(bits) => bits,
                None => config.registry.get(&view.encoding)?.unit_bits(),
            };
            config.add_view(&view.encoding, unit_bits)?;
        }

        Ok(config)
    }
}
