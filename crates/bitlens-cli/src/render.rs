use std::fmt::Write;

use bitlens::{
    InterpretationReport,
    integer::IntegerView,
    report::{FlipReport, FloatView},
    width::Width,
};

const LABEL: usize = 12;

/// Plain-text rendering of one report.
pub fn report(literal: &str, report: &InterpretationReport, unmapped: char) -> String {
    let mut out = String::new();
    let pattern = &report.pattern;

    let _ = writeln!(out, "{literal} ({})", pattern.width());
    line(&mut out, "bits", &report.bits);
    line(&mut out, "hex", &report.hex);
    line(&mut out, "base64", &report.base64);
    line(&mut out, "unsigned", &report.integer.unsigned.to_string());
    line(&mut out, "signed", &report.integer.signed.to_string());

    if let Some(float) = &report.float {
        line(&mut out, "float", &float_line(float));
    }

    for width in Width::ALL {
        let chunks: Vec<&IntegerView> = report
            .integer_chunks
            .iter()
            .filter(|c| c.width == width)
            .collect();
        if chunks.is_empty() {
            continue;
        }

        let unsigned = join(chunks.iter().map(|c| c.unsigned.to_string()));
        let signed = join(chunks.iter().map(|c| c.signed.to_string()));
        line(&mut out, &format!("u{}", width.bits()), &unsigned);
        line(&mut out, &format!("i{}", width.bits()), &signed);
    }

    for view in report.characters.iter().chain([&report.utf8]) {
        let text: String = view.render(unmapped).escape_debug().collect();
        line(&mut out, &view.encoding, &format!("\"{text}\""));
    }

    out.push('\n');
    out
}

/// Summary of a flip followed by the report of the flipped pattern.
pub fn flip(literal: &str, flip: &FlipReport, unmapped: char) -> String {
    let mut out = String::new();

    let field = flip
        .field
        .map(|f| format!(" ({f:?})"))
        .unwrap_or_default();
    let _ = writeln!(out, "flip bit {}{field}", flip.index);
    line(&mut out, "before", &flip.before.bits);
    line(&mut out, "after", &flip.after.bits);

    if let Some((before, after)) = flip.float_values() {
        line(&mut out, "float", &format!("{before} -> {after}"));
    }
    line(
        &mut out,
        "integer",
        &format!("{} -> {}", flip.before.integer.signed, flip.after.integer.signed),
    );
    line(&mut out, "changed", &flip.changed_encodings().join(", "));
    out.push('\n');

    out.push_str(&report(literal, &flip.after, unmapped));
    out
}

fn float_line(float: &FloatView) -> String {
    let mut text = format!("{}  {:?}  {}", float.grouped_bits, float.class, float.value);
    if let (Some(exponent), Some(significand)) = (float.unbiased_exponent, float.significand) {
        let _ = write!(text, "  (2^{exponent} x {significand})");
    }
    text
}

fn line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "  {label:<width$}{value}", width = LABEL);
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitlens::{BitPattern, float};

    #[test]
    fn test_report_lines() {
        let pattern = BitPattern::from_u64(0x41, Width::W8).unwrap();
        let text = report("0x41", &InterpretationReport::build(&pattern), '·');

        assert!(text.starts_with("0x41 (8-bit)\n"));
        assert!(text.contains("  unsigned    65\n"));
        assert!(text.contains("  ascii       \"A\"\n"));
        assert!(!text.contains("float"));
    }

    #[test]
    fn test_report_utf8_line() {
        let pattern = BitPattern::from_u64(0xC3A9, Width::W16).unwrap();
        let text = report("0xC3A9", &InterpretationReport::build(&pattern), '·');

        assert!(text.contains("  utf_8       \"é\"\n"));
        assert!(text.contains("  latin_1     \"Ã©\"\n"));
    }

    #[test]
    fn test_flip_summary() {
        let one = float::from_f64(1.0);
        let flip_report = InterpretationReport::flip(&one, 0).unwrap();
        let text = flip("0f1.0", &flip_report, '·');

        assert!(text.starts_with("flip bit 0 (Sign)\n"));
        assert!(text.contains("  float       1 -> -1\n"));
    }
}
