//! `bitlens` command-line front end.
//!
//! ```bash
//! bitlens 0x3F800000
//! bitlens --width 32 0f-0.1 0i-2
//! bitlens --flip 0 0f1.0
//! bitlens --json --config views.json 0s#cp1252#€
//! ```

mod render;

use std::{
    fs,
    io::{self, BufRead},
    path::PathBuf,
};

use anyhow::{Context, Result};
use bitlens::{
    BitPattern, Interpreter, ReportConfig, Width, literal::Literal, report::FlipReport,
    serde::ReportConfigDef,
};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Shows what bit patterns mean as integers, floats and characters.
#[derive(Parser, Debug)]
#[command(name = "bitlens", author, version, about)]
struct Args {
    /// Literals: 0b.., 0x.., 0f<float>, 0ui<int>, 0i<int>, 0s#<encoding>#<text>,
    /// 0sb64#<base64>, or plain UTF-8 text. Read from stdin, one per line, when omitted.
    #[arg(allow_hyphen_values = true)]
    literals: Vec<String>,

    /// Pattern width in bits (8, 16, 32 or 64); inferred when omitted
    #[arg(short, long)]
    width: Option<usize>,

    /// Flip this bit index (0 = most significant) and show both reports
    #[arg(short, long)]
    flip: Option<usize>,

    /// JSON report configuration (character views and extra tables)
    #[arg(short, long, env = "BITLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Print reports as JSON
    #[arg(long)]
    json: bool,

    /// Placeholder shown for unmapped code units
    #[arg(long, default_value = "·")]
    unmapped: char,

    /// Log filter (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short = 'l', long, default_value = "warn")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(if args.verbose { "debug" } else { &args.log_level });

    let config = load_config(args.config.as_ref())?;
    let interpreter = Interpreter::new(config);
    let width = args.width.map(Width::from_bits).transpose()?;

    let literals = if args.literals.is_empty() {
        read_literals(io::stdin().lock())?
    } else {
        args.literals.clone()
    };

    for literal in &literals {
        let patterns = normalize(&interpreter, literal, width)?;
        tracing::info!(%literal, patterns = patterns.len(), "interpreting");

        match args.flip {
            Some(index) => {
                let reports = flip_all(&interpreter, &patterns, index)
                    .with_context(|| format!("flipping bit {index} of {literal:?}"))?;

                if args.json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    for report in &reports {
                        print!("{}", render::flip(literal, report, args.unmapped));
                    }
                }
            }
            None => {
                let reports = interpreter.build_many(&patterns);

                if args.json {
                    println!("{}", serde_json::to_string_pretty(&reports)?);
                } else {
                    for report in &reports {
                        print!("{}", render::report(literal, report, args.unmapped));
                    }
                }
            }
        }
    }

    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ReportConfig> {
    let Some(path) = path else {
        return Ok(ReportConfig::builtin());
    };

    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let def: ReportConfigDef = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;

    tracing::debug!(path = %path.display(), views = def.views.len(), tables = def.tables.len(), "loaded config");

    Ok(ReportConfig::try_from(def)?)
}

/// Non-empty lines of `input`, trailing newline characters removed.
fn read_literals(input: impl BufRead) -> Result<Vec<String>> {
    let mut literals = Vec::new();
    for line in input.lines() {
        let line = line.context("reading literals from stdin")?;
        let line = line.trim_end_matches('\r');
        if !line.is_empty() {
            literals.push(line.to_string());
        }
    }

    Ok(literals)
}

fn normalize(interpreter: &Interpreter, literal: &str, width: Option<Width>) -> Result<Vec<BitPattern>> {
    let parsed: Literal = literal.parse()?;
    let patterns = parsed
        .patterns(width, interpreter.config().registry())
        .with_context(|| format!("normalizing {literal:?}"))?;

    Ok(patterns)
}

/// Flips bit `index` in every pattern; fails on the first pattern too narrow for it.
fn flip_all(interpreter: &Interpreter, patterns: &[BitPattern], index: usize) -> Result<Vec<FlipReport>> {
    let reports = patterns
        .iter()
        .map(|pattern| interpreter.flip(pattern, index))
        .collect::<bitlens::Result<Vec<_>>>()?;

    Ok(reports)
}
