//! Census CLI - evaluate table formulas against CSV-backed summary files

use anyhow::{Context, Result};
use census::prelude::*;
use census::{ConstantSource, FormulaParser};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "census")]
#[command(
    author,
    version,
    about = "Evaluate arithmetic formulas over census summary-file tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a formula for one or more geographies
    Eval {
        /// Formula, e.g. "B01001_002 / B01001_001"
        formula: String,

        /// Data release (see `census vintages`)
        #[arg(short, long)]
        vintage: Vintage,

        /// Row store CSV (FILEID,FILETYPE,STUSAB,CIFSN,LOGRECNO,cells...)
        #[arg(long, env = "CENSUS_ROWS")]
        rows: PathBuf,

        /// Table metadata CSV (TABLE,SEGMENT,COLUMN)
        #[arg(long, env = "CENSUS_META")]
        meta: PathBuf,

        /// Geography as AREA:LOGRECNO, repeatable
        #[arg(short, long = "geo", value_parser = parse_geography, required = true)]
        geographies: Vec<Geography>,

        /// Field delimiter for both CSV files
        #[arg(short, long, default_value = ",")]
        delimiter: char,

        /// Decimal places to print
        #[arg(short, long)]
        precision: Option<usize>,
    },

    /// Parse a formula and show how it groups
    Parse {
        /// Formula to parse
        formula: String,
    },

    /// List supported vintages
    Vintages,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Eval {
            formula,
            vintage,
            rows,
            meta,
            geographies,
            delimiter,
            precision,
        } => eval(
            &formula,
            vintage,
            &rows,
            &meta,
            &geographies,
            delimiter,
            precision,
        ),
        Commands::Parse { formula } => show_parse(&formula),
        Commands::Vintages => list_vintages(),
    }
}

fn eval(
    formula: &str,
    vintage: Vintage,
    rows: &Path,
    meta: &Path,
    geographies: &[Geography],
    delimiter: char,
    precision: Option<usize>,
) -> Result<()> {
    let delimiter = u8::try_from(delimiter).context("Delimiter must be a single-byte character")?;
    let options = CsvReadOptions {
        delimiter,
        ..Default::default()
    };

    let store = CsvRowStore::read_file(rows, &options)
        .with_context(|| format!("Failed to read rows from '{}'", rows.display()))?;
    let metadata = CsvTableMetadata::read_file(meta, &options)
        .with_context(|| format!("Failed to read metadata from '{}'", meta.display()))?;

    let dataset = Dataset::new(vintage, Arc::new(store), Arc::new(metadata))?;
    let values = dataset
        .data(formula, geographies)
        .with_context(|| format!("Failed to evaluate '{}'", formula))?;

    let mut out = io::stdout().lock();
    for (geography, value) in geographies.iter().zip(&values) {
        match precision {
            Some(p) => writeln!(out, "{}\t{:.*}", geography, p, value)?,
            None => writeln!(out, "{}\t{}", geography, value)?,
        }
    }

    Ok(())
}

fn show_parse(formula: &str) -> Result<()> {
    // Identifiers are never resolved here
    let parser = FormulaParser::new(Arc::new(ConstantSource::new(Value::unknown())));
    let table = parser
        .parse(formula)
        .with_context(|| format!("Failed to parse '{}'", formula))?;

    println!("{}", table);
    for name in table.references() {
        println!("  {}", name);
    }

    Ok(())
}

fn list_vintages() -> Result<()> {
    for vintage in Vintage::ALL {
        let kind = if vintage.has_margins() {
            "estimate + margin of error"
        } else {
            "single value"
        };
        println!("{}\t{}", vintage, kind);
    }

    Ok(())
}

/// Parse `AREA:LOGRECNO` into a geography
fn parse_geography(s: &str) -> std::result::Result<Geography, String> {
    match s.split_once(':') {
        Some((area, locator)) if !area.is_empty() && !locator.is_empty() => {
            Ok(Geography::new(area, locator))
        }
        _ => Err(format!("expected AREA:LOGRECNO, got '{}'", s)),
    }
}
