//! Request Builder Binary
//!
//! Builds a prediction request JSON from the trailing rows of a historical
//! CSV export. The forward-return target columns are dropped so a request
//! can never carry future information into the models.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::{Map, Number, Value, json};
use std::path::PathBuf;

/// Training target columns, never part of a request.
const DEFAULT_DROP: &[&str] = &["未來1日漲跌(目標)", "未來5日漲跌(目標)", "未來20日漲跌(目標)"];

#[derive(Parser)]
#[command(author, version, about = "Build a prediction request from a historical CSV export", long_about = None)]
struct Cli {
    /// CSV export of the feature table
    #[arg(short, long)]
    csv: PathBuf,

    /// Number of trailing rows to include
    #[arg(short, long, default_value = "3")]
    tail: usize,

    /// Output path, "-" for stdout
    #[arg(short, long, default_value = "-")]
    output: String,

    /// Column to drop (repeatable); defaults to the training target columns
    #[arg(long = "drop")]
    drop: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let drop: Vec<String> = if cli.drop.is_empty() {
        DEFAULT_DROP.iter().map(|s| s.to_string()).collect()
    } else {
        cli.drop.clone()
    };

    let mut reader = csv::Reader::from_path(&cli.csv)
        .with_context(|| format!("opening CSV {}", cli.csv.display()))?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    let mut rows: Vec<Value> = Vec::new();
    for record in reader.records() {
        let record = record.context("reading CSV record")?;
        let mut row = Map::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            if drop.iter().any(|d| d == header) {
                continue;
            }
            row.insert(header.to_string(), cell_to_value(cell));
        }
        rows.push(Value::Object(row));
    }

    let tail_start = rows.len().saturating_sub(cli.tail);
    let tail: Vec<Value> = rows.split_off(tail_start);
    let payload = json!({ "rows": tail });
    let rendered = serde_json::to_string(&payload)?;

    if cli.output == "-" {
        println!("{}", rendered);
    } else {
        std::fs::write(&cli.output, rendered)
            .with_context(|| format!("writing {}", cli.output))?;
        eprintln!("saved -> {}", cli.output);
    }
    Ok(())
}

/// Empty cells become null, numeric cells become numbers, everything else
/// stays a string (dates included).
fn cell_to_value(cell: &str) -> Value {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    if let Ok(number) = trimmed.parse::<f64>() {
        if let Some(n) = Number::from_f64(number) {
            return Value::Number(n);
        }
    }
    Value::String(trimmed.to_string())
}
