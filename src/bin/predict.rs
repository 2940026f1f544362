//! One-Shot Prediction Binary
//!
//! A CLI tool that loads the trained horizon models, scores a single request
//! file and prints the six-field response as JSON. Useful for smoke-testing
//! freshly trained artifacts without standing up the server.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use trendcast::application::normalizer::RequestNormalizer;
use trendcast::application::service::PredictionService;
use trendcast::config::ModelEnvConfig;
use trendcast::infrastructure::artifacts;
use trendcast::infrastructure::observability::Metrics;
use trendcast::infrastructure::transport::{ErrorBody, PredictRequest};

#[derive(Parser)]
#[command(author, version, about = "Score a request file against the trained horizon models", long_about = None)]
struct Cli {
    /// Directory holding the model bundles
    #[arg(long, default_value = "artifacts")]
    artifacts_dir: PathBuf,

    /// Bundle file prefix
    #[arg(long, default_value = "model_spy")]
    prefix: String,

    /// Timestamp column name
    #[arg(long, default_value = "日期")]
    timestamp_column: String,

    /// Request JSON file ({"rows": [...]}), "-" for stdin
    #[arg(short, long, default_value = "-")]
    input: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let raw = if cli.input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("reading request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(&cli.input)
            .with_context(|| format!("reading request file {}", cli.input))?
    };
    let request: PredictRequest =
        serde_json::from_str(&raw).context("parsing request JSON")?;

    let model_config = ModelEnvConfig {
        artifacts_dir: cli.artifacts_dir,
        artifact_prefix: cli.prefix,
        timestamp_column: cli.timestamp_column.clone(),
    };
    let (scorer, schema) = artifacts::load_scorer(&model_config)?;

    let service = PredictionService::new(
        Arc::new(schema),
        RequestNormalizer::new(&cli.timestamp_column),
        scorer,
        Metrics::new()?,
    );

    match service.predict(&request.rows) {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(error) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ErrorBody::from_error(&error))?
            );
            std::process::exit(1);
        }
    }
}
