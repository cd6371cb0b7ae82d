//! statuscast CLI — single-shot student-status prediction.
//!
//! Prints exactly one JSON result line on stdout; all diagnostics go to
//! stderr so a caller can parse stdout as-is. Exit code is 0 for every
//! reported result, including recovered errors; only a malformed command
//! line exits 1.

use clap::error::ErrorKind;
use clap::Parser;
use statuscast_core::{PredictionResult, Predictor};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: statuscast <ipk> <skor_psikologi> <finansial>";

/// Predict a student's status from IPK, psychology score, and financial flag.
#[derive(Parser, Debug)]
#[command(name = "statuscast", version, about, long_about = None)]
struct Cli {
    /// Cumulative GPA (0.0-4.0)
    #[arg(allow_negative_numbers = true)]
    ipk: String,

    /// Psychology test score (0-100)
    #[arg(allow_negative_numbers = true)]
    skor_psikologi: String,

    /// Financial status flag (0 or 1)
    #[arg(allow_negative_numbers = true)]
    finansial: String,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit();
        }
        Err(_) => {
            // The usage contract is part of the wire format: a fixed JSON
            // error object on stdout and the only non-zero exit code.
            println!("{}", serde_json::to_string(&PredictionResult::failure(USAGE))?);
            std::process::exit(1);
        }
    };

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let result = match statuscast_core::load_config() {
        Ok(config) => {
            Predictor::new(config)
                .predict(&cli.ipk, &cli.skor_psikologi, &cli.finansial)
                .await
        }
        Err(e) => PredictionResult::failure(e.to_string()),
    };

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
