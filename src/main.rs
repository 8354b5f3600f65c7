mod analyzer;
mod config;
mod generator;
mod model;
mod storage;
mod utils;

use analyzer::render::{TextReport, render_json};
use analyzer::{Analyzer, AnalyzerImpl, SalesReport};
use clap::{Parser, Subcommand};
use config::{DEFAULT_DATASET_PATH, GeneratorConfig, load_config};
use model::{AppError, COLUMNS};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "store-sales",
    version,
    about = "Synthetic retail sales dataset generator and analyzer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a synthetic transactions CSV.
    Generate {
        /// JSON file overriding the built-in generator settings.
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long, default_value = DEFAULT_DATASET_PATH)]
        output: PathBuf,
        /// Number of records; overrides the config file.
        #[arg(long)]
        records: Option<u64>,
        /// RNG seed for reproducible output; overrides the config file.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print summary statistics for a transactions CSV.
    Analyze {
        #[arg(default_value = DEFAULT_DATASET_PATH)]
        input: PathBuf,
        /// Rows shown in the category and store tables.
        #[arg(long, default_value_t = 5)]
        top: usize,
        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Generate {
            config,
            output,
            records,
            seed,
        } => run_generate(config.as_deref(), &output, records, seed),
        Command::Analyze { input, top, json } => run_analyze(&input, top, json),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Builds the configured number of records and writes them as one CSV file.
/// The config is validated before the output file is touched.
fn run_generate(
    config_path: Option<&Path>,
    output: &Path,
    records: Option<u64>,
    seed: Option<u64>,
) -> Result<(), AppError> {
    let mut cfg = match config_path {
        Some(path) => {
            info!("Loading generator config from {}", path.display());
            load_config(path)?
        }
        None => GeneratorConfig::default(),
    };
    if let Some(count) = records {
        cfg.record_count = count;
    }
    if seed.is_some() {
        cfg.seed = seed;
    }
    cfg.validate()?;

    info!("Generating {} records...", cfg.record_count);
    let mut rng = generator::rng_for(&cfg);
    let records = generator::build_records(&cfg, &mut rng)?;

    storage::write_records(output, &records)?;
    info!(
        "Created {} with {} records",
        output.display(),
        records.len()
    );
    info!("Columns: {}", COLUMNS.len());
    info!("Date range: {} to {}", cfg.start_date, cfg.end_date());
    Ok(())
}

/// Loads a CSV file and prints its report to stdout.
fn run_analyze(input: &Path, top: usize, json: bool) -> Result<(), AppError> {
    info!("Reading dataset from {}", input.display());
    let dataset = storage::read_records(input)?;
    let analyzer = AnalyzerImpl::new();
    let report = SalesReport {
        file_size_bytes: Some(storage::file_size(input)?),
        ..analyzer.analyze(&dataset)?
    };
    info!("Analyzed {} records", report.transactions);

    if json {
        println!("{}", render_json(&report)?);
    } else {
        println!("{}", TextReport::new(&report, top));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ReportError;

    #[test]
    fn cli_parses_generate_flags() {
        let args = ["store-sales", "generate", "--records", "10", "--seed", "3"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Generate { records, seed, output, config } => {
                assert_eq!(records, Some(10));
                assert_eq!(seed, Some(3));
                assert_eq!(output, PathBuf::from(DEFAULT_DATASET_PATH));
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn cli_parses_analyze_flags() {
        let args = ["store-sales", "analyze", "data.csv", "--top", "3", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Analyze { input, top, json } => {
                assert_eq!(input, PathBuf::from("data.csv"));
                assert_eq!(top, 3);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn generate_then_analyze_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        run_generate(None, &path, Some(50), Some(42)).unwrap();
        run_analyze(&path, 5, false).unwrap();
        run_analyze(&path, 5, true).unwrap();
    }

    #[test]
    fn seeded_generation_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        run_generate(None, &a, Some(10), Some(5)).unwrap();
        run_generate(None, &b, Some(10), Some(5)).unwrap();
        assert_eq!(std::fs::read(&a).unwrap(), std::fs::read(&b).unwrap());
    }

    #[test]
    fn zero_records_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.csv");
        let err = run_generate(None, &path, Some(0), None).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(!path.exists());
    }

    #[test]
    fn empty_file_reports_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        let err = run_analyze(&path, 5, false).unwrap_err();
        assert!(matches!(err, AppError::Report(ReportError::EmptyDataset)));
    }

    #[test]
    fn missing_input_is_a_storage_error() {
        let err = run_analyze(Path::new("/nonexistent/sales.csv"), 5, false).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}
