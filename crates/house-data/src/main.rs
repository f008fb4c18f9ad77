//! CLI entry point for the housing data cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use house_data::{
    CleaningConfig, CleaningReport, DEFAULT_IQR_MULTIPLIER, DEFAULT_TARGET_COLUMN, Pipeline,
};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Cleans raw housing records for price prediction",
    long_about = "Fills missing values (median for numeric columns, mode for categorical \
                  ones), removes rows whose target lies outside the IQR bounds, and writes \
                  the cleaned CSV.\n\n\
                  EXAMPLES:\n  \
                  house-data -i data/raw/house_data.csv -o data/processed/cleaned_house_data.csv\n\n  \
                  # Treat NA as missing and keep a JSON report\n  \
                  house-data -i raw.csv -o clean.csv --null-value NA -r report.json"
)]
struct Args {
    /// Path to the raw CSV file
    #[arg(short, long)]
    input: PathBuf,

    /// Path for the cleaned CSV file (parent directories are created)
    #[arg(short, long)]
    output: PathBuf,

    /// Numeric column to filter outliers on
    #[arg(short, long, default_value = DEFAULT_TARGET_COLUMN)]
    target: String,

    /// Additional field value to treat as missing (repeatable)
    #[arg(long = "null-value", value_name = "MARKER")]
    null_values: Vec<String>,

    /// Multiplier k for the [Q1 - k*IQR, Q3 + k*IQR] bounds
    #[arg(long, default_value_t = DEFAULT_IQR_MULTIPLIER)]
    iqr_multiplier: f64,

    /// Write a JSON report of the run to this path
    #[arg(short, long)]
    report: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Initialize the tracing subscriber for logging.
fn init_logging(level: &str, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

fn main() -> Result<()> {
    // RUST_LOG may come from .env, so load it before the subscriber
    dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level, args.quiet);

    let config = build_config(&args)?;
    let pipeline = build_pipeline(&args, config)?;

    info!("{}", "=".repeat(60));
    info!("Starting housing data cleaning pipeline...");
    info!("{}", "=".repeat(60));

    match pipeline.run() {
        Ok(report) => {
            log_summary(&report);
            Ok(())
        }
        Err(e) => {
            error!("Pipeline failed [{}]: {}", e.error_code(), e);
            Err(anyhow!("Pipeline failed: {}", e))
        }
    }
}

fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut builder = CleaningConfig::builder()
        .input_path(&args.input)
        .output_path(&args.output)
        .target_column(&args.target)
        .null_values(args.null_values.iter().cloned())
        .iqr_multiplier(args.iqr_multiplier);

    if let Some(ref report) = args.report {
        builder = builder.report_path(report);
    }

    Ok(builder.build()?)
}

fn build_pipeline(args: &Args, config: CleaningConfig) -> Result<Pipeline> {
    let mut builder = Pipeline::builder().config(config);

    if !args.quiet {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    Ok(builder.build()?)
}

fn log_summary(report: &CleaningReport) {
    info!("{}", "-".repeat(60));
    info!("Input:  {}", report.input_file);
    info!("Output: {}", report.output_file);
    info!(
        "Shape:  {:?} -> {:?}",
        report.shape_before, report.shape_after
    );
    for imputation in &report.imputations {
        info!(
            "  {} ({}): filled {} with {}",
            imputation.column, imputation.kind, imputation.missing_count, imputation.fill_value
        );
    }
    if let Some(bounds) = &report.outliers.bounds {
        info!(
            "  {} bounds [{}, {}]: removed {} of {} rows",
            report.outliers.column,
            bounds.lower,
            bounds.upper,
            report.outliers.rows_removed,
            report.outliers.rows_before
        );
    }
    info!("Completed in {}ms", report.duration_ms);
}
