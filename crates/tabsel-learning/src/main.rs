//! CLI entry point for the model-selection workflow.

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use tabsel_learning::{
    CandidateOutcome, CandidateReport, ClosureProgressReporter, EvaluationReport, ModelSelector,
    SelectionConfig, evaluate,
};
use tabsel_processing::{Preprocessor, load_csv};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Grid-search model selection for tabular classification",
    long_about = "Loads a CSV, preprocesses it into a numeric feature matrix, \
                  cross-validates a grid of classifier configurations, and reports \
                  held-out metrics for the best one.\n\n\
                  EXAMPLES:\n  \
                  # Select a model for the Survived column\n  \
                  tabsel -i titanic.csv --target Survived\n\n  \
                  # Declare categorical columns explicitly\n  \
                  tabsel -i data.csv --target label --categorical region --categorical tier\n\n  \
                  # Machine-readable output\n  \
                  tabsel -i data.csv --target label --json | jq .metrics.accuracy"
)]
struct Args {
    /// Path to the CSV file to process
    #[arg(short, long)]
    input: String,

    /// Target column to predict
    #[arg(short, long)]
    target: String,

    /// Columns to treat as categorical (repeatable)
    ///
    /// String-typed columns are label-encoded automatically; use this for
    /// numeric columns that are really categories.
    #[arg(short, long)]
    categorical: Vec<String>,

    /// Number of cross-validation folds
    #[arg(long, default_value = "5")]
    folds: usize,

    /// Fraction of rows held out for the final test split (0.0 - 1.0)
    #[arg(long, default_value = "0.2")]
    test_fraction: f64,

    /// Random seed for splitting and seedable estimators
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,
}

/// Final report serialized by `--json`.
#[derive(Debug, Serialize)]
struct SelectionSummary {
    input_file: String,
    target_column: String,
    rows: usize,
    features: usize,
    classes: Vec<String>,
    best: CandidateReport,
    metrics: EvaluationReport,
    candidates: Vec<CandidateReport>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !std::path::Path::new(&args.input).exists() {
        return Err(anyhow!("Input file not found: {}", args.input));
    }

    info!("Loading dataset from: {}", args.input);
    let df = load_csv(&args.input)?;

    let (x, y) = Preprocessor::new(&args.target)
        .with_categorical_columns(args.categorical.iter().map(String::as_str))
        .prepare(&df)?;
    info!(
        rows = x.n_rows(),
        features = x.n_cols(),
        classes = y.n_classes(),
        "preprocessing complete"
    );

    let config = SelectionConfig::builder()
        .test_fraction(args.test_fraction)
        .cv_folds(args.folds)
        .seed(args.seed)
        .build()?;

    let mut builder = ModelSelector::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.progress_reporter(Arc::new(ClosureProgressReporter::new(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })));
    }
    let selector = builder.build();

    let outcome = selector.select(&x, &y)?;
    let metrics = evaluate(&outcome.model, &outcome.x_test, &outcome.y_test)?;

    let summary = SelectionSummary {
        input_file: args.input.clone(),
        target_column: args.target.clone(),
        rows: x.n_rows(),
        features: x.n_cols(),
        classes: y.classes.clone(),
        best: outcome.best,
        metrics,
        candidates: outcome.candidates,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_human_readable_summary(&summary);
    Ok(())
}

/// Print a human-readable summary of the selection results.
///
/// Uses `println!` intentionally for user-facing CLI output; unlike
/// logging, this should be visible regardless of log level settings.
fn print_human_readable_summary(summary: &SelectionSummary) {
    println!();
    println!("{}", "=".repeat(80));
    println!("MODEL SELECTION COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} features)",
        summary.input_file, summary.rows, summary.features
    );
    println!(
        "Target: {} ({} classes: {})",
        summary.target_column,
        summary.classes.len(),
        summary.classes.join(", ")
    );
    println!();

    println!("Best Configuration: {}", summary.best.config);
    if let Some(score) = summary.best.score() {
        println!("  Mean CV accuracy: {score:.4}");
    }
    println!();

    println!("Held-Out Metrics:");
    for (name, value) in summary.metrics.as_map() {
        println!("  {name:<10} {value:.4}");
    }
    println!();

    println!("Candidate Grid ({} configurations):", summary.candidates.len());
    for candidate in &summary.candidates {
        match &candidate.outcome {
            CandidateOutcome::Scored { mean_cv_score } => {
                println!("  {mean_cv_score:.4}  {}", candidate.config);
            }
            CandidateOutcome::Failed { reason } => {
                println!("  FAILED  {} ({reason})", candidate.config);
            }
            CandidateOutcome::Skipped => {
                println!("  SKIPPED {}", candidate.config);
            }
        }
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
