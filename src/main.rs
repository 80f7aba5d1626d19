//! Evaluation CLI: score a run file against relevance judgments and report MRR, Hits@K, P@K.

use anyhow::{Context, Result};
use clap::Parser;
use rankeval::{
    config::ThresholdsConfig,
    eval::{EvalReport, Run},
    Config, Evaluator, Qrels,
};
use std::path::PathBuf;

/// Ranking evaluation: MRR, Hits@K and Precision@K.
#[derive(Parser, Debug)]
#[command(name = "rankeval", version)]
struct Args {
    /// Path to the run file (JSON array of {query_id, predictions}).
    #[arg(long)]
    run: PathBuf,

    /// Tab-separated judgments file (overrides eval.qrels_path).
    #[arg(long)]
    qrels: Option<PathBuf>,

    /// Config file (overrides RANKEVAL_CONFIG).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_path(path)?,
        None => Config::load()?,
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.eval.log_level.as_str()),
    )
    .init();

    let qrels_path = args
        .qrels
        .clone()
        .or_else(|| config.qrels_path().map(PathBuf::from))
        .context("No judgments file: pass --qrels or set eval.qrels_path")?;

    let qrels = Qrels::from_path(&qrels_path)
        .with_context(|| format!("Failed to load judgments from {}", qrels_path.display()))?;
    let run = Run::from_path(&args.run)
        .with_context(|| format!("Failed to load run from {}", args.run.display()))?;

    if run.is_empty() {
        log::warn!("No queries in {}, every average will be 0", args.run.display());
    }

    log::info!(
        "Evaluating {} queries against {} judgments",
        run.len(),
        qrels.len()
    );

    let evaluator = Evaluator::with_settings(qrels, config.eval_settings())?;
    let (query_ids, predictions) = run.into_parts();
    let report = evaluator.evaluate(&query_ids, &predictions)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    let failures = threshold_failures(&report, &config.thresholds);
    if failures.is_empty() {
        Ok(())
    } else {
        for failure in &failures {
            eprintln!("Below threshold: {}", failure);
        }
        std::process::exit(1);
    }
}

/// Averages divide by `count + EPS`, so a perfect run lands just under 1.0.
const GATE_TOLERANCE: f64 = 1e-9;

fn below(value: f64, min: f64) -> bool {
    min - value > GATE_TOLERANCE
}

/// Describe every configured gate the report misses.
fn threshold_failures(report: &EvalReport, thresholds: &ThresholdsConfig) -> Vec<String> {
    let mut failures = Vec::new();
    if let Some(min) = thresholds.min_mrr {
        if below(report.mrr, min) {
            failures.push(format!("MRR {} < {}", report.mrr, min));
        }
    }
    if let Some(min) = thresholds.min_hits {
        if below(report.hits.value, min) {
            failures.push(format!(
                "Hits@{} {} < {}",
                report.hits.k, report.hits.value, min
            ));
        }
    }
    if let Some(min) = thresholds.min_precision {
        for p in report.precision.iter().filter(|p| p.queries_considered > 0) {
            if below(p.value, min) {
                failures.push(format!("Precision@{} {} < {}", p.k, p.value, min));
            }
        }
    }
    failures
}
