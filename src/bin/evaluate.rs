//! Offline evaluation of the recommendation API.
//!
//! `predict` runs every query of a test file through `POST /recommend` and writes the returned
//! URLs; `score` reports Mean Recall@K of a predictions file against labelled data.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use assessment_recommender::{
    client::HttpApiClient,
    evaluation::{
        generate_predictions, mean_recall_at_k, read_queries, read_query_urls, write_predictions,
    },
};

#[derive(Parser)]
#[command(name = "evaluate")]
#[command(about = "Generate and score assessment recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Query the API for every row of a test file
    Predict {
        /// CSV with a `Query` column
        #[arg(long)]
        test_csv: PathBuf,
        /// Base URL of the recommendation API
        #[arg(long, default_value = "http://127.0.0.1:8000")]
        api_base: String,
        #[arg(long, default_value = "predictions.csv")]
        out_csv: PathBuf,
    },
    /// Mean Recall@K of predictions against labelled data
    Score {
        /// CSV with `Query` and `Assessment_url` columns
        #[arg(long)]
        ground_truth: PathBuf,
        #[arg(long)]
        predictions: PathBuf,
        #[arg(long, default_value_t = 10)]
        k: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Commands::Predict {
            test_csv,
            api_base,
            out_csv,
        } => predict(&test_csv, &api_base, &out_csv).await,
        Commands::Score {
            ground_truth,
            predictions,
            k,
        } => score(&ground_truth, &predictions, k),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open {}", path.display()))
}

async fn predict(test_csv: &Path, api_base: &str, out_csv: &Path) -> Result<()> {
    let queries = read_queries(open(test_csv)?)?;
    let client = HttpApiClient::new(api_base);

    let rows = generate_predictions(&client, &queries)
        .await
        .context("Recommendation request failed")?;

    let out = File::create(out_csv)
        .with_context(|| format!("Failed to create {}", out_csv.display()))?;
    write_predictions(out, &rows)?;

    println!("Wrote predictions to {}", out_csv.display());
    Ok(())
}

fn score(ground_truth: &Path, predictions: &Path, k: usize) -> Result<()> {
    let ground_truth = read_query_urls(open(ground_truth)?)?;
    let predictions = read_query_urls(open(predictions)?)?;

    let mean_recall = mean_recall_at_k(&ground_truth, &predictions, k);

    println!("Mean Recall@{}: {:.4}", k, mean_recall);
    Ok(())
}
