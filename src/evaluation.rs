//! Offline ranking evaluation.
//!
//! Labelled and predicted files share one layout: a `Query` column and an `Assessment_url`
//! column, one row per (query, url) pair. Predictions are produced by running every query of a
//! test file through the recommendation API.

use std::collections::{BTreeMap, HashSet};
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::{
    client::{ClientResult, RecommendationApi},
    error::{AppError, AppResult},
    models::RecommendRequest,
};

const QUERY_COLUMN: &str = "Query";

/// URLs per query, in file order
pub type QueryUrls = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    #[serde(rename = "Query")]
    pub query: String,
    #[serde(rename = "Assessment_url", default)]
    pub assessment_url: Option<String>,
}

/// Share of the relevant URLs found in the first `k` predictions
pub fn recall_at_k(relevant: &HashSet<String>, predicted: &[String], k: usize) -> f64 {
    if relevant.is_empty() {
        return 0.0;
    }
    let hits = predicted
        .iter()
        .take(k)
        .filter(|url| relevant.contains(*url))
        .count();
    hits as f64 / relevant.len() as f64
}

/// Recall@k averaged over every labelled query. Unpredicted queries score zero.
pub fn mean_recall_at_k(ground_truth: &QueryUrls, predictions: &QueryUrls, k: usize) -> f64 {
    if ground_truth.is_empty() {
        return 0.0;
    }
    let total: f64 = ground_truth
        .iter()
        .map(|(query, urls)| {
            let relevant: HashSet<String> = urls.iter().cloned().collect();
            let predicted = predictions.get(query).map(Vec::as_slice).unwrap_or(&[]);
            recall_at_k(&relevant, predicted, k)
        })
        .sum();
    total / ground_truth.len() as f64
}

/// Reads a labelled or predicted file, grouping URLs by query. Blank URLs are skipped.
pub fn read_query_urls<R: Read>(reader: R) -> AppResult<QueryUrls> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut grouped = QueryUrls::new();
    for row in csv_reader.deserialize::<PredictionRow>() {
        let row = row.map_err(|e| AppError::InvalidInput(e.to_string()))?;
        let urls = grouped.entry(row.query).or_default();
        if let Some(url) = row.assessment_url.filter(|u| !u.is_empty()) {
            urls.push(url);
        }
    }
    Ok(grouped)
}

/// Queries of a test file; the `Query` column is matched case-insensitively
pub fn read_queries<R: Read>(reader: R) -> AppResult<Vec<String>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
        .clone();
    let column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(QUERY_COLUMN))
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "'{}' column not found. Found: {:?}",
                QUERY_COLUMN,
                headers.iter().collect::<Vec<_>>()
            ))
        })?;

    let mut queries = Vec::new();
    for record in csv_reader.records() {
        let record = record.map_err(|e| AppError::InvalidInput(e.to_string()))?;
        queries.push(record.get(column).unwrap_or_default().to_string());
    }
    Ok(queries)
}

/// Sends each query with the API's own defaults and keeps the returned URLs in rank order
pub async fn generate_predictions(
    api: &dyn RecommendationApi,
    queries: &[String],
) -> ClientResult<Vec<PredictionRow>> {
    let mut rows = Vec::new();
    for query in queries {
        let request = RecommendRequest {
            query: query.clone(),
            top_k: None,
            balance: None,
        };
        let response = api.recommend(&request).await?;

        let before = rows.len();
        rows.extend(
            response
                .recommendations
                .into_iter()
                .filter_map(|rec| rec.url.filter(|u| !u.is_empty()))
                .map(|url| PredictionRow {
                    query: query.clone(),
                    assessment_url: Some(url),
                }),
        );
        tracing::debug!(query = %query, urls = rows.len() - before, "Predicted");
    }
    Ok(rows)
}

/// Writes rows with a `Query,Assessment_url` header
pub fn write_predictions<W: Write>(writer: W, rows: &[PredictionRow]) -> AppResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    // an empty file still gets its header
    if rows.is_empty() {
        csv_writer
            .write_record([QUERY_COLUMN, "Assessment_url"])
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    for row in rows {
        csv_writer
            .serialize(row)
            .map_err(|e| AppError::Internal(e.to_string()))?;
    }
    csv_writer.flush()?;
    Ok(())
}
