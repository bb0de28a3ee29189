use axum::{extract::State, Json};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{HealthResponse, RecommendRequest, RecommendResponse, Recommendation, DEFAULT_TOP_K},
    services::TraceEntry,
};

use super::AppState;

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Ranks catalog assessments against the query.
/// `top_k` missing or zero means the default; `balance` defaults to on.
pub async fn recommend(
    State(state): State<AppState>,
    request_id: RequestId,
    Json(request): Json<RecommendRequest>,
) -> AppResult<Json<RecommendResponse>> {
    let top_k = match request.top_k {
        Some(k) if k > 0 => k as usize,
        _ => DEFAULT_TOP_K as usize,
    };
    let balance = request.balance.unwrap_or(true);

    tracing::info!(
        request_id = %request_id,
        query = %request.query,
        top_k,
        balance,
        "Recommendation requested"
    );

    let recommender = state.recommender.clone();
    let query = request.query.clone();
    let scored = tokio::task::spawn_blocking(move || recommender.recommend(&query, top_k, balance))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(|e| {
            tracing::warn!(request_id = %request_id, error = %e, "Recommendation failed");
            AppError::Recommendation(e.to_string())
        })?;

    let recommendations: Vec<Recommendation> = scored.into_iter().map(Into::into).collect();

    state
        .trace_log
        .record(
            request_id.0,
            TraceEntry {
                query: &request.query,
                top_k,
                balance,
                results: &recommendations,
            },
        )
        .await;

    Ok(Json(RecommendResponse {
        query: Some(request.query),
        recommendations,
    }))
}
