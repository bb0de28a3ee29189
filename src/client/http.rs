use reqwest::{Client as HttpClient, StatusCode};

use super::{ClientError, ClientResult, RecommendationApi};
use crate::models::{RecommendRequest, RecommendResponse};

/// reqwest-backed client for a remote recommendation API
#[derive(Clone)]
pub struct HttpApiClient {
    http_client: HttpClient,
    base_url: String,
}

impl HttpApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(HttpClient::new(), base_url)
    }

    pub fn with_client(http_client: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http_client,
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl RecommendationApi for HttpApiClient {
    async fn health(&self) -> ClientResult<StatusCode> {
        let url = self.api_url("/health");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::warn!(url = %url, error = %e, "Health probe failed");
            e
        })?;

        tracing::debug!(url = %url, status = %response.status(), "Health probe completed");

        Ok(response.status())
    }

    async fn recommend(&self, request: &RecommendRequest) -> ClientResult<RecommendResponse> {
        let url = self.api_url("/recommend");

        tracing::info!(
            query = %request.query,
            top_k = ?request.top_k,
            balance = ?request.balance,
            "Requesting recommendations"
        );

        let response = self.http_client.post(&url).json(request).send().await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body,
                "Recommendation API request failed"
            );
            let body = if body.is_empty() {
                status.to_string()
            } else {
                body
            };
            return Err(ClientError::Status { status, body });
        }

        let recommendations: RecommendResponse = serde_json::from_str(&body)?;

        tracing::info!(
            results = recommendations.recommendations.len(),
            "Recommendations received"
        );

        Ok(recommendations)
    }
}
