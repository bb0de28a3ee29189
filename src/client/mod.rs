//! Client side of the recommendation API
//!
//! The front end only sees the `RecommendationApi` trait, so the controller can be
//! driven by the HTTP client in production and by mocks in tests.

use reqwest::StatusCode;

use crate::models::{RecommendRequest, RecommendResponse};

pub mod http;

pub use http::HttpApiClient;

/// Errors surfaced by an API client
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The request never completed (connection refused, DNS, timeout...)
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status; `body` is the response text
    #[error("{body}")]
    Status { status: StatusCode, body: String },

    /// The API answered 2xx with a body that is not a recommendation list
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// Operations the front end needs from the recommendation API
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecommendationApi: Send + Sync {
    /// Probe `GET /health`.
    ///
    /// Any completed exchange yields its status code; only transport failures are errors.
    async fn health(&self) -> ClientResult<StatusCode>;

    /// Issue exactly one `POST /recommend`
    async fn recommend(&self, request: &RecommendRequest) -> ClientResult<RecommendResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_displays_body_verbatim() {
        let err = ClientError::Status {
            status: StatusCode::TOO_MANY_REQUESTS,
            body: "rate limited".to_string(),
        };
        assert_eq!(err.to_string(), "rate limited");
    }

    #[test]
    fn test_decode_error_display() {
        let err: ClientError = serde_json::from_str::<RecommendResponse>("not json")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Malformed response:"));
    }
}
