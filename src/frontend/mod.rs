//! Server-rendered front end for the recommendation API.
//!
//! `GET /` plays the role of the browser page: it probes the API health on every load and,
//! when the form was submitted, runs the recommendation flow and renders the cards.

use std::path::Path;
use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::services::ServeDir;

use crate::client::RecommendationApi;

pub mod card;
pub mod controller;
pub mod handlers;
pub mod view;

/// Shared front end state
#[derive(Clone)]
pub struct FrontendState {
    pub api: Arc<dyn RecommendationApi>,
}

impl FrontendState {
    pub fn new(api: Arc<dyn RecommendationApi>) -> Self {
        Self { api }
    }
}

/// Creates the front end router: the page and its static assets
pub fn create_router(state: FrontendState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}
