use std::path::Path;

use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    api::{self, AppState},
    frontend::{self, FrontendState},
    middleware::{make_span_with_request_id, request_id_middleware},
};

/// The whole application: JSON API, rendered page and static assets
pub fn build_router(api_state: AppState, frontend_state: FrontendState, static_dir: &Path) -> Router {
    Router::new()
        .merge(api::create_router(api_state))
        .merge(frontend::create_router(frontend_state, static_dir))
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        // outermost, so the trace span sees the id
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
}
