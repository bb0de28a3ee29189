use std::sync::Arc;

use crate::services::{Recommender, TraceLog};

/// Shared state of the recommendation API
#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub trace_log: Arc<TraceLog>,
}

impl AppState {
    pub fn new(recommender: Recommender, trace_log: TraceLog) -> Self {
        Self {
            recommender: Arc::new(recommender),
            trace_log: Arc::new(trace_log),
        }
    }
}
