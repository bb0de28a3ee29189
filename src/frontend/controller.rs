//! UI controller: health indicator and the recommendation request flow.
//!
//! The controller owns no markup. It drives a [`View`] (status indicator, trigger control,
//! results area, alert) from the outcome of calls to a [`RecommendationApi`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::client::RecommendationApi;
use crate::frontend::card::{Card, NO_RESULTS_MESSAGE};
use crate::models::{RecommendRequest, DEFAULT_TOP_K};

pub const TRIGGER_LABEL: &str = "Get Recommendations";
pub const LOADING_LABEL: &str = "Loading...";
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a query.";

/// State of the API status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    /// Probe answered with a 2xx status
    Ok,
    /// Probe answered with any other status
    Unavailable,
    /// Probe never completed
    Unreachable,
}

impl HealthStatus {
    pub fn label(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "API: OK",
            HealthStatus::Unavailable => "API Unavailable",
            HealthStatus::Unreachable => "Cannot reach API",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            HealthStatus::Ok => "green",
            HealthStatus::Unavailable | HealthStatus::Unreachable => "red",
        }
    }
}

/// Enabled flag and label of the trigger control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerState {
    pub enabled: bool,
    pub label: &'static str,
}

impl TriggerState {
    pub const IDLE: TriggerState = TriggerState {
        enabled: true,
        label: TRIGGER_LABEL,
    };

    pub const LOADING: TriggerState = TriggerState {
        enabled: false,
        label: LOADING_LABEL,
    };
}

impl Default for TriggerState {
    fn default() -> Self {
        Self::IDLE
    }
}

/// The page surface the controller writes to
#[cfg_attr(test, mockall::automock)]
pub trait View: Send + Sync {
    fn set_status(&self, status: HealthStatus);
    fn set_trigger(&self, state: TriggerState);
    fn clear_results(&self);
    fn show_cards(&self, cards: Vec<Card>);
    fn show_empty(&self, message: &str);
    /// Blocking, user-facing notification
    fn alert(&self, message: &str);
}

/// User input for one recommendation request
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendForm {
    pub query: String,
    pub top_k: u32,
    pub balance: bool,
}

impl RecommendForm {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: DEFAULT_TOP_K,
            balance: true,
        }
    }
}

/// What a single trigger ended up doing
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Empty query: alerted, no request issued
    Rejected,
    /// Rendered this many cards
    Rendered(usize),
    /// Server returned no records
    Empty,
    /// Request failed; the message was alerted
    Failed(String),
    /// A newer request started before this one completed; its response was dropped
    Superseded,
}

pub struct Controller<V: View> {
    api: Arc<dyn RecommendationApi>,
    view: V,
    generation: AtomicU64,
}

impl<V: View> Controller<V> {
    pub fn new(api: Arc<dyn RecommendationApi>, view: V) -> Self {
        Self {
            api,
            view,
            generation: AtomicU64::new(0),
        }
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }

    /// Probe the API once and update the status indicator. Never alerts.
    pub async fn check_api(&self) -> HealthStatus {
        let status = match self.api.health().await {
            Ok(code) if code.is_success() => HealthStatus::Ok,
            Ok(code) => {
                tracing::warn!(status = %code, "API health check returned non-success status");
                HealthStatus::Unavailable
            }
            Err(e) => {
                tracing::warn!(error = %e, "API health check could not reach the API");
                HealthStatus::Unreachable
            }
        };

        self.view.set_status(status);
        status
    }

    /// Run one user-triggered recommendation request
    pub async fn get_recommendations(&self, form: &RecommendForm) -> Outcome {
        let query = form.query.trim();
        if query.is_empty() {
            self.view.alert(EMPTY_QUERY_MESSAGE);
            return Outcome::Rejected;
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.view.set_trigger(TriggerState::LOADING);
        let _restore = TriggerGuard {
            view: &self.view,
            generation: &self.generation,
            owner: generation,
        };
        self.view.clear_results();

        let request = RecommendRequest::new(query, form.top_k, form.balance);
        let result = self.api.recommend(&request).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Discarding stale recommendation response");
            return Outcome::Superseded;
        }

        match result {
            Ok(response) if response.recommendations.is_empty() => {
                self.view.show_empty(NO_RESULTS_MESSAGE);
                Outcome::Empty
            }
            Ok(response) => {
                let cards: Vec<Card> = response.recommendations.iter().map(Card::from).collect();
                let count = cards.len();
                self.view.show_cards(cards);
                Outcome::Rendered(count)
            }
            Err(e) => {
                let message = e.to_string();
                self.view.alert(&format!("Error: {}", message));
                Outcome::Failed(message)
            }
        }
    }
}

/// Re-enables the trigger when the owning request finishes, on every exit path.
/// A superseded request leaves the trigger to the newer one.
struct TriggerGuard<'a, V: View> {
    view: &'a V,
    generation: &'a AtomicU64,
    owner: u64,
}

impl<V: View> Drop for TriggerGuard<'_, V> {
    fn drop(&mut self) {
        if self.generation.load(Ordering::SeqCst) == self.owner {
            self.view.set_trigger(TriggerState::IDLE);
        }
    }
}
