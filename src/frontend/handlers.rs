use askama::Template;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::models::DEFAULT_TOP_K;

use super::{
    card::{Card, NO_RESULTS_MESSAGE},
    controller::{Controller, RecommendForm},
    view::PageView,
    FrontendState,
};

/// Errors raised while producing a page
#[derive(thiserror::Error, Debug)]
pub enum FrontendError {
    #[error("Template error: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Failed to render page");
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}

/// Query string of `GET /`. A present `query` means the form was submitted.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub query: Option<String>,
    pub top_k: Option<String>,
    pub balance: Option<String>,
}

impl PageParams {
    /// The submitted form, if any. Unparseable or zero `top_k` falls back to the default.
    pub fn form(&self) -> Option<RecommendForm> {
        let query = self.query.as_ref()?;
        let top_k = self
            .top_k
            .as_deref()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|k| *k > 0)
            .unwrap_or(DEFAULT_TOP_K);
        // Unchecked checkboxes are not sent
        let balance = matches!(self.balance.as_deref(), Some("true" | "on" | "1"));

        Some(RecommendForm {
            query: query.clone(),
            top_k,
            balance,
        })
    }
}

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate<'a> {
    status_label: &'a str,
    status_color: &'a str,
    alert: Option<String>,
    query: String,
    top_k: u32,
    balance: bool,
    trigger_enabled: bool,
    trigger_label: &'a str,
    cards: Vec<Card>,
    show_empty_message: bool,
    no_results: &'a str,
}

/// Page load: health probe, plus the recommendation flow when the form was submitted
pub async fn index(
    State(state): State<FrontendState>,
    Query(params): Query<PageParams>,
) -> Result<Html<String>, FrontendError> {
    let form = params.form();
    let controller = Controller::new(state.api.clone(), PageView::default());

    let (_status, outcome) = tokio::join!(controller.check_api(), async {
        match &form {
            Some(form) => Some(controller.get_recommendations(form).await),
            None => None,
        }
    });

    if let Some(outcome) = &outcome {
        tracing::info!(outcome = ?outcome, "Recommendation flow finished");
    }

    let page = controller.into_view().into_state();
    let (status_label, status_color) = match page.status {
        Some(status) => (status.label(), status.color()),
        None => ("Checking API...", "gray"),
    };
    let form = form.unwrap_or_else(|| RecommendForm::new(""));

    let template = IndexTemplate {
        status_label,
        status_color,
        alert: page.alert,
        query: form.query,
        top_k: form.top_k,
        balance: form.balance,
        trigger_enabled: page.trigger.enabled,
        trigger_label: page.trigger.label,
        show_empty_message: page.empty_message.is_some(),
        cards: page.cards,
        no_results: NO_RESULTS_MESSAGE,
    };

    Ok(Html(template.render()?))
}
