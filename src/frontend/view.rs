use std::sync::{Mutex, MutexGuard};

use crate::frontend::card::Card;
use crate::frontend::controller::{HealthStatus, TriggerState, View};

/// Everything the page shows, as last written by the controller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageState {
    pub status: Option<HealthStatus>,
    pub trigger: TriggerState,
    pub cards: Vec<Card>,
    pub empty_message: Option<String>,
    pub alert: Option<String>,
}

/// In-memory [`View`] backing one server-rendered page
#[derive(Debug, Default)]
pub struct PageView {
    state: Mutex<PageState>,
}

impl PageView {
    pub fn state(&self) -> PageState {
        self.lock().clone()
    }

    pub fn into_state(self) -> PageState {
        self.state.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl View for PageView {
    fn set_status(&self, status: HealthStatus) {
        self.lock().status = Some(status);
    }

    fn set_trigger(&self, state: TriggerState) {
        self.lock().trigger = state;
    }

    fn clear_results(&self) {
        let mut page = self.lock();
        page.cards.clear();
        page.empty_message = None;
    }

    fn show_cards(&self, cards: Vec<Card>) {
        let mut page = self.lock();
        page.cards = cards;
        page.empty_message = None;
    }

    fn show_empty(&self, message: &str) {
        let mut page = self.lock();
        page.cards.clear();
        page.empty_message = Some(message.to_string());
    }

    fn alert(&self, message: &str) {
        self.lock().alert = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::card::Badge;

    fn card(name: &str) -> Card {
        Card {
            name: name.to_string(),
            href: "#".to_string(),
            test_type: "K".to_string(),
            badge: Badge::Knowledge,
            score: "0.500".to_string(),
        }
    }

    #[test]
    fn test_default_page_state() {
        let state = PageView::default().into_state();
        assert_eq!(state.trigger, TriggerState::IDLE);
        assert!(state.status.is_none());
        assert!(state.cards.is_empty());
    }

    #[test]
    fn test_clear_results_drops_cards_and_message() {
        let view = PageView::default();
        view.show_cards(vec![card("a"), card("b")]);
        view.clear_results();
        assert!(view.state().cards.is_empty());

        view.show_empty("nothing");
        view.clear_results();
        assert!(view.state().empty_message.is_none());
    }

    #[test]
    fn test_empty_message_replaces_cards() {
        let view = PageView::default();
        view.show_cards(vec![card("a")]);
        view.show_empty("No recommendations found.");
        let state = view.state();
        assert!(state.cards.is_empty());
        assert_eq!(state.empty_message.as_deref(), Some("No recommendations found."));
    }
}
