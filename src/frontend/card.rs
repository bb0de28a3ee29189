//! Card rendering for recommendation records.
//!
//! Records are first normalized into a [`Card`] (placeholders applied, URL vetted, score
//! formatted) and then rendered through askama templates, which escape every field.

use askama::Template;
use reqwest::Url;

use crate::models::{Recommendation, DISPLAY_DEFAULTS};

pub const NO_RESULTS_MESSAGE: &str = "No recommendations found.";

/// Badge style of a card, derived from the record's test type code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Badge {
    /// `K`: knowledge & skills
    Knowledge,
    /// `P`: personality & behavior
    Personality,
    /// Missing or unrecognized code
    Generic,
}

impl Badge {
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_uppercase()).as_deref() {
            Some("K") => Badge::Knowledge,
            Some("P") => Badge::Personality,
            _ => Badge::Generic,
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Badge::Knowledge => "badge k",
            Badge::Personality => "badge p",
            Badge::Generic => "badge",
        }
    }
}

/// Display-ready view of one record
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub href: String,
    pub test_type: String,
    pub badge: Badge,
    pub score: String,
}

impl From<&Recommendation> for Card {
    fn from(rec: &Recommendation) -> Self {
        let test_type = present(&rec.test_type);

        Card {
            name: present(&rec.assessment_name)
                .unwrap_or(DISPLAY_DEFAULTS.assessment_name)
                .to_string(),
            href: present(&rec.url)
                .and_then(safe_href)
                .unwrap_or(DISPLAY_DEFAULTS.url)
                .to_string(),
            test_type: test_type.unwrap_or(DISPLAY_DEFAULTS.test_type).to_string(),
            badge: Badge::from_code(test_type),
            score: format_score(rec.score),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// Keeps http(s) and relative links; anything with another scheme is dropped
fn safe_href(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let has_scheme = trimmed
        .split(['/', '?', '#'])
        .next()
        .is_some_and(|head| head.contains(':'));
    if !has_scheme {
        return Some(trimmed);
    }

    match Url::parse(trimmed) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(trimmed),
        _ => None,
    }
}

/// Three decimals; zero is a real score, only absent or non-finite values get the placeholder
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) if s.is_finite() => format!("{:.3}", s),
        _ => DISPLAY_DEFAULTS.score.to_string(),
    }
}

#[derive(Template)]
#[template(path = "card.html")]
struct CardTemplate<'a> {
    card: &'a Card,
}

#[derive(Template)]
#[template(path = "results.html")]
struct ResultsTemplate<'a> {
    cards: &'a [Card],
    show_empty_message: bool,
    no_results: &'a str,
}

/// Render one record as an HTML card fragment
pub fn render_card(rec: &Recommendation) -> String {
    let card = Card::from(rec);
    CardTemplate { card: &card }.to_string()
}

/// Render the results area: one card per record in server order, or the empty message
pub fn render_results(records: &[Recommendation]) -> String {
    let cards: Vec<Card> = records.iter().map(Card::from).collect();
    ResultsTemplate {
        cards: &cards,
        show_empty_message: cards.is_empty(),
        no_results: NO_RESULTS_MESSAGE,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, url: &str, test_type: &str, score: f64) -> Recommendation {
        Recommendation {
            assessment_name: Some(name.to_string()),
            url: Some(url.to_string()),
            test_type: Some(test_type.to_string()),
            score: Some(score),
        }
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let card = Card::from(&Recommendation::default());
        assert_eq!(card.name, "Unknown");
        assert_eq!(card.href, "#");
        assert_eq!(card.test_type, "K");
        assert_eq!(card.score, "-");
        assert_eq!(card.badge, Badge::Generic);
    }

    #[test]
    fn test_empty_strings_use_defaults() {
        let card = Card::from(&record("", "  ", "", 0.5));
        assert_eq!(card.name, "Unknown");
        assert_eq!(card.href, "#");
        assert_eq!(card.test_type, "K");
    }

    #[test]
    fn test_badge_matching_is_case_insensitive() {
        assert_eq!(Badge::from_code(Some("p")), Badge::Personality);
        assert_eq!(Badge::from_code(Some("P")), Badge::Personality);
        assert_eq!(Badge::from_code(Some("k")), Badge::Knowledge);
        assert_eq!(Badge::from_code(Some("A")), Badge::Generic);
        assert_eq!(Badge::from_code(None), Badge::Generic);
    }

    #[test]
    fn test_badge_classes_are_distinct() {
        assert_eq!(Badge::Knowledge.class(), "badge k");
        assert_eq!(Badge::Personality.class(), "badge p");
        assert_eq!(Badge::Generic.class(), "badge");
    }

    #[test]
    fn test_score_formatting() {
        assert_eq!(format_score(Some(0.91234)), "0.912");
        assert_eq!(format_score(Some(1.0)), "1.000");
        assert_eq!(format_score(Some(-0.25)), "-0.250");
        assert_eq!(format_score(None), "-");
        assert_eq!(format_score(Some(f64::NAN)), "-");
    }

    #[test]
    fn test_zero_score_is_rendered() {
        assert_eq!(format_score(Some(0.0)), "0.000");
        let card = Card::from(&record("Verify G+", "https://example.com/g", "K", 0.0));
        assert_eq!(card.score, "0.000");
    }

    #[test]
    fn test_unsafe_scheme_is_replaced() {
        let card = Card::from(&record("x", "javascript:alert(1)", "K", 0.1));
        assert_eq!(card.href, "#");
        let card = Card::from(&record("x", "data:text/html,hi", "K", 0.1));
        assert_eq!(card.href, "#");
    }

    #[test]
    fn test_http_and_relative_links_are_kept() {
        let card = Card::from(&record("x", "https://www.shl.com/product/java", "K", 0.1));
        assert_eq!(card.href, "https://www.shl.com/product/java");
        let card = Card::from(&record("x", "/product/java", "K", 0.1));
        assert_eq!(card.href, "/product/java");
    }

    #[test]
    fn test_render_card_escapes_markup() {
        let html = render_card(&record("<script>alert(1)</script>", "#", "<b>P</b>", 0.5));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_render_card_contents() {
        let html = render_card(&record("Java 8 (New)", "#", "p", 0.87654));
        assert!(html.contains("class=\"card\""));
        assert!(html.contains("Java 8 (New)"));
        assert!(html.contains("class=\"badge p\""));
        assert!(html.contains("Score: 0.877"));
        assert!(html.contains("target=\"_blank\""));
    }

    #[test]
    fn test_render_results_empty() {
        let html = render_results(&[]);
        assert!(html.contains(NO_RESULTS_MESSAGE));
        assert!(!html.contains("class=\"card\""));
    }

    #[test]
    fn test_render_results_keeps_server_order() {
        let records = vec![
            record("Zeta", "#", "K", 0.2),
            record("Alpha", "#", "P", 0.9),
            record("Mid", "#", "K", 0.5),
        ];
        let html = render_results(&records);
        assert_eq!(html.matches("class=\"card\"").count(), 3);
        assert!(!html.contains(NO_RESULTS_MESSAGE));
        let zeta = html.find("Zeta").unwrap();
        let alpha = html.find("Alpha").unwrap();
        let mid = html.find("Mid").unwrap();
        assert!(zeta < alpha && alpha < mid);
    }
}
