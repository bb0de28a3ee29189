use once_cell::sync::Lazy;
use regex::Regex;

/// Abbreviations and phrasings rewritten before a query is embedded
const SYNONYMS: &[(&str, &str)] = &[
    (r"\bjs\b", "javascript"),
    (r"\bnode\s*js\b", "nodejs"),
    (r"\breact\s*js\b", "react"),
    (r"\bts\b", "typescript"),
    (r"\bcsharp\b", "c#"),
    (r"\bpgsql\b", "postgresql"),
    (r"\bpostgres\b", "postgresql"),
    (r"\bml\b", "machine learning"),
    (r"\bdl\b", "deep learning"),
    (r"\bnlp\b", "natural language processing"),
    (r"\bllm(s)?\b", "large language model"),
    // steers toward personality (P) assessments
    (r"\bcommunication\b", "collaboration"),
    (r"\bstakeholder mgmt\b", "stakeholder management"),
    (r"\bstakeholders?\b", "stakeholder management"),
    (r"\bproblem\s*solving\b", "cognitive"),
];

static SYNONYM_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    SYNONYMS
        .iter()
        .filter_map(|(pattern, replacement)| {
            match Regex::new(&format!("(?i){}", pattern)) {
                Ok(regex) => Some((regex, *replacement)),
                Err(e) => {
                    tracing::error!(pattern = %pattern, error = %e, "Invalid synonym pattern");
                    None
                }
            }
        })
        .collect()
});

/// Trims, lowercases and expands known abbreviations, applied in table order
pub fn normalize_query(query: &str) -> String {
    let mut normalized = query.trim().to_lowercase();
    for (regex, replacement) in SYNONYM_PATTERNS.iter() {
        normalized = regex.replace_all(&normalized, *replacement).into_owned();
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_patterns_compile() {
        assert_eq!(SYNONYM_PATTERNS.len(), SYNONYMS.len());
    }

    #[test]
    fn test_trim_and_lowercase() {
        assert_eq!(normalize_query("  Java Developer  "), "java developer");
    }

    #[test]
    fn test_abbreviations_expand_on_word_boundaries() {
        assert_eq!(normalize_query("JS and ML"), "javascript and machine learning");
        assert_eq!(normalize_query("json"), "json");
        assert_eq!(normalize_query("html"), "html");
    }

    #[test]
    fn test_multi_word_patterns() {
        assert_eq!(normalize_query("Node JS backend"), "nodejs backend");
        assert_eq!(normalize_query("problem solving"), "cognitive");
        assert_eq!(normalize_query("LLMs"), "large language model");
    }

    #[test]
    fn test_stakeholder_rewrites_apply_in_order() {
        assert_eq!(normalize_query("stakeholders"), "stakeholder management");
        // the later singular rule also matches the expanded phrase
        assert_eq!(
            normalize_query("stakeholder mgmt"),
            "stakeholder management management"
        );
    }

    #[test]
    fn test_empty_query() {
        assert_eq!(normalize_query("   "), "");
    }
}
