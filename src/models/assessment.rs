use serde::{Deserialize, Serialize};

use super::Recommendation;

/// One entry of the assessment catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub name: String,
    pub url: String,
    pub description: String,
    /// Single-letter code: `K` (knowledge & skills) or `P` (personality & behavior)
    pub test_type: String,
}

impl Assessment {
    /// Text used to embed this entry
    pub fn embedding_text(&self) -> String {
        format!("{} {}", self.name, self.description)
    }

    pub fn is_knowledge(&self) -> bool {
        self.test_type.to_uppercase().contains('K')
    }

    pub fn is_personality(&self) -> bool {
        self.test_type.to_uppercase().contains('P')
    }
}

/// A catalog entry paired with its similarity to the query
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredAssessment {
    pub assessment: Assessment,
    pub score: f32,
}

impl From<ScoredAssessment> for Recommendation {
    fn from(scored: ScoredAssessment) -> Self {
        Recommendation {
            assessment_name: Some(scored.assessment.name),
            url: Some(scored.assessment.url),
            test_type: Some(scored.assessment.test_type),
            score: Some(f64::from(scored.score)),
        }
    }
}
