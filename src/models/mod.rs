pub mod assessment;
pub mod recommendation;

pub use assessment::{Assessment, ScoredAssessment};
pub use recommendation::{
    DisplayDefaults, HealthResponse, RecommendRequest, RecommendResponse, Recommendation,
    DEFAULT_TOP_K, DISPLAY_DEFAULTS,
};
