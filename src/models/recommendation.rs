use serde::{Deserialize, Deserializer, Serialize};

/// Result count used when a request does not say how many it wants
pub const DEFAULT_TOP_K: u32 = 10;

/// One recommended assessment as returned by the API.
///
/// Every field may be missing on the wire; display code falls back to
/// [`DISPLAY_DEFAULTS`] instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(default)]
    pub assessment_name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub test_type: Option<String>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// Body of `POST /recommend`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendRequest {
    pub query: String,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub balance: Option<bool>,
}

impl RecommendRequest {
    pub fn new(query: impl Into<String>, top_k: u32, balance: bool) -> Self {
        Self {
            query: query.into(),
            top_k: Some(top_k),
            balance: Some(balance),
        }
    }
}

/// Body returned by `POST /recommend`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub recommendations: Vec<Recommendation>,
}

/// A `null` list reads the same as a missing one
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body returned by `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
}

/// Placeholder values shown for missing record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayDefaults {
    pub assessment_name: &'static str,
    pub url: &'static str,
    pub test_type: &'static str,
    pub score: &'static str,
}

pub const DISPLAY_DEFAULTS: DisplayDefaults = DisplayDefaults {
    assessment_name: "Unknown",
    url: "#",
    test_type: "K",
    score: "-",
};
