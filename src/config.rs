use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CSV catalog of assessments served by the recommendation API
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Directory receiving `traces.jsonl`
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Recommendation API used by the front end.
    /// When unset the front end talks to this server's own API.
    #[serde(default)]
    pub api_base_url: Option<String>,

    /// Sentence embedding model (only read when built with the `fastembed` feature)
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("data/shl_catalog.csv")
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}

fn default_embedding_model() -> String {
    "all-MiniLM-L6-v2".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Base URL the front end sends API calls to
    pub fn api_base_url(&self) -> String {
        match &self.api_base_url {
            Some(url) if !url.trim().is_empty() => url.trim_end_matches('/').to_string(),
            _ => format!("http://{}", self.bind_address()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(vars: Vec<(&str, &str)>) -> Config {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()));
        envy::from_iter::<_, Config>(vars).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = config_from(vec![]);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8000);
        assert_eq!(config.catalog_path, PathBuf::from("data/shl_catalog.csv"));
        assert_eq!(config.logs_dir, PathBuf::from("logs"));
        assert!(config.api_base_url.is_none());
    }

    #[test]
    fn test_api_base_url_defaults_to_own_origin() {
        let config = config_from(vec![("HOST", "0.0.0.0"), ("PORT", "9000")]);
        assert_eq!(config.api_base_url(), "http://0.0.0.0:9000");
    }

    #[test]
    fn test_api_base_url_override_strips_trailing_slash() {
        let config = config_from(vec![("API_BASE_URL", "https://api.example.com/")]);
        assert_eq!(config.api_base_url(), "https://api.example.com");
    }
}
