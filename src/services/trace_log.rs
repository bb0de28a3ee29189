use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tokio::{fs::OpenOptions, io::AsyncWriteExt, sync::Mutex};
use uuid::Uuid;

use crate::models::Recommendation;

const TRACE_FILE: &str = "traces.jsonl";

/// What a recommendation request asked for and what it returned
#[derive(Debug, Clone)]
pub struct TraceEntry<'a> {
    pub query: &'a str,
    pub top_k: usize,
    pub balance: bool,
    pub results: &'a [Recommendation],
}

#[derive(Serialize)]
struct TraceRow<'a> {
    id: Uuid,
    ts: String,
    query: &'a str,
    top_k: usize,
    balance: bool,
    results: &'a [Recommendation],
}

/// Append-only JSON Lines log of recommendation requests
pub struct TraceLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl TraceLog {
    pub fn new(logs_dir: &Path) -> Self {
        Self {
            path: logs_dir.join(TRACE_FILE),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row. Failures are logged and otherwise ignored.
    pub async fn record(&self, id: Uuid, entry: TraceEntry<'_>) {
        if let Err(e) = self.append(id, entry).await {
            tracing::warn!(
                request_id = %id,
                path = %self.path.display(),
                error = %e,
                "Failed to write trace"
            );
        }
    }

    async fn append(&self, id: Uuid, entry: TraceEntry<'_>) -> anyhow::Result<()> {
        let row = TraceRow {
            id,
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            query: entry.query,
            top_k: entry.top_k,
            balance: entry.balance,
            results: entry.results,
        };
        let mut line = serde_json::to_vec(&row)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<Recommendation> {
        vec![Recommendation {
            assessment_name: Some("Core Java".to_string()),
            url: Some("https://example.com/java".to_string()),
            test_type: Some("K".to_string()),
            score: Some(0.5),
        }]
    }

    #[tokio::test]
    async fn test_record_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = TraceLog::new(&dir.path().join("logs"));
        let results = results();

        let first = Uuid::new_v4();
        log.record(
            first,
            TraceEntry {
                query: "java",
                top_k: 5,
                balance: true,
                results: &results,
            },
        )
        .await;
        log.record(
            Uuid::new_v4(),
            TraceEntry {
                query: "sql",
                top_k: 3,
                balance: false,
                results: &[],
            },
        )
        .await;

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["id"], first.to_string());
        assert_eq!(lines[0]["query"], "java");
        assert_eq!(lines[0]["top_k"], 5);
        assert_eq!(lines[0]["balance"], true);
        assert_eq!(lines[0]["results"][0]["assessment_name"], "Core Java");
        assert!(lines[0]["ts"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["results"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unwritable_path_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "not a directory").unwrap();

        let log = TraceLog::new(&blocker);
        log.record(
            Uuid::new_v4(),
            TraceEntry {
                query: "java",
                top_k: 1,
                balance: false,
                results: &[],
            },
        )
        .await;

        assert!(!log.path().exists());
    }
}
