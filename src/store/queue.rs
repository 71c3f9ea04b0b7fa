//! Append-only work queue for follow-up deep fetches.
//!
//! Each record is one JSON line requesting a full fetch of an entity that is
//! only known from feed-level metadata. This crate is a write sink: records
//! are appended during ingestion and consumed entirely by the external fetch
//! process. No dequeue or compaction logic lives here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

/// Queue priority for questions discovered via topic feed items.
pub const FEED_QUESTION_PRIORITY: u32 = 2;

/// Errors that can occur with the work queue
#[derive(Debug, Error)]
pub enum WorkQueueError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Kind of entity a queue record asks to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    Question,
}

/// One follow-up fetch request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueRecord {
    #[serde(rename = "type")]
    pub kind: FetchKind,

    pub id: String,

    pub priority: u32,

    /// Which source batch requested the fetch (`topic_feed:{topicId}`)
    pub source: String,
}

impl QueueRecord {
    /// Fetch request for a question first seen in a feed item.
    pub fn question(id: &str, source: &str) -> Self {
        Self {
            kind: FetchKind::Question,
            id: id.to_string(),
            priority: FEED_QUESTION_PRIORITY,
            source: source.to_string(),
        }
    }
}

/// JSONL-backed append-only queue
pub struct WorkQueue {
    path: PathBuf,
}

impl WorkQueue {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append one record to the log.
    pub async fn append(&self, record: &QueueRecord) -> Result<(), WorkQueueError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let json = serde_json::to_string(record)?;
        file.write_all(format!("{}\n", json).as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    /// Read all records back (reporting only). Unparseable lines are skipped
    /// with a warning; an absent file yields an empty queue.
    pub async fn load(&self) -> Result<Vec<QueueRecord>, WorkQueueError> {
        let mut records = Vec::new();

        if !self.path.exists() {
            return Ok(records);
        }

        let file = File::open(&self.path).await?;
        let reader = BufReader::new(file);
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping unparseable queue line: {}", e),
            }
        }

        Ok(records)
    }

    /// Number of records in the log.
    pub async fn count(&self) -> Result<usize, WorkQueueError> {
        Ok(self.load().await?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_queue(temp: &TempDir) -> WorkQueue {
        WorkQueue::new(temp.path().join(".state").join("queue.jsonl"))
    }

    #[tokio::test]
    async fn test_append_and_load() {
        let temp = TempDir::new().unwrap();
        let queue = test_queue(&temp);

        queue
            .append(&QueueRecord::question("q1", "topic_feed:123"))
            .await
            .unwrap();
        queue
            .append(&QueueRecord::question("q2", "topic_feed:123"))
            .await
            .unwrap();

        let records = queue.load().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "q1");
        assert_eq!(records[0].kind, FetchKind::Question);
        assert_eq!(records[0].priority, FEED_QUESTION_PRIORITY);
        assert_eq!(records[1].id, "q2");
    }

    #[tokio::test]
    async fn test_absent_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let queue = test_queue(&temp);

        assert_eq!(queue.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_garbage_lines_skipped() {
        let temp = TempDir::new().unwrap();
        let queue = test_queue(&temp);

        queue
            .append(&QueueRecord::question("q1", "topic_feed:123"))
            .await
            .unwrap();

        // Corrupt the log with a truncated line
        let mut content = std::fs::read_to_string(temp.path().join(".state/queue.jsonl")).unwrap();
        content.push_str("{\"type\": \"question\", \"id\"\n");
        std::fs::write(temp.path().join(".state/queue.jsonl"), content).unwrap();

        let records = queue.load().await.unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_record_wire_format() {
        let record = QueueRecord::question("q1", "topic_feed:123");
        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("\"type\":\"question\""));
        assert!(json.contains("\"priority\":2"));
        assert!(json.contains("\"source\":\"topic_feed:123\""));
    }
}
