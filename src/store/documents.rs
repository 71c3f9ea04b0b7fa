//! File-per-entity document store.
//!
//! Documents are pretty-printed JSON, organized by entity kind then entity
//! id. Writes are unconditional and create any missing parent directories;
//! idempotence is a contract upheld by callers via the `has_*` existence
//! checks before writing (existence of the target file is definitive proof
//! of prior ingestion).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use tokio::fs;

use crate::domain::{AnswerDoc, ArticleDoc, AuthorDoc, QuestionDoc, TopicDoc};

/// Hierarchical persistence surface rooted at one data directory.
pub struct DocumentStore {
    root: PathBuf,
}

impl DocumentStore {
    /// Create a store handle for the given data root. Nothing is created on
    /// disk until the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open the store at the configured default data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(crate::config::data_dir()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // Paths
    // ========================================================================

    fn question_meta_path(&self, question_id: &str) -> PathBuf {
        self.root.join("questions").join(question_id).join("meta.json")
    }

    fn answers_dir(&self, question_id: &str) -> PathBuf {
        self.root.join("questions").join(question_id).join("answers")
    }

    fn answer_path(&self, question_id: &str, answer_id: &str) -> PathBuf {
        self.answers_dir(question_id).join(format!("{}.json", answer_id))
    }

    fn article_path(&self, article_id: &str) -> PathBuf {
        self.root.join("articles").join(format!("{}.json", article_id))
    }

    fn author_path(&self, author_id: &str) -> PathBuf {
        self.root.join("authors").join(format!("{}.json", author_id))
    }

    fn topic_path(&self, topic_id: &str) -> PathBuf {
        self.root.join("topics").join(format!("{}.json", topic_id))
    }

    /// Internal bookkeeping area (`.state/`)
    pub fn state_dir(&self) -> PathBuf {
        self.root.join(".state")
    }

    /// Path of the dedup ledger file
    pub fn visited_path(&self) -> PathBuf {
        self.state_dir().join("visited.json")
    }

    /// Path of the append-only work queue log
    pub fn queue_path(&self) -> PathBuf {
        self.state_dir().join("queue.jsonl")
    }

    /// Path of the aggregate stats document
    pub fn stats_path(&self) -> PathBuf {
        self.state_dir().join("stats.json")
    }

    // ========================================================================
    // Existence checks (the dedup gate)
    // ========================================================================

    pub fn has_question(&self, question_id: &str) -> bool {
        self.question_meta_path(question_id).exists()
    }

    pub fn has_answer(&self, question_id: &str, answer_id: &str) -> bool {
        self.answer_path(question_id, answer_id).exists()
    }

    pub fn has_article(&self, article_id: &str) -> bool {
        self.article_path(article_id).exists()
    }

    pub fn has_author(&self, author_id: &str) -> bool {
        self.author_path(author_id).exists()
    }

    pub fn has_topic(&self, topic_id: &str) -> bool {
        self.topic_path(topic_id).exists()
    }

    // ========================================================================
    // Writes (unconditional; callers check existence first)
    // ========================================================================

    pub async fn write_question(&self, doc: &QuestionDoc) -> Result<()> {
        write_json(&self.question_meta_path(&doc.id), doc).await
    }

    pub async fn write_answer(&self, doc: &AnswerDoc) -> Result<()> {
        write_json(&self.answer_path(&doc.question_id, &doc.id), doc).await
    }

    pub async fn write_article(&self, doc: &ArticleDoc) -> Result<()> {
        write_json(&self.article_path(&doc.id), doc).await
    }

    pub async fn write_author(&self, doc: &AuthorDoc) -> Result<()> {
        write_json(&self.author_path(&doc.id), doc).await
    }

    pub async fn write_topic(&self, doc: &TopicDoc) -> Result<()> {
        write_json(&self.topic_path(&doc.id), doc).await
    }

    // ========================================================================
    // Enumeration (for stats reconciliation)
    // ========================================================================

    /// List ids of all question collections (one directory per question).
    pub async fn list_question_ids(&self) -> Result<Vec<String>> {
        list_dirs(&self.root.join("questions")).await
    }

    /// List answer ids stored under one question's `answers/` sub-collection.
    pub async fn list_answer_ids(&self, question_id: &str) -> Result<Vec<String>> {
        list_json_stems(&self.answers_dir(question_id)).await
    }

    pub async fn list_article_ids(&self) -> Result<Vec<String>> {
        list_json_stems(&self.root.join("articles")).await
    }

    pub async fn list_author_ids(&self) -> Result<Vec<String>> {
        list_json_stems(&self.root.join("authors")).await
    }
}

/// Serialize `value` as pretty JSON and write it, creating parent
/// directories as needed.
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let json = serde_json::to_string_pretty(value).context("Failed to serialize document")?;
    fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write document: {}", path.display()))?;

    Ok(())
}

/// Names of subdirectories of `dir` (empty if `dir` does not exist).
async fn list_dirs(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();

    if !dir.exists() {
        return Ok(names);
    }

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }

    Ok(names)
}

/// Stems of `*.json` files directly under `dir` (empty if `dir` does not exist).
async fn list_json_stems(dir: &Path) -> Result<Vec<String>> {
    let mut stems = Vec::new();

    if !dir.exists() {
        return Ok(stems);
    }

    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(".json") {
                stems.push(name.trim_end_matches(".json").to_string());
            }
        }
    }

    Ok(stems)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::raw::{FeedAuthor, QuestionRef, RawItem};
    use tempfile::TempDir;

    fn test_store() -> (DocumentStore, TempDir) {
        let temp = TempDir::new().unwrap();
        (DocumentStore::new(temp.path().join("data")), temp)
    }

    #[tokio::test]
    async fn test_write_creates_missing_structure() {
        let (store, _temp) = test_store();

        let question = QuestionRef {
            id: "q1".to_string(),
            title: "t".to_string(),
            url: "u".to_string(),
        };
        let doc = QuestionDoc::from_ref(&question, "topic_feed:1");

        assert!(!store.has_question("q1"));
        store.write_question(&doc).await.unwrap();
        assert!(store.has_question("q1"));
    }

    #[tokio::test]
    async fn test_answer_nests_under_question() {
        let (store, _temp) = test_store();

        let item = RawItem {
            id: "a1".to_string(),
            ..Default::default()
        };
        store
            .write_answer(&AnswerDoc::from_item(&item, "q1"))
            .await
            .unwrap();

        assert!(store.has_answer("q1", "a1"));
        assert!(!store.has_answer("q2", "a1"));
        assert_eq!(store.list_answer_ids("q1").await.unwrap(), vec!["a1"]);
    }

    #[tokio::test]
    async fn test_multibyte_text_preserved() {
        let (store, _temp) = test_store();

        let item = RawItem {
            id: "a1".to_string(),
            content: "站着睡，单腿。".to_string(),
            ..Default::default()
        };
        store
            .write_answer(&AnswerDoc::from_item(&item, "q1"))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(
            store.root().join("questions/q1/answers/a1.json"),
        )
        .unwrap();
        assert!(raw.contains("站着睡，单腿。"));
    }

    #[tokio::test]
    async fn test_enumeration_on_empty_store() {
        let (store, _temp) = test_store();

        assert!(store.list_question_ids().await.unwrap().is_empty());
        assert!(store.list_answer_ids("q1").await.unwrap().is_empty());
        assert!(store.list_article_ids().await.unwrap().is_empty());
        assert!(store.list_author_ids().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_author_flat_keyed() {
        let (store, _temp) = test_store();

        let author = FeedAuthor {
            id: "u1".to_string(),
            name: "n".to_string(),
            ..Default::default()
        };
        store
            .write_author(&AuthorDoc::from_feed(&author))
            .await
            .unwrap();

        assert!(store.has_author("u1"));
        assert_eq!(store.list_author_ids().await.unwrap(), vec!["u1"]);
    }
}
