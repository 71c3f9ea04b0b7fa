//! Aggregate stats, reconciled from the store's actual contents.
//!
//! Counts are never carried forward additively: after every run they are
//! recomputed by walking the store, so they stay truthful even when a prior
//! run crashed mid-write or the store was touched out-of-band. Only the
//! source-provenance list is merged additively across runs.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::documents::DocumentStore;

/// Persisted aggregate counts plus batch provenance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub questions: usize,
    pub answers: usize,
    pub articles: usize,
    pub authors: usize,

    /// Distinct source batches ever merged into the store
    #[serde(default)]
    pub sources: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Stats {
    /// Load persisted stats, or zeroed defaults if the file is absent.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read stats: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse stats JSON")
    }

    /// Persist as a whole-file overwrite.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize stats")?;
        fs::write(path, json)
            .await
            .with_context(|| format!("Failed to write stats: {}", path.display()))?;

        Ok(())
    }

    /// Recount documents physically present in the store. Provenance and
    /// timestamp are left for the caller to fill in.
    pub async fn recount(store: &DocumentStore) -> Result<Self> {
        let question_ids = store.list_question_ids().await?;

        let mut answers = 0;
        for question_id in &question_ids {
            answers += store.list_answer_ids(question_id).await?.len();
        }

        Ok(Self {
            questions: question_ids.len(),
            answers,
            articles: store.list_article_ids().await?.len(),
            authors: store.list_author_ids().await?.len(),
            sources: Vec::new(),
            last_updated: None,
        })
    }

    /// Append a source tag if it is not already recorded.
    pub fn merge_source(&mut self, tag: &str) {
        if !self.sources.iter().any(|s| s == tag) {
            self.sources.push(tag.to_string());
        }
    }
}

/// Recompute aggregates from the store and persist them, replacing any
/// previously cached counts. The provenance list is carried over from the
/// prior stats document and merged with `source_tag`.
pub async fn reconcile_stats(store: &DocumentStore, source_tag: &str) -> Result<Stats> {
    let stats_path = store.stats_path();
    let prior = Stats::load(&stats_path).await?;

    let mut stats = Stats::recount(store).await?;
    stats.sources = prior.sources;
    stats.merge_source(source_tag);
    stats.last_updated = Some(Utc::now());

    stats.save(&stats_path).await?;
    Ok(stats)
}
