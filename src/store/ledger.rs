//! Dedup ledger: the process-wide set of visited entity keys.
//!
//! Keys have the form `{kind}:{id}` and mark Answers/Articles successfully
//! written at least once in any run. The ledger is loaded whole at run start,
//! grown in memory, and persisted as a whole-set overwrite at run end, so it
//! is a monotonic superset across runs.
//!
//! The ledger is bookkeeping, not control flow: the write gate during a run
//! is document existence on disk. Callers must not treat the ledger as
//! authoritative for existence; it can lag behind a store modified by other
//! processes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::fs;

/// Composite ledger key for an answer document.
pub fn answer_key(id: &str) -> String {
    format!("answer:{}", id)
}

/// Composite ledger key for an article document.
pub fn article_key(id: &str) -> String {
    format!("article:{}", id)
}

/// Persisted set of visited `{kind}:{id}` keys.
pub struct VisitedLedger {
    path: PathBuf,
    keys: BTreeSet<String>,
}

impl VisitedLedger {
    /// Load the ledger from disk, or start empty if the file is absent.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if !path.exists() {
            return Ok(Self {
                path,
                keys: BTreeSet::new(),
            });
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read ledger: {}", path.display()))?;
        let keys: Vec<String> =
            serde_json::from_str(&content).context("Failed to parse ledger JSON")?;

        Ok(Self {
            path,
            keys: keys.into_iter().collect(),
        })
    }

    /// Add a key. Returns true if it was not present before.
    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Persist the whole set, replacing the prior file. Keys are written
    /// sorted for stable output.
    pub async fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let keys: Vec<&String> = self.keys.iter().collect();
        let json = serde_json::to_string_pretty(&keys).context("Failed to serialize ledger")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write ledger: {}", self.path.display()))?;

        Ok(())
    }
}
