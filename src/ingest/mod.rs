//! Crawl-export ingestion pipeline.
//!
//! One run processes a single export file start-to-finish:
//!
//! ```text
//! export file → read + topic resolution
//!             → per-item normalization (documents + ledger + queue)
//!             → topic document (create-if-absent)
//!             → ledger persisted whole, stats reconciled from the store
//! ```
//!
//! Bookkeeping state is loaded from the store at run start, threaded through
//! the item loop explicitly, and persisted at run end. Nothing is ambient,
//! so the whole pipeline runs against a temp-dir store in tests.
//!
//! Runs are not safe to execute concurrently against one store: existence
//! checks and writes are separate operations. Callers serialize runs.

use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::domain::TopicDoc;
use crate::store::{reconcile_stats, DocumentStore, VisitedLedger, WorkQueue};

pub mod export;
pub mod normalizer;

// Re-export key types
pub use export::{feed_source_tag, read_export, resolve_topic_id, UNKNOWN_TOPIC_ID};
pub use normalizer::{process_item, ItemOutcome};

/// Counters for documents newly persisted by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items read from the export (including skipped/dropped ones)
    pub items_read: usize,
    pub new_questions: usize,
    pub new_answers: usize,
    pub new_articles: usize,
    pub new_authors: usize,
}

impl RunSummary {
    fn absorb(&mut self, outcome: &ItemOutcome) {
        if outcome.new_question {
            self.new_questions += 1;
        }
        if outcome.new_answer {
            self.new_answers += 1;
        }
        if outcome.new_article {
            self.new_articles += 1;
        }
        if outcome.new_author {
            self.new_authors += 1;
        }
    }
}

/// Ingest one export file into the store.
///
/// Fatal on a missing/malformed export or an empty item batch; per-item
/// anomalies (unrecognized kinds, unresolvable questions, missing fields)
/// never abort the run.
pub async fn ingest_export(store: &DocumentStore, export_path: &Path) -> Result<RunSummary> {
    let export = read_export(export_path).await?;
    if export.items.is_empty() {
        anyhow::bail!("Export contains no items: {}", export_path.display());
    }

    let topic_id = resolve_topic_id(export_path);
    let source_tag = feed_source_tag(&topic_id);
    info!(
        "Ingesting {} items from topic {}",
        export.items.len(),
        topic_id
    );

    let mut ledger = VisitedLedger::load(store.visited_path()).await?;
    let queue = WorkQueue::new(store.queue_path());
    info!("Loaded ledger with {} visited keys", ledger.len());

    let mut summary = RunSummary {
        items_read: export.items.len(),
        ..Default::default()
    };

    for item in &export.items {
        let outcome = process_item(store, &mut ledger, &queue, item, &source_tag).await?;
        summary.absorb(&outcome);
    }

    if !store.has_topic(&topic_id) {
        store
            .write_topic(&TopicDoc::new(&topic_id, export.items.len()))
            .await?;
    }

    ledger.save().await?;
    let stats = reconcile_stats(store, &source_tag).await?;

    info!(
        "Run complete: +{} questions, +{} answers, +{} articles, +{} authors ({} total answers in store)",
        summary.new_questions,
        summary.new_answers,
        summary.new_articles,
        summary.new_authors,
        stats.answers
    );

    Ok(summary)
}
