//! feedstore - Incremental crawl-export ingestion into a normalized document store
//!
//! Converts crawl-export files (flat batches of heterogeneous feed items:
//! answers, articles, embedded authors, and the topic they were collected
//! from) into a file-per-entity document store, while maintaining cross-run
//! bookkeeping: a dedup ledger, an append-only follow-up work queue, and
//! aggregate stats reconciled from the store's actual contents.
//!
//! # Architecture
//!
//! The system is built around idempotent, write-once persistence:
//! - Entity identity is the only dedup key; document existence on disk is
//!   definitive proof of prior ingestion ("first write wins")
//! - Aggregate stats are recomputed by walking the store after every run,
//!   never carried forward additively, so they survive crashes and
//!   out-of-band store mutation
//! - The dedup ledger and work queue span runs: the ledger only grows, the
//!   queue is an append-only log consumed by an external fetch process
//!
//! # Modules
//!
//! - `ingest`: Export reading, topic resolution, per-item normalization
//! - `store`: Document store, dedup ledger, work queue, stats reconciler
//! - `domain`: Data structures (raw feed items, persisted documents)
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Ingest one export into the store
//! feedstore ingest output/topic_27814732_2026-01-14T15-38-05/result.json
//!
//! # Read-only summary of store + bookkeeping state
//! feedstore status
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod ingest;
pub mod store;

// Re-export main types at crate root for convenience
pub use domain::{
    AnswerDoc, ArticleDoc, AuthorDoc, FeedAuthor, QuestionDoc, QuestionRef, RawExport, RawItem,
    TopicDoc,
};
pub use ingest::{ingest_export, ItemOutcome, RunSummary};
pub use store::{
    DocumentStore, FetchKind, QueueRecord, Stats, VisitedLedger, WorkQueue, WorkQueueError,
};
