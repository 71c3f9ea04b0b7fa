//! File-based persistence: the document store and cross-run bookkeeping.
//!
//! # Storage Layout
//!
//! ```text
//! <data root>/
//! ├── questions/{qid}/
//! │   ├── meta.json             # question metadata
//! │   └── answers/{aid}.json    # answers keyed by answer id
//! ├── articles/{id}.json
//! ├── authors/{id}.json
//! ├── topics/{id}.json
//! └── .state/
//!     ├── queue.jsonl           # append-only follow-up fetch log
//!     ├── visited.json          # dedup ledger (whole-set overwrite)
//!     └── stats.json            # aggregates reconciled from the store
//! ```

pub mod documents;
pub mod ledger;
pub mod queue;
pub mod stats;

// Re-export commonly used types
pub use documents::DocumentStore;
pub use ledger::{answer_key, article_key, VisitedLedger};
pub use queue::{FetchKind, QueueRecord, WorkQueue, WorkQueueError};
pub use stats::{reconcile_stats, Stats};
