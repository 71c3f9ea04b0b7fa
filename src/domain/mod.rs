//! Domain types for the ingestion engine.
//!
//! This module contains the core data structures:
//! - Raw: the shapes found in a crawl export file, as-deserialized
//! - Documents: the normalized shapes persisted to the document store

pub mod documents;
pub mod raw;

// Re-export commonly used types
pub use documents::{AnswerDoc, ArticleDoc, AuthorDoc, QuestionDoc, TopicDoc};
pub use raw::{FeedAuthor, QuestionRef, RawExport, RawItem};
