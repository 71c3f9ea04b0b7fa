//! Raw shapes of a crawl export file.
//!
//! An export is a single JSON object with an `items` array holding one batch
//! of heterogeneous feed items. Field values are frequently missing in real
//! exports, so everything except the `items` array itself is defaulted rather
//! than rejected.

use serde::{Deserialize, Serialize};

/// One crawl export: a batch of raw feed items.
///
/// The `items` field is required; an export without it is malformed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawExport {
    pub items: Vec<RawItem>,
}

/// A single raw feed item, prior to classification.
///
/// `kind` carries the `type` discriminator from the wire: `answer` and
/// `article` are recognized, anything else is skipped during normalization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItem {
    #[serde(rename = "type", default)]
    pub kind: String,

    #[serde(default)]
    pub id: String,

    /// Author embedded in the feed item, if any
    #[serde(default)]
    pub author: Option<FeedAuthor>,

    /// Owning question reference (present on answer items)
    #[serde(default)]
    pub question: Option<QuestionRef>,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub voteup_count: u64,

    #[serde(default)]
    pub comment_count: u64,

    /// Creation time as epoch seconds (absent for some item kinds)
    #[serde(default)]
    pub created_time: Option<i64>,

    /// Last-update time as epoch seconds
    #[serde(default)]
    pub updated_time: Option<i64>,

    #[serde(default)]
    pub url: String,

    /// Cover image (article items only)
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Author as embedded in feed items.
///
/// Also stored verbatim inside Answer and Article documents, so it derives
/// `Serialize` as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedAuthor {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub headline: String,

    #[serde(default)]
    pub avatar_url: String,

    #[serde(default)]
    pub url: String,
}

/// Feed-level reference to the question an answer belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionRef {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,
}
