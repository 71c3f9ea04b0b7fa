//! Normalized document shapes persisted to the store.
//!
//! Every document is written exactly once by this engine (first write wins)
//! and stamped with `crawledAt` at creation. Field names on disk are
//! camelCase; embedded text is stored verbatim.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::{FeedAuthor, QuestionRef, RawItem};

/// Question metadata, created from feed-level data only.
///
/// `needs_fetch` marks that a full fetch is still pending; it is cleared by
/// the external fetch process, never by this engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDoc {
    pub id: String,
    pub title: String,
    pub url: String,
    /// Which source batch introduced this question (`topic_feed:{topicId}`)
    pub source: String,
    pub needs_fetch: bool,
    pub crawled_at: DateTime<Utc>,
}

impl QuestionDoc {
    /// Build a question document from the feed-level reference.
    pub fn from_ref(question: &QuestionRef, source: &str) -> Self {
        Self {
            id: question.id.clone(),
            title: question.title.clone(),
            url: question.url.clone(),
            source: source.to_string(),
            needs_fetch: true,
            crawled_at: Utc::now(),
        }
    }
}

/// One answer, stored under its owning question's `answers/` sub-collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDoc {
    pub id: String,
    pub question_id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub voteup_count: u64,
    pub comment_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<i64>,
    pub author: FeedAuthor,
    pub url: String,
    pub crawled_at: DateTime<Utc>,
}

impl AnswerDoc {
    pub fn from_item(item: &RawItem, question_id: &str) -> Self {
        Self {
            id: item.id.clone(),
            question_id: question_id.to_string(),
            title: item.title.clone(),
            content: item.content.clone(),
            excerpt: item.excerpt.clone(),
            voteup_count: item.voteup_count,
            comment_count: item.comment_count,
            created_time: item.created_time,
            updated_time: item.updated_time,
            author: item.author.clone().unwrap_or_default(),
            url: item.url.clone(),
            crawled_at: Utc::now(),
        }
    }
}

/// A standalone article (no owning question).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleDoc {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub voteup_count: u64,
    pub comment_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_time: Option<i64>,
    pub author: FeedAuthor,
    pub url: String,
    pub image_url: String,
    /// Which source batch introduced this article (`topic_feed:{topicId}`)
    pub source: String,
    pub crawled_at: DateTime<Utc>,
}

impl ArticleDoc {
    pub fn from_item(item: &RawItem, source: &str) -> Self {
        Self {
            id: item.id.clone(),
            title: item.title.clone(),
            content: item.content.clone(),
            excerpt: item.excerpt.clone(),
            voteup_count: item.voteup_count,
            comment_count: item.comment_count,
            created_time: item.created_time,
            updated_time: item.updated_time,
            author: item.author.clone().unwrap_or_default(),
            url: item.url.clone(),
            image_url: item.image_url.clone().unwrap_or_default(),
            source: source.to_string(),
            crawled_at: Utc::now(),
        }
    }
}

/// Author profile as first seen in a feed item. Subsequent sightings of the
/// same author id are no-ops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDoc {
    pub id: String,
    pub name: String,
    pub headline: String,
    pub avatar_url: String,
    pub url: String,
    pub crawled_at: DateTime<Utc>,
}

impl AuthorDoc {
    pub fn from_feed(author: &FeedAuthor) -> Self {
        Self {
            id: author.id.clone(),
            name: author.name.clone(),
            headline: author.headline.clone(),
            avatar_url: author.avatar_url.clone(),
            url: author.url.clone(),
            crawled_at: Utc::now(),
        }
    }
}

/// The topic an export batch was collected from. Created once per topic id,
/// never updated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDoc {
    pub id: String,
    pub url: String,
    /// Item count of the export that first created this topic
    pub feeds_crawled: usize,
    pub crawled_at: DateTime<Utc>,
}

impl TopicDoc {
    pub fn new(id: &str, feeds_crawled: usize) -> Self {
        Self {
            id: id.to_string(),
            url: format!("https://www.zhihu.com/topic/{}", id),
            feeds_crawled,
            crawled_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer_item() -> RawItem {
        RawItem {
            kind: "answer".to_string(),
            id: "a1".to_string(),
            author: Some(FeedAuthor {
                id: "u1".to_string(),
                name: "作者".to_string(),
                ..Default::default()
            }),
            question: Some(QuestionRef {
                id: "q1".to_string(),
                title: "题目".to_string(),
                url: "https://example.com/question/q1".to_string(),
            }),
            content: "内容".to_string(),
            voteup_count: 5,
            created_time: Some(1700000000),
            ..Default::default()
        }
    }

    #[test]
    fn test_question_doc_from_ref() {
        let item = answer_item();
        let doc = QuestionDoc::from_ref(item.question.as_ref().unwrap(), "topic_feed:123");

        assert_eq!(doc.id, "q1");
        assert_eq!(doc.source, "topic_feed:123");
        assert!(doc.needs_fetch);
    }

    #[test]
    fn test_answer_doc_embeds_author() {
        let doc = AnswerDoc::from_item(&answer_item(), "q1");

        assert_eq!(doc.question_id, "q1");
        assert_eq!(doc.author.id, "u1");
        assert_eq!(doc.voteup_count, 5);
    }

    #[test]
    fn test_answer_doc_serializes_camel_case() {
        let doc = AnswerDoc::from_item(&answer_item(), "q1");
        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains("\"questionId\""));
        assert!(json.contains("\"voteupCount\""));
        assert!(json.contains("\"crawledAt\""));
        // absent updatedTime stays off the wire
        assert!(!json.contains("\"updatedTime\""));
    }

    #[test]
    fn test_question_doc_needs_fetch_field_name() {
        let item = answer_item();
        let doc = QuestionDoc::from_ref(item.question.as_ref().unwrap(), "topic_feed:123");
        let json = serde_json::to_string(&doc).unwrap();

        assert!(json.contains("\"needsFetch\":true"));
    }

    #[test]
    fn test_article_doc_defaults_missing_extras() {
        let mut item = answer_item();
        item.kind = "article".to_string();
        item.question = None;
        item.image_url = None;

        let doc = ArticleDoc::from_item(&item, "topic_feed:123");
        assert_eq!(doc.image_url, "");
        assert_eq!(doc.source, "topic_feed:123");
    }

    #[test]
    fn test_topic_doc_canonical_url() {
        let doc = TopicDoc::new("27814732", 40);
        assert_eq!(doc.url, "https://www.zhihu.com/topic/27814732");
        assert_eq!(doc.feeds_crawled, 40);
    }
}
