//! Per-item normalization: classify a raw feed item and persist it.
//!
//! Every side effect is write-once, gated on document existence in the
//! store. The dedup ledger is only *recorded into* here (on first writes of
//! answers/articles); it is never read back as a gate.

use anyhow::Result;

use crate::domain::{AnswerDoc, ArticleDoc, AuthorDoc, QuestionDoc, RawItem};
use crate::store::{answer_key, article_key, DocumentStore, QueueRecord, VisitedLedger, WorkQueue};

/// What processing a single feed item newly persisted. All-false means the
/// item was a duplicate, unrecognized, or dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemOutcome {
    pub new_author: bool,
    pub new_question: bool,
    pub new_answer: bool,
    pub new_article: bool,
}

/// Process one raw feed item against the store.
///
/// - Embedded authors are extracted unconditionally, regardless of item kind.
/// - `answer` items require a question reference; without one the item is
///   dropped silently.
/// - A question's work-queue record is emitted only when its document is
///   first created, so it appears exactly once per question lifetime.
/// - Unrecognized item kinds are skipped, not errors.
pub async fn process_item(
    store: &DocumentStore,
    ledger: &mut VisitedLedger,
    queue: &WorkQueue,
    item: &RawItem,
    source_tag: &str,
) -> Result<ItemOutcome> {
    let mut outcome = ItemOutcome::default();

    if item.id.is_empty() {
        return Ok(outcome);
    }

    if let Some(author) = &item.author {
        if !author.id.is_empty() && !store.has_author(&author.id) {
            store.write_author(&AuthorDoc::from_feed(author)).await?;
            outcome.new_author = true;
        }
    }

    match item.kind.as_str() {
        "answer" => {
            let question = match item.question.as_ref().filter(|q| !q.id.is_empty()) {
                Some(question) => question,
                // answers without a resolvable owning question are dropped
                None => return Ok(outcome),
            };

            if !store.has_question(&question.id) {
                store
                    .write_question(&QuestionDoc::from_ref(question, source_tag))
                    .await?;
                queue
                    .append(&QueueRecord::question(&question.id, source_tag))
                    .await?;
                outcome.new_question = true;
            }

            if !store.has_answer(&question.id, &item.id) {
                store
                    .write_answer(&AnswerDoc::from_item(item, &question.id))
                    .await?;
                ledger.insert(answer_key(&item.id));
                outcome.new_answer = true;
            }
        }
        "article" => {
            if !store.has_article(&item.id) {
                store
                    .write_article(&ArticleDoc::from_item(item, source_tag))
                    .await?;
                ledger.insert(article_key(&item.id));
                outcome.new_article = true;
            }
        }
        _ => {}
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FeedAuthor, QuestionRef};
    use tempfile::TempDir;

    struct Fixture {
        store: DocumentStore,
        ledger: VisitedLedger,
        queue: WorkQueue,
        _temp: TempDir,
    }

    async fn fixture() -> Fixture {
        let temp = TempDir::new().unwrap();
        let store = DocumentStore::new(temp.path().join("data"));
        let ledger = VisitedLedger::load(store.visited_path()).await.unwrap();
        let queue = WorkQueue::new(store.queue_path());
        Fixture {
            store,
            ledger,
            queue,
            _temp: temp,
        }
    }

    fn answer_item(id: &str, question_id: &str) -> RawItem {
        RawItem {
            kind: "answer".to_string(),
            id: id.to_string(),
            question: Some(QuestionRef {
                id: question_id.to_string(),
                title: "题目".to_string(),
                url: String::new(),
            }),
            author: Some(FeedAuthor {
                id: "u1".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_answer_creates_question_once() {
        let mut f = fixture().await;

        let first = process_item(&f.store, &mut f.ledger, &f.queue, &answer_item("a1", "q1"), "topic_feed:1")
            .await
            .unwrap();
        assert!(first.new_question);
        assert!(first.new_answer);

        let second = process_item(&f.store, &mut f.ledger, &f.queue, &answer_item("a2", "q1"), "topic_feed:1")
            .await
            .unwrap();
        assert!(!second.new_question);
        assert!(second.new_answer);

        assert_eq!(f.queue.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_answer_without_question_dropped() {
        let mut f = fixture().await;

        let mut item = answer_item("a1", "q1");
        item.question = None;

        let outcome = process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();

        assert!(!outcome.new_answer);
        // the embedded author is still extracted
        assert!(outcome.new_author);
        assert!(f.store.list_question_ids().await.unwrap().is_empty());
        assert_eq!(f.queue.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_item_id_is_noop() {
        let mut f = fixture().await;

        let mut item = answer_item("", "q1");
        item.id = String::new();

        let outcome = process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();

        assert_eq!(outcome, ItemOutcome::default());
        assert!(!f.store.has_author("u1"));
    }

    #[tokio::test]
    async fn test_unrecognized_kind_skipped() {
        let mut f = fixture().await;

        let mut item = answer_item("p1", "q1");
        item.kind = "pin".to_string();

        let outcome = process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();

        assert!(!outcome.new_answer);
        assert!(!outcome.new_article);
        // author extraction is independent of item kind
        assert!(outcome.new_author);
        assert!(f.ledger.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_answer_untouched() {
        let mut f = fixture().await;
        let item = answer_item("a1", "q1");

        process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();
        let before = std::fs::read_to_string(
            f.store.root().join("questions/q1/answers/a1.json"),
        )
        .unwrap();

        let repeat = process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();
        let after = std::fs::read_to_string(
            f.store.root().join("questions/q1/answers/a1.json"),
        )
        .unwrap();

        assert!(!repeat.new_answer);
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_article_marks_ledger() {
        let mut f = fixture().await;

        let mut item = answer_item("art1", "q1");
        item.kind = "article".to_string();
        item.question = None;

        let outcome = process_item(&f.store, &mut f.ledger, &f.queue, &item, "topic_feed:1")
            .await
            .unwrap();

        assert!(outcome.new_article);
        assert!(f.ledger.contains("article:art1"));
        assert_eq!(f.queue.count().await.unwrap(), 0);
    }
}
