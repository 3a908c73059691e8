//! Thread creation and the thread detail read path.

use std::sync::Arc;

use domains::{
    prefixed_id, require_id, AddThread, AddThreadPayload, AddedThread, CommentRepository,
    CommentView, IdGenerator, NewThread, Result, Scope, ThreadDetail, ThreadRepository,
    THREAD_ID_PREFIX,
};
use tracing::{debug, info, instrument};

use crate::in_scope;

pub struct ThreadService {
    threads: Arc<dyn ThreadRepository>,
    comments: Arc<dyn CommentRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl ThreadService {
    pub fn new(
        threads: Arc<dyn ThreadRepository>,
        comments: Arc<dyn CommentRepository>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            threads,
            comments,
            ids,
        }
    }

    /// Validates and stores a new thread, returning `{id, title, owner}`.
    #[instrument(skip_all)]
    pub async fn add_thread(&self, payload: AddThreadPayload) -> Result<AddedThread> {
        let thread = AddThread::try_from(payload)?;

        let new_thread = NewThread {
            id: prefixed_id(THREAD_ID_PREFIX, &self.ids.generate()),
            owner_id: thread.owner_id,
            owner_username: thread.owner_username,
            title: thread.title,
            body: thread.body,
        };

        let added = self
            .threads
            .add_thread(new_thread)
            .await
            .map_err(in_scope(Scope::AddThread))?;

        info!(thread_id = %added.id, owner = %added.owner, "thread created");
        Ok(added)
    }

    /// Returns the thread with its comments oldest first. Deleted comments are
    /// redacted; comments sharing a timestamp keep the order storage gave them.
    #[instrument(skip(self))]
    pub async fn get_thread_detail(&self, thread_id: &str) -> Result<ThreadDetail> {
        require_id(Scope::GetThreadDetail, thread_id)?;

        let thread = self
            .threads
            .get_thread_by_id(thread_id)
            .await
            .map_err(in_scope(Scope::GetThreadDetail))?;

        let mut records = self
            .comments
            .get_comments_for_thread(thread_id)
            .await
            .map_err(in_scope(Scope::GetThreadDetail))?;

        // Stable sort.
        records.sort_by_key(|record| record.date);

        debug!(comments = records.len(), "thread detail loaded");

        Ok(ThreadDetail {
            thread,
            comments: records.into_iter().map(CommentView::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domains::{
        CommentRecord, DomainError, ErrorKey, MockCommentRepository, MockIdGenerator,
        MockThreadRepository, Reason, RepositoryError, ThreadSummary,
        DELETED_COMMENT_PLACEHOLDER,
    };
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn fixed_ids() -> MockIdGenerator {
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().returning(|| "123".to_string());
        ids
    }

    fn service(
        threads: MockThreadRepository,
        comments: MockCommentRepository,
        ids: MockIdGenerator,
    ) -> ThreadService {
        ThreadService::new(Arc::new(threads), Arc::new(comments), Arc::new(ids))
    }

    fn payload() -> AddThreadPayload {
        AddThreadPayload {
            owner_id: Some(json!("user-123")),
            owner_username: Some(json!("dicoding")),
            title: Some(json!("sebuah thread")),
            body: Some(json!("sebuah body thread")),
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 8, 8, 7, 19, 9).unwrap()
    }

    fn summary(id: &str) -> ThreadSummary {
        ThreadSummary {
            id: id.to_string(),
            title: "sebuah thread".to_string(),
            body: "sebuah body thread".to_string(),
            date: t0(),
            username: "dicoding".to_string(),
        }
    }

    fn record(id: &str, date: DateTime<Utc>, is_deleted: bool) -> CommentRecord {
        CommentRecord {
            id: id.to_string(),
            username: "johndoe".to_string(),
            date,
            content: format!("isi {id}"),
            is_deleted,
        }
    }

    fn detail_service(records: Vec<CommentRecord>) -> ThreadService {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_get_thread_by_id()
            .withf(|id| id == "thread-1")
            .times(1)
            .returning(|id| Ok(summary(id)));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_get_comments_for_thread()
            .withf(|id| id == "thread-1")
            .times(1)
            .returning(move |_| Ok(records.clone()));

        service(threads, comments, MockIdGenerator::new())
    }

    #[tokio::test]
    async fn add_thread_persists_prefixed_thread() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_add_thread()
            .withf(|t| {
                t.id == "thread-123"
                    && t.owner_id == "user-123"
                    && t.owner_username == "dicoding"
                    && t.title == "sebuah thread"
                    && t.body == "sebuah body thread"
            })
            .times(1)
            .returning(|t| {
                Ok(AddedThread {
                    id: t.id,
                    title: t.title,
                    owner: t.owner_id,
                })
            });

        let svc = service(threads, MockCommentRepository::new(), fixed_ids());
        let added = assert_ok!(svc.add_thread(payload()).await);

        assert!(added.id.starts_with("thread-"));
        assert_eq!(
            added,
            AddedThread {
                id: "thread-123".to_string(),
                title: "sebuah thread".to_string(),
                owner: "user-123".to_string(),
            }
        );
        let json = serde_json::to_value(&added).unwrap();
        assert_eq!(json.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn add_thread_rejects_invalid_payload_before_storage() {
        let mut threads = MockThreadRepository::new();
        threads.expect_add_thread().never();
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().never();

        let svc = service(threads, MockCommentRepository::new(), ids);

        let missing = AddThreadPayload {
            title: None,
            ..payload()
        };
        let err = assert_err!(svc.add_thread(missing).await);
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::AddThread, Reason::MissingProperty))
        );

        let wrong = AddThreadPayload {
            body: Some(json!({ "text": "isi" })),
            ..payload()
        };
        let err = assert_err!(svc.add_thread(wrong).await);
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::AddThread, Reason::WrongType))
        );
    }

    #[tokio::test]
    async fn add_thread_passes_backend_failures_through() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_add_thread()
            .returning(|_| Err(RepositoryError::backend(anyhow::anyhow!("disk full"))));

        let svc = service(threads, MockCommentRepository::new(), fixed_ids());
        let err = assert_err!(svc.add_thread(payload()).await);
        assert!(matches!(err, DomainError::Storage(RepositoryError::Backend(_))));
    }

    #[tokio::test]
    async fn thread_detail_orders_and_redacts_comments() {
        let t1 = t0() + Duration::minutes(10);
        let t2 = t0() + Duration::minutes(5);
        let svc = detail_service(vec![record("c1", t1, false), record("c2", t2, true)]);

        let detail = assert_ok!(svc.get_thread_detail("thread-1").await);

        assert_eq!(detail.thread, summary("thread-1"));
        let ids: Vec<_> = detail.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["c2", "c1"]);
        assert_eq!(detail.comments[0].content, DELETED_COMMENT_PLACEHOLDER);
        assert_eq!(detail.comments[1].content, "isi c1");
    }

    #[tokio::test]
    async fn thread_detail_never_exposes_deletion_flag() {
        let svc = detail_service(vec![
            record("a", t0(), true),
            record("b", t0() + Duration::seconds(1), false),
            record("c", t0() + Duration::seconds(2), true),
        ]);

        let detail = assert_ok!(svc.get_thread_detail("thread-1").await);
        let json = serde_json::to_value(&detail).unwrap();
        for comment in json["comments"].as_array().unwrap() {
            assert!(comment.get("is_deleted").is_none());
            assert!(comment.get("isDeleted").is_none());
        }
        let redacted: Vec<_> = detail
            .comments
            .iter()
            .filter(|c| c.id != "b")
            .map(|c| c.content.as_str())
            .collect();
        assert_eq!(redacted, [DELETED_COMMENT_PLACEHOLDER; 2]);
    }

    #[tokio::test]
    async fn thread_detail_order_ignores_storage_order() {
        let base: Vec<_> = (0..5)
            .map(|i| record(&format!("c{i}"), t0() + Duration::seconds(i), i % 2 == 0))
            .collect();

        for rotation in 0..base.len() {
            let mut shuffled = base.clone();
            shuffled.reverse();
            shuffled.rotate_left(rotation);

            let detail = assert_ok!(detail_service(shuffled).get_thread_detail("thread-1").await);
            let dates: Vec<_> = detail.comments.iter().map(|c| c.date).collect();
            assert!(dates.windows(2).all(|w| w[0] <= w[1]), "{dates:?}");
        }
    }

    #[tokio::test]
    async fn thread_detail_keeps_storage_order_on_equal_timestamps() {
        let svc = detail_service(vec![
            record("first", t0(), false),
            record("second", t0(), false),
            record("earlier", t0() - Duration::seconds(1), false),
        ]);

        let detail = assert_ok!(svc.get_thread_detail("thread-1").await);
        let ids: Vec<_> = detail.comments.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["earlier", "first", "second"]);
    }

    #[tokio::test]
    async fn thread_detail_of_missing_thread_is_not_found() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_get_thread_by_id()
            .returning(|id| Err(RepositoryError::thread_not_found(id)));
        let mut comments = MockCommentRepository::new();
        comments.expect_get_comments_for_thread().never();

        let svc = service(threads, comments, MockIdGenerator::new());
        let err = assert_err!(svc.get_thread_detail("thread-404").await);
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::GetThreadDetail, Reason::ThreadNotFound))
        );
    }

    #[tokio::test]
    async fn thread_detail_with_blank_id_skips_storage() {
        let mut threads = MockThreadRepository::new();
        threads.expect_get_thread_by_id().never();

        let svc = service(threads, MockCommentRepository::new(), MockIdGenerator::new());
        let err = assert_err!(svc.get_thread_detail("").await);
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::GetThreadDetail, Reason::MissingProperty))
        );
    }
}
