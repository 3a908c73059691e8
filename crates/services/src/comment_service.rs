//! Adding comments to threads and soft-deleting them.

use std::sync::Arc;

use domains::{
    prefixed_id, require_id, AddComment, AddCommentPayload, AddedComment, CommentRepository,
    DomainError, IdGenerator, NewComment, Reason, Result, Scope, ThreadCommentLink,
    ThreadRepository, COMMENT_ID_PREFIX, LINK_ID_PREFIX,
};
use tracing::{debug, info, instrument, warn};

use crate::in_scope;

pub struct CommentService {
    threads: Arc<dyn ThreadRepository>,
    comments: Arc<dyn CommentRepository>,
    ids: Arc<dyn IdGenerator>,
}

impl CommentService {
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

    /// Stores a comment and links it to its thread. The thread must exist
    /// before anything is written.
    #[instrument(skip_all)]
    pub async fn add_comment(&self, payload: AddCommentPayload) -> Result<AddedComment> {
        let comment = AddComment::try_from(payload)?;
        let scoped = || in_scope(Scope::AddComment);

        self.threads
            .verify_thread_exists(&comment.thread_id)
            .await
            .map_err(scoped())?;

        let thread_id = comment.thread_id.clone();
        let added = self
            .comments
            .add_comment(NewComment {
                id: prefixed_id(COMMENT_ID_PREFIX, &self.ids.generate()),
                owner_id: comment.owner_id,
                owner_username: comment.owner_username,
                thread_id: comment.thread_id,
                content: comment.content,
            })
            .await
            .map_err(scoped())?;

        let link_id = self
            .comments
            .link_comment_to_thread(ThreadCommentLink {
                id: prefixed_id(LINK_ID_PREFIX, &self.ids.generate()),
                thread_id: thread_id.clone(),
                comment_id: added.id.clone(),
            })
            .await
            .map_err(scoped())?;

        debug!(%link_id, "comment linked");
        info!(%thread_id, comment_id = %added.id, owner = %added.owner, "comment added");
        Ok(added)
    }

    /// Soft-deletes a comment on behalf of its owner. Deleting an already
    /// deleted comment succeeds.
    #[instrument(skip(self))]
    pub async fn delete_comment(
        &self,
        requester_id: &str,
        thread_id: &str,
        comment_id: &str,
    ) -> Result<()> {
        let scope = Scope::DeleteComment;
        for id in [requester_id, thread_id, comment_id] {
            require_id(scope, id)?;
        }

        self.threads
            .verify_thread_exists(thread_id)
            .await
            .map_err(in_scope(scope))?;
        self.comments
            .verify_comment_exists(comment_id)
            .await
            .map_err(in_scope(scope))?;

        let owner = self
            .comments
            .get_comment_owner(comment_id)
            .await
            .map_err(in_scope(scope))?;
        if owner != requester_id {
            warn!(%owner, "delete refused: requester does not own the comment");
            return Err(DomainError::rejected(scope, Reason::NotCommentOwner));
        }

        self.comments
            .soft_delete_comment(comment_id)
            .await
            .map_err(in_scope(scope))?;

        info!("comment soft-deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{
        ErrorKey, MockCommentRepository, MockIdGenerator, MockThreadRepository, RepositoryError,
    };
    use mockall::Sequence;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    fn service(
        threads: MockThreadRepository,
        comments: MockCommentRepository,
        ids: MockIdGenerator,
    ) -> CommentService {
        CommentService::new(Arc::new(threads), Arc::new(comments), Arc::new(ids))
    }

    fn fixed_ids() -> MockIdGenerator {
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().returning(|| "123".to_string());
        ids
    }

    fn payload(thread_id: &str) -> AddCommentPayload {
        AddCommentPayload {
            owner_id: Some(json!("user-123")),
            owner_username: Some(json!("dicoding")),
            thread_id: Some(json!(thread_id)),
            content: Some(json!("sebuah comment")),
        }
    }

    /// Thread and comment both exist; the comment belongs to `owner`.
    fn existing_comment(
        seq: &mut Sequence,
        owner: &'static str,
    ) -> (MockThreadRepository, MockCommentRepository) {
        let mut threads = MockThreadRepository::new();
        let mut comments = MockCommentRepository::new();
        threads
            .expect_verify_thread_exists()
            .withf(|id| id == "thread-123")
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(()));
        comments
            .expect_verify_comment_exists()
            .withf(|id| id == "comment-123")
            .times(1)
            .in_sequence(seq)
            .returning(|_| Ok(()));
        comments
            .expect_get_comment_owner()
            .withf(|id| id == "comment-123")
            .times(1)
            .in_sequence(seq)
            .returning(move |_| Ok(owner.to_string()));
        (threads, comments)
    }

    #[tokio::test]
    async fn add_comment_checks_thread_then_persists_then_links() {
        let mut seq = Sequence::new();
        let mut threads = MockThreadRepository::new();
        let mut comments = MockCommentRepository::new();

        threads
            .expect_verify_thread_exists()
            .withf(|id| id == "thread-123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        comments
            .expect_add_comment()
            .withf(|c| {
                c.id == "comment-123"
                    && c.thread_id == "thread-123"
                    && c.owner_id == "user-123"
                    && c.owner_username == "dicoding"
                    && c.content == "sebuah comment"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|c| {
                Ok(AddedComment {
                    id: c.id,
                    content: c.content,
                    owner: c.owner_id,
                })
            });
        comments
            .expect_link_comment_to_thread()
            .withf(|link| {
                link.id == "thread_comment-123"
                    && link.thread_id == "thread-123"
                    && link.comment_id == "comment-123"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|link| Ok(link.id));

        let svc = service(threads, comments, fixed_ids());
        let added = assert_ok!(svc.add_comment(payload("thread-123")).await);

        assert_eq!(
            added,
            AddedComment {
                id: "comment-123".to_string(),
                content: "sebuah comment".to_string(),
                owner: "user-123".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn add_comment_on_missing_thread_writes_nothing() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_verify_thread_exists()
            .times(1)
            .returning(|id| Err(RepositoryError::thread_not_found(id)));
        let mut comments = MockCommentRepository::new();
        comments.expect_add_comment().never();
        comments.expect_link_comment_to_thread().never();
        let mut ids = MockIdGenerator::new();
        ids.expect_generate().never();

        let svc = service(threads, comments, ids);
        let err = assert_err!(svc.add_comment(payload("missing")).await);

        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::AddComment, Reason::ThreadNotFound))
        );
    }

    #[tokio::test]
    async fn add_comment_rejects_invalid_payload_before_any_lookup() {
        let mut threads = MockThreadRepository::new();
        threads.expect_verify_thread_exists().never();

        let svc = service(threads, MockCommentRepository::new(), MockIdGenerator::new());

        let wrong = AddCommentPayload {
            content: Some(json!(12345)),
            ..payload("thread-123")
        };
        let err = assert_err!(svc.add_comment(wrong).await);
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::AddComment, Reason::WrongType))
        );
    }

    #[tokio::test]
    async fn owner_can_delete_comment() {
        let mut seq = Sequence::new();
        let (threads, mut comments) = existing_comment(&mut seq, "user-123");
        comments
            .expect_soft_delete_comment()
            .withf(|id| id == "comment-123")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|id| Ok(id.to_string()));

        let svc = service(threads, comments, MockIdGenerator::new());
        assert_ok!(
            svc.delete_comment("user-123", "thread-123", "comment-123")
                .await
        );
    }

    #[tokio::test]
    async fn non_owner_cannot_delete_comment() {
        let mut seq = Sequence::new();
        let (threads, mut comments) = existing_comment(&mut seq, "user-123");
        comments.expect_soft_delete_comment().never();

        let svc = service(threads, comments, MockIdGenerator::new());
        let err = assert_err!(
            svc.delete_comment("user-999", "thread-123", "comment-123")
                .await
        );

        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::DeleteComment, Reason::NotCommentOwner))
        );
    }

    #[tokio::test]
    async fn repeated_delete_by_owner_succeeds() {
        let mut threads = MockThreadRepository::new();
        threads.expect_verify_thread_exists().times(2).returning(|_| Ok(()));
        let mut comments = MockCommentRepository::new();
        comments.expect_verify_comment_exists().times(2).returning(|_| Ok(()));
        comments
            .expect_get_comment_owner()
            .times(2)
            .returning(|_| Ok("user-123".to_string()));
        comments
            .expect_soft_delete_comment()
            .times(2)
            .returning(|id| Ok(id.to_string()));

        let svc = service(threads, comments, MockIdGenerator::new());
        for _ in 0..2 {
            assert_ok!(
                svc.delete_comment("user-123", "thread-123", "comment-123")
                    .await
            );
        }
    }

    #[tokio::test]
    async fn delete_on_missing_thread_stops_before_comment_lookup() {
        let mut threads = MockThreadRepository::new();
        threads
            .expect_verify_thread_exists()
            .returning(|id| Err(RepositoryError::thread_not_found(id)));
        let mut comments = MockCommentRepository::new();
        comments.expect_verify_comment_exists().never();
        comments.expect_soft_delete_comment().never();

        let svc = service(threads, comments, MockIdGenerator::new());
        let err = assert_err!(
            svc.delete_comment("user-123", "thread-404", "comment-123")
                .await
        );
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::DeleteComment, Reason::ThreadNotFound))
        );
    }

    #[tokio::test]
    async fn delete_of_missing_comment_is_not_found() {
        let mut threads = MockThreadRepository::new();
        threads.expect_verify_thread_exists().returning(|_| Ok(()));
        let mut comments = MockCommentRepository::new();
        comments
            .expect_verify_comment_exists()
            .returning(|id| Err(RepositoryError::comment_not_found(id)));
        comments.expect_get_comment_owner().never();

        let svc = service(threads, comments, MockIdGenerator::new());
        let err = assert_err!(
            svc.delete_comment("user-123", "thread-123", "comment-404")
                .await
        );
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::DeleteComment, Reason::CommentNotFound))
        );
    }

    #[tokio::test]
    async fn zero_row_soft_delete_is_invariant_violation() {
        let mut seq = Sequence::new();
        let (threads, mut comments) = existing_comment(&mut seq, "user-123");
        comments.expect_soft_delete_comment().returning(|id| {
            Err(RepositoryError::NoRowsAffected {
                operation: "soft_delete_comment",
                id: id.to_string(),
            })
        });

        let svc = service(threads, comments, MockIdGenerator::new());
        let err = assert_err!(
            svc.delete_comment("user-123", "thread-123", "comment-123")
                .await
        );
        assert_eq!(
            err.key(),
            Some(ErrorKey::new(Scope::DeleteComment, Reason::NoRowsAffected))
        );
    }
}
