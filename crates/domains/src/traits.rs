//! # Core Traits (Ports)
//!
//! Storage, identity and token-verification contracts the use cases depend
//! on. Adapters in `storage-adapters` and `auth-adapters` implement them.

use async_trait::async_trait;

use crate::error::RepositoryError;
use crate::models::{
    AddedComment, AddedThread, CommentRecord, Credentials, NewComment, NewThread, ThreadCommentLink,
    ThreadSummary,
};

/// Persistence contract for threads.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait ThreadRepository: Send + Sync {
    async fn add_thread(&self, thread: NewThread) -> Result<AddedThread, RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when the thread is absent.
    async fn verify_thread_exists(&self, thread_id: &str) -> Result<(), RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when the thread is absent.
    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadSummary, RepositoryError>;
}

/// Persistence contract for comments and their thread links.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn add_comment(&self, comment: NewComment) -> Result<AddedComment, RepositoryError>;

    /// Records which thread a comment belongs to and returns the link id.
    async fn link_comment_to_thread(&self, link: ThreadCommentLink) -> Result<String, RepositoryError>;

    /// Every comment linked to the thread, in no particular order. Empty when
    /// the thread has none.
    async fn get_comments_for_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>, RepositoryError>;

    /// Fails with [`RepositoryError::NotFound`] when the comment is absent.
    async fn verify_comment_exists(&self, comment_id: &str) -> Result<(), RepositoryError>;

    async fn get_comment_owner(&self, comment_id: &str) -> Result<String, RepositoryError>;

    /// Flags the comment deleted and returns its id. Repeating the call on a
    /// deleted comment succeeds; touching no row is
    /// [`RepositoryError::NoRowsAffected`].
    async fn soft_delete_comment(&self, comment_id: &str) -> Result<String, RepositoryError>;
}

/// Source of the random part of new identifiers.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Turns a bearer token into the requester's identity.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait AccessTokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Credentials, TokenError>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("access token is malformed or its signature is invalid")]
    Invalid,
    #[error("access token has expired")]
    Expired,
}
