//! # Domain Models
//!
//! Threads, comments and the link records that attach one to the other.
//! Identifiers are opaque strings carrying an entity prefix (`thread-`,
//! `comment-`, `thread_comment-`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Text shown in place of a soft-deleted comment's content.
pub const DELETED_COMMENT_PLACEHOLDER: &str = "**komentar telah dihapus**";

pub const THREAD_ID_PREFIX: &str = "thread";
pub const COMMENT_ID_PREFIX: &str = "comment";
pub const LINK_ID_PREFIX: &str = "thread_comment";

/// A top-level discussion post. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub title: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle of a comment. The only transition is `Active -> Deleted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentState {
    #[default]
    Active,
    Deleted,
}

/// A reply attached to a thread through a [`ThreadCommentLink`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub thread_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub state: CommentState,
}

impl Comment {
    /// Marks the comment deleted. Content is kept; a deleted comment stays
    /// deleted no matter how often this is called.
    pub fn soft_delete(&mut self) {
        self.state = CommentState::Deleted;
    }

    pub fn is_deleted(&self) -> bool {
        self.state == CommentState::Deleted
    }
}

/// Explicit association between a comment and its owning thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadCommentLink {
    pub id: String,
    pub thread_id: String,
    pub comment_id: String,
}

/// Insert command for a thread; the storage layer stamps the creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewThread {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub title: String,
    pub body: String,
}

/// Insert command for a comment; the storage layer stamps the creation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub id: String,
    pub owner_id: String,
    pub owner_username: String,
    pub thread_id: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedThread {
    pub id: String,
    pub title: String,
    pub owner: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedComment {
    pub id: String,
    pub content: String,
    pub owner: String,
}

/// Read view of a thread, without its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadSummary {
    pub id: String,
    pub title: String,
    pub body: String,
    pub date: DateTime<Utc>,
    pub username: String,
}

/// A comment row as storage returns it, tombstone flag included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRecord {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
    pub is_deleted: bool,
}

/// A comment as the read path exposes it. Deleted comments are redacted and
/// the deletion flag never leaves the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: String,
    pub username: String,
    pub date: DateTime<Utc>,
    pub content: String,
}

impl From<CommentRecord> for CommentView {
    fn from(record: CommentRecord) -> Self {
        let content = if record.is_deleted {
            DELETED_COMMENT_PLACEHOLDER.to_string()
        } else {
            record.content
        };
        Self {
            id: record.id,
            username: record.username,
            date: record.date,
            content,
        }
    }
}

impl From<&Comment> for CommentRecord {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.id.clone(),
            username: comment.owner_username.clone(),
            date: comment.created_at,
            content: comment.content.clone(),
            is_deleted: comment.is_deleted(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDetail {
    pub thread: ThreadSummary,
    pub comments: Vec<CommentView>,
}

/// Identity of an authenticated requester, as carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub id: String,
    pub username: String,
}

/// Joins an entity prefix and a generated suffix into an identifier.
pub fn prefixed_id(prefix: &str, suffix: &str) -> String {
    format!("{prefix}-{suffix}")
}
