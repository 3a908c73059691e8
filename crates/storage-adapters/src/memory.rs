//! In-memory implementation of the thread and comment repositories.
//!
//! Each table is a `DashMap`, so concurrent requests lock per shard rather
//! than per store. Comments are returned in the order they were linked.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::{mapref::entry::Entry, DashMap};
use domains::{
    AddedComment, AddedThread, Comment, CommentRecord, CommentRepository, CommentState, NewComment,
    NewThread, RepositoryError, Thread, ThreadCommentLink, ThreadRepository, ThreadSummary,
};
use tracing::debug;

#[derive(Default)]
struct Tables {
    threads: DashMap<String, Thread>,
    comments: DashMap<String, Comment>,
    links: DashMap<String, ThreadCommentLink>,
    /// thread id -> comment ids, in link order
    thread_comments: DashMap<String, Vec<String>>,
    /// comment id -> link id; a comment has at most one link
    comment_links: DashMap<String, String>,
}

/// A process-local forum store. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct InMemoryForumStore {
    tables: Arc<Tables>,
}

impl InMemoryForumStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a thread together with its comments and links.
    pub fn remove_thread(&self, thread_id: &str) -> bool {
        let Some((_, _thread)) = self.tables.threads.remove(thread_id) else {
            return false;
        };
        let comment_ids = self
            .tables
            .thread_comments
            .remove(thread_id)
            .map(|(_, ids)| ids)
            .unwrap_or_default();
        for comment_id in &comment_ids {
            self.tables.comments.remove(comment_id);
            self.tables.comment_links.remove(comment_id);
        }
        self.tables
            .links
            .retain(|_, link| link.thread_id != thread_id);
        debug!(thread_id, removed_comments = comment_ids.len(), "thread removed");
        true
    }

    pub fn comment(&self, comment_id: &str) -> Option<Comment> {
        self.tables.comments.get(comment_id).map(|c| c.clone())
    }

    pub fn comment_count(&self) -> usize {
        self.tables.comments.len()
    }

    pub fn link_count(&self) -> usize {
        self.tables.links.len()
    }
}

#[async_trait]
impl ThreadRepository for InMemoryForumStore {
    async fn add_thread(&self, thread: NewThread) -> Result<AddedThread, RepositoryError> {
        let added = AddedThread {
            id: thread.id.clone(),
            title: thread.title.clone(),
            owner: thread.owner_id.clone(),
        };
        self.tables.threads.insert(
            thread.id.clone(),
            Thread {
                id: thread.id,
                owner_id: thread.owner_id,
                owner_username: thread.owner_username,
                title: thread.title,
                body: thread.body,
                created_at: Utc::now(),
            },
        );
        Ok(added)
    }

    async fn verify_thread_exists(&self, thread_id: &str) -> Result<(), RepositoryError> {
        if self.tables.threads.contains_key(thread_id) {
            Ok(())
        } else {
            Err(RepositoryError::thread_not_found(thread_id))
        }
    }

    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadSummary, RepositoryError> {
        let thread = self
            .tables
            .threads
            .get(thread_id)
            .ok_or_else(|| RepositoryError::thread_not_found(thread_id))?;
        Ok(ThreadSummary {
            id: thread.id.clone(),
            title: thread.title.clone(),
            body: thread.body.clone(),
            date: thread.created_at,
            username: thread.owner_username.clone(),
        })
    }
}

#[async_trait]
impl CommentRepository for InMemoryForumStore {
    async fn add_comment(&self, comment: NewComment) -> Result<AddedComment, RepositoryError> {
        let added = AddedComment {
            id: comment.id.clone(),
            content: comment.content.clone(),
            owner: comment.owner_id.clone(),
        };
        self.tables.comments.insert(
            comment.id.clone(),
            Comment {
                id: comment.id,
                owner_id: comment.owner_id,
                owner_username: comment.owner_username,
                thread_id: comment.thread_id,
                content: comment.content,
                created_at: Utc::now(),
                state: CommentState::Active,
            },
        );
        Ok(added)
    }

    async fn link_comment_to_thread(&self, link: ThreadCommentLink) -> Result<String, RepositoryError> {
        match self.tables.comment_links.entry(link.comment_id.clone()) {
            Entry::Occupied(existing) => {
                return Err(RepositoryError::backend(anyhow::anyhow!(
                    "comment {} is already linked by {}",
                    link.comment_id,
                    existing.get()
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(link.id.clone());
            }
        }
        self.tables
            .thread_comments
            .entry(link.thread_id.clone())
            .or_default()
            .push(link.comment_id.clone());

        let id = link.id.clone();
        self.tables.links.insert(link.id.clone(), link);
        Ok(id)
    }

    async fn get_comments_for_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>, RepositoryError> {
        let ids = self
            .tables
            .thread_comments
            .get(thread_id)
            .map(|ids| ids.clone())
            .unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| self.tables.comments.get(id))
            .map(|comment| CommentRecord::from(&*comment))
            .collect())
    }

    async fn verify_comment_exists(&self, comment_id: &str) -> Result<(), RepositoryError> {
        if self.tables.comments.contains_key(comment_id) {
            Ok(())
        } else {
            Err(RepositoryError::comment_not_found(comment_id))
        }
    }

    async fn get_comment_owner(&self, comment_id: &str) -> Result<String, RepositoryError> {
        self.tables
            .comments
            .get(comment_id)
            .map(|comment| comment.owner_id.clone())
            .ok_or_else(|| RepositoryError::comment_not_found(comment_id))
    }

    async fn soft_delete_comment(&self, comment_id: &str) -> Result<String, RepositoryError> {
        match self.tables.comments.get_mut(comment_id) {
            Some(mut comment) => {
                comment.soft_delete();
                Ok(comment.id.clone())
            }
            None => Err(RepositoryError::NoRowsAffected {
                operation: "soft_delete_comment",
                id: comment_id.to_string(),
            }),
        }
    }
}
