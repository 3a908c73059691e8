//! # PostgreSQL adapter
//!
//! Maps the `threads`, `comments` and `threads_comments` tables onto the
//! `domains` repository ports. Creation timestamps come from the database
//! clock (`DEFAULT NOW()`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domains::{
    AddedComment, AddedThread, CommentRecord, CommentRepository, NewComment, NewThread,
    RepositoryError, ThreadCommentLink, ThreadRepository, ThreadSummary,
};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

#[derive(Clone)]
pub struct PgForumRepository {
    pool: PgPool,
}

#[derive(sqlx::FromRow)]
struct AddedThreadRow {
    id: String,
    title: String,
    owner: String,
}

#[derive(sqlx::FromRow)]
struct AddedCommentRow {
    id: String,
    content: String,
    owner: String,
}

#[derive(sqlx::FromRow)]
struct ThreadRow {
    id: String,
    title: String,
    body: String,
    date: DateTime<Utc>,
    username: String,
}

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: String,
    username: String,
    date: DateTime<Utc>,
    content: String,
    is_deleted: bool,
}

fn backend(err: sqlx::Error) -> RepositoryError {
    RepositoryError::backend(err)
}

impl PgForumRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url` and applies pending migrations.
    pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!(max_connections, "postgres pool ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ThreadRepository for PgForumRepository {
    async fn add_thread(&self, thread: NewThread) -> Result<AddedThread, RepositoryError> {
        let row: AddedThreadRow = sqlx::query_as(
            "INSERT INTO threads (id, owner, username, title, body) VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, title, owner",
        )
        .bind(&thread.id)
        .bind(&thread.owner_id)
        .bind(&thread.owner_username)
        .bind(&thread.title)
        .bind(&thread.body)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(AddedThread {
            id: row.id,
            title: row.title,
            owner: row.owner,
        })
    }

    async fn verify_thread_exists(&self, thread_id: &str) -> Result<(), RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM threads WHERE id = $1")
            .bind(thread_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .map(|_| ())
            .ok_or_else(|| RepositoryError::thread_not_found(thread_id))
    }

    async fn get_thread_by_id(&self, thread_id: &str) -> Result<ThreadSummary, RepositoryError> {
        let row: ThreadRow = sqlx::query_as(
            "SELECT id, title, body, date, username FROM threads WHERE id = $1",
        )
        .bind(thread_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?
        .ok_or_else(|| RepositoryError::thread_not_found(thread_id))?;

        Ok(ThreadSummary {
            id: row.id,
            title: row.title,
            body: row.body,
            date: row.date,
            username: row.username,
        })
    }
}

#[async_trait]
impl CommentRepository for PgForumRepository {
    async fn add_comment(&self, comment: NewComment) -> Result<AddedComment, RepositoryError> {
        let row: AddedCommentRow = sqlx::query_as(
            "INSERT INTO comments (id, thread_id, owner, username, content) \
             VALUES ($1, $2, $3, $4, $5) RETURNING id, content, owner",
        )
        .bind(&comment.id)
        .bind(&comment.thread_id)
        .bind(&comment.owner_id)
        .bind(&comment.owner_username)
        .bind(&comment.content)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)?;

        Ok(AddedComment {
            id: row.id,
            content: row.content,
            owner: row.owner,
        })
    }

    async fn link_comment_to_thread(&self, link: ThreadCommentLink) -> Result<String, RepositoryError> {
        sqlx::query_scalar(
            "INSERT INTO threads_comments (id, thread_id, comment_id) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&link.id)
        .bind(&link.thread_id)
        .bind(&link.comment_id)
        .fetch_one(&self.pool)
        .await
        .map_err(backend)
    }

    async fn get_comments_for_thread(&self, thread_id: &str) -> Result<Vec<CommentRecord>, RepositoryError> {
        let rows: Vec<CommentRow> = sqlx::query_as(
            "SELECT comments.id, comments.username, comments.date, comments.content, comments.is_deleted \
             FROM threads_comments \
             INNER JOIN comments ON threads_comments.comment_id = comments.id \
             WHERE threads_comments.thread_id = $1 \
             ORDER BY threads_comments.seq",
        )
        .bind(thread_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        Ok(rows
            .into_iter()
            .map(|row| CommentRecord {
                id: row.id,
                username: row.username,
                date: row.date,
                content: row.content,
                is_deleted: row.is_deleted,
            })
            .collect())
    }

    async fn verify_comment_exists(&self, comment_id: &str) -> Result<(), RepositoryError> {
        sqlx::query_scalar::<_, String>("SELECT id FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .map(|_| ())
            .ok_or_else(|| RepositoryError::comment_not_found(comment_id))
    }

    async fn get_comment_owner(&self, comment_id: &str) -> Result<String, RepositoryError> {
        sqlx::query_scalar("SELECT owner FROM comments WHERE id = $1")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .ok_or_else(|| RepositoryError::comment_not_found(comment_id))
    }

    async fn soft_delete_comment(&self, comment_id: &str) -> Result<String, RepositoryError> {
        sqlx::query_scalar("UPDATE comments SET is_deleted = TRUE WHERE id = $1 RETURNING id")
            .bind(comment_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?
            .ok_or_else(|| RepositoryError::NoRowsAffected {
                operation: "soft_delete_comment",
                id: comment_id.to_string(),
            })
    }
}
