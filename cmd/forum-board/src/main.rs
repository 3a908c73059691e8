//! # Forum Board Binary
//!
//! Assembles the server from settings and compile-time features.

use std::sync::Arc;

use anyhow::Context;
use api_adapters::{router, AppState};
use auth_adapters::JwtAccessTokenVerifier;
use configs::{LogFormat, Settings, StorageBackend};
use domains::{CommentRepository, ThreadRepository};
use services::{CommentService, ThreadService};
use storage_adapters::{InMemoryForumStore, UuidIdGenerator};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

type Repositories = (Arc<dyn ThreadRepository>, Arc<dyn CommentRepository>);

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log.filter));
    let registry = tracing_subscriber::registry().with(filter);
    match settings.log.format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn repositories(settings: &Settings) -> anyhow::Result<Repositories> {
    match settings.storage.backend {
        StorageBackend::Memory => {
            let store = InMemoryForumStore::new();
            let threads: Arc<dyn ThreadRepository> = Arc::new(store.clone());
            let comments: Arc<dyn CommentRepository> = Arc::new(store);
            Ok((threads, comments))
        }
        #[cfg(feature = "db-postgres")]
        StorageBackend::Postgres => {
            use secrecy::ExposeSecret;

            let url = settings
                .database
                .url
                .as_ref()
                .context("database.url is required for the postgres backend")?;
            let repo = storage_adapters::PgForumRepository::connect(
                url.expose_secret(),
                settings.database.max_connections,
            )
            .await?;
            let threads: Arc<dyn ThreadRepository> = Arc::new(repo.clone());
            let comments: Arc<dyn CommentRepository> = Arc::new(repo);
            Ok((threads, comments))
        }
        #[cfg(not(feature = "db-postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("built without the `db-postgres` feature")
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings);

    let (threads, comments) = repositories(&settings).await?;
    let ids = Arc::new(UuidIdGenerator);

    let tokens = JwtAccessTokenVerifier::new(
        settings.access_token_key()?,
        settings.auth.access_token_age_secs,
    );

    let state = AppState {
        threads: Arc::new(ThreadService::new(
            threads.clone(),
            comments.clone(),
            ids.clone(),
        )),
        comments: Arc::new(CommentService::new(threads, comments, ids)),
        tokens: Arc::new(tokens),
    };

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, backend = ?settings.storage.backend, "forum-board listening");

    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::{NewComment, NewThread, ThreadCommentLink};

    #[tokio::test]
    async fn memory_backend_shares_one_store() {
        let settings = Settings::from_toml("[storage]\nbackend = \"memory\"").unwrap();
        let (threads, comments) = repositories(&settings).await.unwrap();

        threads
            .add_thread(NewThread {
                id: "thread-1".into(),
                owner_id: "user-1".into(),
                owner_username: "dicoding".into(),
                title: "judul".into(),
                body: "isi".into(),
            })
            .await
            .unwrap();
        comments
            .add_comment(NewComment {
                id: "comment-1".into(),
                owner_id: "user-1".into(),
                owner_username: "dicoding".into(),
                thread_id: "thread-1".into(),
                content: "halo".into(),
            })
            .await
            .unwrap();
        comments
            .link_comment_to_thread(ThreadCommentLink {
                id: "thread_comment-1".into(),
                thread_id: "thread-1".into(),
                comment_id: "comment-1".into(),
            })
            .await
            .unwrap();

        assert!(threads.verify_thread_exists("thread-1").await.is_ok());
        assert_eq!(comments.get_comments_for_thread("thread-1").await.unwrap().len(), 1);
    }
}
