#![cfg(feature = "web-axum")]

//! Shared harness: the full router over the in-memory store, with a fixed
//! token table standing in for JWT verification.

use std::{collections::HashMap, sync::Arc};

use api_adapters::{router, AppState};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use domains::{AccessTokenVerifier, Credentials, TokenError};
use serde_json::{json, Value};
use services::{CommentService, ThreadService};
use storage_adapters::{InMemoryForumStore, UuidIdGenerator};
use tower::ServiceExt;

pub const DICODING_TOKEN: &str = "token-dicoding";
pub const JOHNDOE_TOKEN: &str = "token-johndoe";
pub const EXPIRED_TOKEN: &str = "token-expired";

/// Accepts only the tokens it was built with.
pub struct StaticTokens {
    known: HashMap<&'static str, Credentials>,
}

impl StaticTokens {
    pub fn standard() -> Self {
        let mut known = HashMap::new();
        known.insert(
            DICODING_TOKEN,
            Credentials {
                id: "user-123".into(),
                username: "dicoding".into(),
            },
        );
        known.insert(
            JOHNDOE_TOKEN,
            Credentials {
                id: "user-456".into(),
                username: "johndoe".into(),
            },
        );
        Self { known }
    }
}

impl AccessTokenVerifier for StaticTokens {
    fn verify(&self, token: &str) -> Result<Credentials, TokenError> {
        if token == EXPIRED_TOKEN {
            return Err(TokenError::Expired);
        }
        self.known.get(token).cloned().ok_or(TokenError::Invalid)
    }
}

pub struct TestApp {
    router: Router,
    pub store: InMemoryForumStore,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryForumStore::new();
        let ids = Arc::new(UuidIdGenerator);
        let threads = Arc::new(store.clone());
        let comments = Arc::new(store.clone());
        let state = AppState {
            threads: Arc::new(ThreadService::new(
                threads.clone(),
                comments.clone(),
                ids.clone(),
            )),
            comments: Arc::new(CommentService::new(threads, comments, ids)),
            tokens: Arc::new(StaticTokens::standard()),
        };
        Self {
            router: router(state),
            store,
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Sends one request and returns the status with the decoded JSON body
    /// (`Value::Null` when the body is empty).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<String>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn post_json(&self, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(token), Some(body.to_string()))
            .await
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Creates a thread and returns its id.
    pub async fn create_thread(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .post_json(
                "/threads",
                token,
                json!({ "title": title, "body": "sebuah body thread" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["addedThread"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }

    /// Creates a comment and returns its id.
    pub async fn create_comment(&self, token: &str, thread_id: &str, content: &str) -> String {
        let (status, body) = self
            .post_json(
                &format!("/threads/{thread_id}/comments"),
                token,
                json!({ "content": content }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["data"]["addedComment"]["id"]
            .as_str()
            .unwrap()
            .to_string()
    }
}
