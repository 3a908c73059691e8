//! # api-adapters
//!
//! HTTP surface of the forum. Handlers only translate between HTTP and the
//! `services` use cases; every business decision happens there.
//!
//! | Method | Path | Auth |
//! |---|---|---|
//! | `POST` | `/threads` | bearer |
//! | `GET` | `/threads/{thread_id}` | none |
//! | `POST` | `/threads/{thread_id}/comments` | bearer |
//! | `DELETE` | `/threads/{thread_id}/comments/{comment_id}` | bearer |

#[cfg(feature = "web-axum")]
pub mod auth;
#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;

#[cfg(feature = "web-axum")]
pub use router::{router, AppState};

#[cfg(feature = "web-axum")]
mod router {
    use std::sync::Arc;

    use axum::{
        middleware,
        routing::{delete, get, post},
        Router,
    };
    use domains::AccessTokenVerifier;
    use services::{CommentService, ThreadService};
    use tower_http::trace::TraceLayer;

    use crate::{auth, handlers};

    /// State shared by every handler.
    #[derive(Clone)]
    pub struct AppState {
        pub threads: Arc<ThreadService>,
        pub comments: Arc<CommentService>,
        pub tokens: Arc<dyn AccessTokenVerifier>,
    }

    pub fn router(state: AppState) -> Router {
        let protected = Router::new()
            .route("/threads", post(handlers::threads::post_thread))
            .route(
                "/threads/{thread_id}/comments",
                post(handlers::comments::post_comment),
            )
            .route(
                "/threads/{thread_id}/comments/{comment_id}",
                delete(handlers::comments::delete_comment),
            )
            .route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth::require_access_token,
            ));

        let public = Router::new()
            .route("/threads/{thread_id}", get(handlers::threads::get_thread_detail))
            .route("/health", get(handlers::health));

        public
            .merge(protected)
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }
}
