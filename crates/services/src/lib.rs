//! # services
//!
//! Use cases for the forum. Each operation validates its input, runs the
//! existence and ownership checks in order, and only then touches storage.
//! The first failing step ends the operation.

mod comment_service;
mod thread_service;

pub use comment_service::CommentService;
pub use thread_service::ThreadService;

use domains::{DomainError, RepositoryError, Scope};

fn in_scope(scope: Scope) -> impl FnOnce(RepositoryError) -> DomainError {
    move |err| DomainError::from_repository(scope, err)
}
