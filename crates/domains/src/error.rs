//! # Errors
//!
//! Internal failure signals for the forum core. Business failures are keyed by
//! a `(Scope, Reason)` pair; the [`translator`](crate::translator) turns those
//! keys into user-facing categories. Storage backend failures carry no key and
//! travel untouched.

use std::fmt;
use thiserror::Error;

/// The operation a failure was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    AddThread,
    AddComment,
    GetThreadDetail,
    DeleteComment,
}

impl Scope {
    pub const ALL: [Scope; 4] = [
        Scope::AddThread,
        Scope::AddComment,
        Scope::GetThreadDetail,
        Scope::DeleteComment,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Scope::AddThread => "ADD_THREAD",
            Scope::AddComment => "ADD_COMMENT",
            Scope::GetThreadDetail => "GET_THREAD_DETAIL",
            Scope::DeleteComment => "DELETE_COMMENT",
        }
    }
}

/// Why an operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    MissingProperty,
    WrongType,
    ThreadNotFound,
    CommentNotFound,
    NotCommentOwner,
    NoRowsAffected,
}

impl Reason {
    pub const ALL: [Reason; 6] = [
        Reason::MissingProperty,
        Reason::WrongType,
        Reason::ThreadNotFound,
        Reason::CommentNotFound,
        Reason::NotCommentOwner,
        Reason::NoRowsAffected,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Reason::MissingProperty => "MISSING_PROPERTY",
            Reason::WrongType => "WRONG_TYPE",
            Reason::ThreadNotFound => "THREAD_NOT_FOUND",
            Reason::CommentNotFound => "COMMENT_NOT_FOUND",
            Reason::NotCommentOwner => "NOT_COMMENT_OWNER",
            Reason::NoRowsAffected => "NO_ROWS_AFFECTED",
        }
    }
}

/// Lookup key for the error translation table, e.g. `ADD_THREAD.MISSING_PROPERTY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorKey {
    pub scope: Scope,
    pub reason: Reason,
}

impl ErrorKey {
    pub const fn new(scope: Scope, reason: Reason) -> Self {
        Self { scope, reason }
    }
}

impl fmt::Display for ErrorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope.as_str(), self.reason.as_str())
    }
}

/// Payload shape violations found by the entity validators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationReason {
    /// A required field is absent or falsy.
    MissingProperty,
    /// A present field is not a string.
    WrongType,
}

impl ValidationReason {
    pub fn as_str(self) -> &'static str {
        Reason::from(self).as_str()
    }
}

impl From<ValidationReason> for Reason {
    fn from(reason: ValidationReason) -> Self {
        match reason {
            ValidationReason::MissingProperty => Reason::MissingProperty,
            ValidationReason::WrongType => Reason::WrongType,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{}.{}", .scope.as_str(), .reason.as_str())]
pub struct ValidationError {
    pub scope: Scope,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn key(&self) -> ErrorKey {
        ErrorKey::new(self.scope, self.reason.into())
    }

    pub const fn missing(scope: Scope) -> Self {
        Self {
            scope,
            reason: ValidationReason::MissingProperty,
        }
    }

    pub const fn wrong_type(scope: Scope) -> Self {
        Self {
            scope,
            reason: ValidationReason::WrongType,
        }
    }
}


/// Entities a repository can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Thread,
    Comment,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Thread => f.write_str("thread"),
            Entity::Comment => f.write_str("comment"),
        }
    }
}

/// Failures reported by repository ports.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("{entity} not found with ID {id}")]
    NotFound { entity: Entity, id: String },

    /// A mutation that must touch a row touched none.
    #[error("{operation} affected no rows for ID {id}")]
    NoRowsAffected { operation: &'static str, id: String },

    /// Infrastructure failure (connection lost, constraint violation, ...).
    #[error("storage backend failure: {0}")]
    Backend(#[source] anyhow::Error),
}

impl RepositoryError {
    pub fn thread_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: Entity::Thread,
            id: id.into(),
        }
    }

    pub fn comment_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: Entity::Comment,
            id: id.into(),
        }
    }

    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }
}

/// The error type returned by every use-case operation.
#[derive(Error, Debug)]
pub enum DomainError {
    /// A keyed business refusal; always has a translation.
    #[error("{0}")]
    Rejected(ErrorKey),

    /// Anything the core has no key for. Never translated, never swallowed.
    #[error(transparent)]
    Storage(RepositoryError),
}

impl DomainError {
    pub const fn rejected(scope: Scope, reason: Reason) -> Self {
        Self::Rejected(ErrorKey::new(scope, reason))
    }

    /// Attaches the operation scope to a repository failure.
    pub fn from_repository(scope: Scope, err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound {
                entity: Entity::Thread,
                ..
            } => Self::rejected(scope, Reason::ThreadNotFound),
            RepositoryError::NotFound {
                entity: Entity::Comment,
                ..
            } => Self::rejected(scope, Reason::CommentNotFound),
            RepositoryError::NoRowsAffected { .. } => Self::rejected(scope, Reason::NoRowsAffected),
            other @ RepositoryError::Backend(_) => Self::Storage(other),
        }
    }

    pub fn key(&self) -> Option<ErrorKey> {
        match self {
            Self::Rejected(key) => Some(*key),
            Self::Storage(_) => None,
        }
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        Self::Rejected(err.key())
    }
}

/// A specialized Result type for forum use cases.
pub type Result<T> = std::result::Result<T, DomainError>;
