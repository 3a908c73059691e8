//! # Error Translator
//!
//! Maps keyed domain failures onto the three categories a client can see.
//! The table is a total match: adding a [`Scope`] or [`Reason`] without a
//! mapping fails to compile.

use thiserror::Error;

use crate::error::{DomainError, ErrorKey, Reason, RepositoryError, Scope};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Payload shape or type violations (400).
    Invariant,
    /// The referenced thread or comment does not exist (404).
    NotFound,
    /// The requester does not own the comment (403).
    Authorization,
}

impl ErrorCategory {
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorCategory::Invariant => 400,
            ErrorCategory::NotFound => 404,
            ErrorCategory::Authorization => 403,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            ErrorCategory::Invariant => "InvariantError",
            ErrorCategory::NotFound => "NotFoundError",
            ErrorCategory::Authorization => "AuthorizationError",
        }
    }
}

/// A failure in the form it is shown to clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {}", .category.name(), .message)]
pub struct ClientError {
    pub category: ErrorCategory,
    pub message: &'static str,
}

/// Outcome of translating a [`DomainError`].
#[derive(Debug)]
pub enum Translation {
    Mapped(ClientError),
    /// No key, so no table entry; the original error is handed back as-is.
    Unmapped(RepositoryError),
}

pub fn translate(error: DomainError) -> Translation {
    match error {
        DomainError::Rejected(key) => Translation::Mapped(client_error(key)),
        DomainError::Storage(err) => Translation::Unmapped(err),
    }
}

pub fn category(key: ErrorKey) -> ErrorCategory {
    match key.reason {
        Reason::MissingProperty | Reason::WrongType | Reason::NoRowsAffected => {
            ErrorCategory::Invariant
        }
        Reason::ThreadNotFound | Reason::CommentNotFound => ErrorCategory::NotFound,
        Reason::NotCommentOwner => ErrorCategory::Authorization,
    }
}

pub fn client_error(key: ErrorKey) -> ClientError {
    ClientError {
        category: category(key),
        message: message(key),
    }
}

fn message(key: ErrorKey) -> &'static str {
    use Reason::*;
    use Scope::*;

    match (key.scope, key.reason) {
        (AddThread, MissingProperty) => {
            "tidak dapat membuat thread baru karena properti yang dibutuhkan tidak ada"
        }
        (AddThread, WrongType) => "tidak dapat membuat thread baru karena tipe data tidak sesuai",
        (AddComment, MissingProperty) => {
            "tidak dapat menambahkan komentar karena properti yang dibutuhkan tidak ada"
        }
        (AddComment, WrongType) => "tidak dapat menambahkan komentar karena tipe data tidak sesuai",
        (GetThreadDetail, MissingProperty) => {
            "tidak dapat menampilkan thread karena id thread tidak ada"
        }
        (DeleteComment, MissingProperty) => {
            "tidak dapat menghapus komentar karena properti yang dibutuhkan tidak ada"
        }
        (GetThreadDetail | DeleteComment, WrongType) => "id harus berupa string",
        (_, ThreadNotFound) => "thread tidak ditemukan",
        (_, CommentNotFound) => "komentar tidak ditemukan",
        (_, NotCommentOwner) => "anda tidak berhak menghapus komentar ini",
        (_, NoRowsAffected) => "gagal memperbarui data karena tidak ada baris yang berubah",
    }
}
