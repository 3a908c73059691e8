//! # storage-adapters
//!
//! Implementations of the `domains` persistence ports.
//!
//! - [`memory::InMemoryForumStore`]: always compiled; used by tests and local runs.
//! - [`postgres::PgForumRepository`]: feature `db-postgres`.

pub mod id;
pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use id::UuidIdGenerator;
pub use memory::InMemoryForumStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgForumRepository;
