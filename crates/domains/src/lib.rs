//! forum-board/crates/domains/src/lib.rs
//!
//! Models, payload validators, ports and the error taxonomy shared by every
//! other crate in the workspace.

pub mod entities;
pub mod error;
pub mod models;
pub mod traits;
pub mod translator;

// Re-exporting for easier access in other crates
pub use entities::*;
pub use error::*;
pub use models::*;
pub use traits::*;
pub use translator::*;
