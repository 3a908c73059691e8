//! # auth-adapters
//!
//! Access-token verification behind the `domains::AccessTokenVerifier` port.
//! Token issuance lives with the account service; this crate only checks
//! tokens it is handed.

#[cfg(feature = "auth-jwt")]
pub mod jwt;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtAccessTokenVerifier;
