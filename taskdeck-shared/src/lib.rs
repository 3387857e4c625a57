//! # TaskDeck Shared Library
//!
//! This crate contains the types and business logic shared by the TaskDeck
//! API server: the authentication/authorization subsystem, the database
//! models, and the connection-pool utilities.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, token codec, principal resolution, and
//!   authorization predicates
//! - `models`: Database models and their CRUD operations
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskDeck shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
