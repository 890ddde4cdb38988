//! # storage-adapters
//!
//! Implementations of the `domains` persistence and media ports:
//! PostgreSQL repositories (feature `db-postgres`), a local-filesystem
//! media store (feature `media-local`), and always-available in-memory
//! repositories backing tests and database-free deployments.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

#[cfg(feature = "media-local")]
pub mod media_local;

pub use memory::{MemMediaStore, MemStore};

#[cfg(feature = "db-postgres")]
pub use postgres::{PgPostRepo, PgUserRepo};

#[cfg(feature = "media-local")]
pub use media_local::LocalMediaStore;
