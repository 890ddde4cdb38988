//! # Core Traits (Ports)
//!
//! Any adapter must implement these traits to be wired into the binary.
//! All fallible operations return [`crate::error::Result`]; adapters
//! classify their own failures (an unclassified store failure becomes
//! `DomainError::Internal` at the adapter boundary, never a panic).

use async_trait::async_trait;
use bytes::Bytes;
use mime::Mime;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::Result;
use crate::events::PostEvent;
use crate::models::{FeedItem, FeedPage, NewUser, Post, User};

/// Persistence contract for user accounts.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    /// Inserts and returns the stored user. A racing duplicate email
    /// surfaces as `DomainError::Conflict` (unique index backstop).
    async fn insert(&self, user: NewUser) -> Result<User>;
    /// Returns the updated user, or `None` if the id is gone.
    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>>;
}

/// Persistence contract for posts. The creator join is explicit
/// repository work, not lazy loading.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepo: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedItem>>;
    /// One window of the feed, ordered `created_at DESC, id DESC`, plus
    /// the collection count at query time.
    async fn find_page(&self, limit: i64, offset: i64) -> Result<FeedPage>;
    async fn insert(&self, post: &Post) -> Result<()>;
    /// `false` means the row vanished between fetch and write.
    async fn update(&self, post: &Post) -> Result<bool>;
    /// `false` means the row was already gone, a normal outcome under
    /// concurrent deletes, not an error.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Media storage contract for uploaded images.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Persists the bytes and returns the stored path for the post's
    /// `image_url` field.
    async fn store(&self, original_name: &str, content_type: &Mime, data: Bytes) -> Result<String>;
    /// Best-effort removal; a missing file is logged, not an error.
    async fn remove(&self, path: &str);
}

/// Password hashing contract. Synchronous on purpose: hashing is
/// CPU-bound and never suspends.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String>;
    fn verify(&self, password: &str, phc: &str) -> bool;
}

/// Identity token contract. `verify` is pure: no side effect on any
/// store, and every failure mode (malformed, bad signature, expired)
/// collapses to `AuthContext::Anonymous` so callers cannot distinguish
/// them.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TokenService: Send + Sync {
    fn issue(&self, subject: Uuid, email: &str) -> Result<String>;
    fn verify(&self, token: &str) -> AuthContext;
}

/// Fan-out contract for post-change events. `emit` is called only after
/// the corresponding mutation durably committed. No connected viewers is
/// a no-op.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PostEventSink: Send + Sync {
    fn emit(&self, event: PostEvent);
}
