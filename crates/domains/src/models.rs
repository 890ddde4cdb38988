//! # Domain Models
//!
//! These structs represent the core entities of rusty-feed.
//! We use UUID v7 for time-ordered, globally unique identification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    /// Unique; uniqueness is enforced by the store.
    pub email: String,
    pub name: String,
    /// Argon2id PHC string. Never serialized to clients.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Free-form profile line shown on the feed.
    pub status: String,
    /// Ids of the posts this user created, newest first. Derived from
    /// post ownership by the repository, so it cannot drift from the
    /// posts table.
    pub posts: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// The fundamental unit of the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Path of the stored image, relative to the media root
    /// (e.g. "images/0192..-photo.png").
    pub image_url: String,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The creator projection attached to feed items. Populating it is an
/// explicit repository join, not lazy loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
}

/// A post together with its resolved creator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub post: Post,
    pub author: Author,
}

/// A bounded, ordered slice of the post collection.
///
/// `total` is the collection count at query time, not `items.len()`;
/// under concurrent writes successive calls may observe it change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedPage {
    pub items: Vec<FeedItem>,
    pub total: i64,
}

/// Data required to persist a new user. The repository assigns nothing;
/// ids and timestamps are chosen by the caller so inserts are pure writes.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Default profile line for fresh accounts.
    pub const DEFAULT_STATUS: &'static str = "I am new!";
}
