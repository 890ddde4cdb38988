//! In-memory implementations of the persistence and media ports.
//!
//! These back the integration tests and any deployment that runs
//! without Postgres; the semantics mirror the SQL adapters, including
//! email uniqueness and the feed ordering contract.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use mime::Mime;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{Author, FeedItem, FeedPage, NewUser, Post, User};
use domains::ports::{MediaStore, PostRepo, UserRepo};

/// One store implementing both repositories, so ownership derivation
/// works without cross-adapter wiring. Clone-free sharing via `Arc`.
#[derive(Default)]
pub struct MemStore {
    users: DashMap<Uuid, User>,
    posts: DashMap<Uuid, Post>,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Ids of a user's posts, newest first, matching the ordering the SQL
    /// aggregation produces.
    fn owned_posts(&self, user_id: Uuid) -> Vec<Uuid> {
        let mut owned: Vec<(chrono::DateTime<chrono::Utc>, Uuid)> = self
            .posts
            .iter()
            .filter(|entry| entry.creator_id == user_id)
            .map(|entry| (entry.created_at, entry.id))
            .collect();
        owned.sort_by(|a, b| b.cmp(a));
        owned.into_iter().map(|(_, id)| id).collect()
    }

    fn with_owned(&self, mut user: User) -> User {
        user.posts = self.owned_posts(user.id);
        user
    }

    fn author(&self, creator_id: Uuid) -> Result<Author> {
        let user = self
            .users
            .get(&creator_id)
            .ok_or_else(|| DomainError::Internal(format!("creator {creator_id} missing")))?;
        Ok(Author {
            id: creator_id,
            name: user.name.clone(),
        })
    }
}

#[async_trait]
impl UserRepo for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self
            .users
            .get(&id)
            .map(|entry| self.with_owned(entry.value().clone())))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|entry| entry.email == email)
            .map(|entry| self.with_owned(entry.value().clone())))
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        if self.users.iter().any(|entry| entry.email == user.email) {
            return Err(DomainError::Conflict("User exists".into()));
        }
        let stored = User {
            id: user.id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            status: user.status,
            posts: Vec::new(),
            created_at: user.created_at,
        };
        self.users.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let Some(mut entry) = self.users.get_mut(&id) else {
            return Ok(None);
        };
        entry.status = status.to_owned();
        let updated = entry.clone();
        drop(entry);
        Ok(Some(self.with_owned(updated)))
    }
}

#[async_trait]
impl PostRepo for MemStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedItem>> {
        let Some(post) = self.posts.get(&id).map(|entry| entry.value().clone()) else {
            return Ok(None);
        };
        let author = self.author(post.creator_id)?;
        Ok(Some(FeedItem { post, author }))
    }

    async fn find_page(&self, limit: i64, offset: i64) -> Result<FeedPage> {
        let mut all: Vec<Post> = self.posts.iter().map(|entry| entry.value().clone()).collect();
        // created_at DESC, id DESC: the contract shared with Postgres.
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        let total = all.len() as i64;

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(0);
        let items = all
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| {
                let author = self.author(post.creator_id)?;
                Ok(FeedItem { post, author })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(FeedPage { items, total })
    }

    async fn insert(&self, post: &Post) -> Result<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<bool> {
        let Some(mut entry) = self.posts.get_mut(&post.id) else {
            return Ok(false);
        };
        *entry = post.clone();
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.posts.remove(&id).is_some())
    }
}

/// Media store that keeps uploads in memory and records removals, so
/// tests can assert the delete cascade without touching a filesystem.
#[derive(Default)]
pub struct MemMediaStore {
    files: DashMap<String, Bytes>,
    removed: DashMap<String, ()>,
}

impl MemMediaStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn was_removed(&self, path: &str) -> bool {
        self.removed.contains_key(path)
    }
}

#[async_trait]
impl MediaStore for MemMediaStore {
    async fn store(&self, original_name: &str, _content_type: &Mime, data: Bytes) -> Result<String> {
        let path = format!("images/{}-{}", Uuid::now_v7(), original_name);
        self.files.insert(path.clone(), data);
        Ok(path)
    }

    async fn remove(&self, path: &str) {
        self.files.remove(path);
        self.removed.insert(path.to_owned(), ());
    }
}
