//! Post CRUD and the feed window. Every mutation runs the authorization
//! guard first, writes through the repository, and only then hands the
//! change to the event sink: a viewer must never receive an event for a
//! post it cannot yet fetch.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use domains::auth::AuthContext;
use domains::error::{DomainError, FieldError, Result};
use domains::events::PostEvent;
use domains::models::{Author, FeedItem, FeedPage, Post};
use domains::ports::{MediaStore, PostEventSink, PostRepo, UserRepo};

use crate::feed::PageParams;
use crate::validate;

/// Input for `create`. The image is uploaded beforehand through the
/// media endpoint and referenced here by its stored path.
#[derive(Debug, Clone, Deserialize)]
pub struct PostInput {
    pub title: String,
    pub content: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
}

/// Input for `update`. `image_url: None` means "no image change
/// requested": an explicit absence, never a sentinel string.
#[derive(Debug, Clone, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

pub struct PostService {
    posts: Arc<dyn PostRepo>,
    users: Arc<dyn UserRepo>,
    media: Arc<dyn MediaStore>,
    events: Arc<dyn PostEventSink>,
    per_page: u32,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepo>,
        users: Arc<dyn UserRepo>,
        media: Arc<dyn MediaStore>,
        events: Arc<dyn PostEventSink>,
        per_page: u32,
    ) -> Self {
        Self {
            posts,
            users,
            media,
            events,
            per_page,
        }
    }

    fn validate_text(title: &str, content: &str) -> Result<()> {
        let mut errors = Vec::new();
        validate::check_title(title, &mut errors);
        validate::check_content(content, &mut errors);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::validation("Invalid input", errors))
        }
    }

    pub async fn create(&self, ctx: &AuthContext, input: PostInput) -> Result<FeedItem> {
        let subject = ctx.require()?;
        Self::validate_text(&input.title, &input.content)?;
        if input.image_url.trim().is_empty() {
            return Err(DomainError::validation(
                "Invalid input",
                vec![FieldError::new("imageUrl", "No image attached")],
            ));
        }

        // The subject comes from a verified token, but the account may
        // have been deleted since issuance.
        let creator = self
            .users
            .find_by_id(subject)
            .await?
            .ok_or_else(|| DomainError::NotAuthorized("unknown creator".into()))?;

        let now = Utc::now();
        let post = Post {
            id: Uuid::now_v7(),
            title: input.title,
            content: input.content,
            image_url: input.image_url,
            creator_id: creator.id,
            created_at: now,
            updated_at: now,
        };
        self.posts.insert(&post).await?;

        let item = FeedItem {
            post,
            author: Author {
                id: creator.id,
                name: creator.name,
            },
        };
        self.events.emit(PostEvent::Created {
            post: item.post.clone(),
            author: item.author.clone(),
        });
        tracing::info!(post = %item.post.id, "post created");
        Ok(item)
    }

    /// One feed window. `page` defaults to 1; the page size comes from
    /// configuration.
    pub async fn page(&self, ctx: &AuthContext, page: Option<u32>) -> Result<FeedPage> {
        ctx.require()?;
        let params = PageParams::new(page.unwrap_or(1), self.per_page)?;
        self.posts.find_page(params.limit(), params.offset()).await
    }

    pub async fn single(&self, ctx: &AuthContext, id: Uuid) -> Result<FeedItem> {
        ctx.require()?;
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("post"))
    }

    pub async fn update(&self, ctx: &AuthContext, id: Uuid, input: PostUpdate) -> Result<FeedItem> {
        let subject = ctx.require()?;
        let FeedItem { mut post, author } = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("post"))?;
        if post.creator_id != subject {
            return Err(DomainError::NotAuthorized(
                "only the creator may edit a post".into(),
            ));
        }
        Self::validate_text(&input.title, &input.content)?;

        post.title = input.title;
        post.content = input.content;
        if let Some(image_url) = input.image_url {
            if image_url != post.image_url {
                self.media.remove(&post.image_url).await;
            }
            post.image_url = image_url;
        }
        post.updated_at = Utc::now();

        if !self.posts.update(&post).await? {
            // Deleted underneath us between fetch and write.
            return Err(DomainError::NotFound("post"));
        }
        let item = FeedItem { post, author };
        self.events.emit(PostEvent::Updated {
            post: item.post.clone(),
            author: item.author.clone(),
        });
        Ok(item)
    }

    pub async fn delete(&self, ctx: &AuthContext, id: Uuid) -> Result<()> {
        let subject = ctx.require()?;
        let FeedItem { post, .. } = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound("post"))?;
        if post.creator_id != subject {
            return Err(DomainError::NotAuthorized(
                "only the creator may delete a post".into(),
            ));
        }

        self.media.remove(&post.image_url).await;
        if !self.posts.delete(id).await? {
            // A concurrent delete won the race; the store already
            // resolved it. Normal not-found, not a crash.
            return Err(DomainError::NotFound("post"));
        }
        self.events.emit(PostEvent::Deleted { id });
        tracing::info!(post = %id, "post deleted");
        Ok(())
    }
}
