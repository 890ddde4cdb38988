//! PostgreSQL implementations of `UserRepo` and `PostRepo`.
//!
//! This module owns the mapping between the relational model and the
//! domain entities. The creator join and the owned-post aggregation are
//! explicit SQL; nothing is lazily loaded.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use sqlx::FromRow;
use uuid::Uuid;

use domains::error::{DomainError, Result};
use domains::models::{Author, FeedItem, FeedPage, NewUser, Post, User};
use domains::ports::{PostRepo, UserRepo};

/// Applies the schema migrations bundled with this crate.
pub async fn migrate(pool: &PgPool) -> std::result::Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Store failures are classified here, at the adapter boundary; anything
/// without a domain meaning becomes `Internal` with the driver message
/// kept out of the wire response.
fn classify(err: sqlx::Error) -> DomainError {
    tracing::error!(error = %err, "database error");
    DomainError::Internal(err.to_string())
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    status: String,
    created_at: DateTime<Utc>,
    posts: Vec<Uuid>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            name: row.name,
            password_hash: row.password_hash,
            status: row.status,
            posts: row.posts,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct PostRow {
    id: Uuid,
    title: String,
    content: String,
    image_url: String,
    creator_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_name: String,
}

impl From<PostRow> for FeedItem {
    fn from(row: PostRow) -> Self {
        FeedItem {
            author: Author {
                id: row.creator_id,
                name: row.author_name,
            },
            post: Post {
                id: row.id,
                title: row.title,
                content: row.content,
                image_url: row.image_url,
                creator_id: row.creator_id,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT u.id, u.email, u.name, u.password_hash, u.status, u.created_at,
           COALESCE(ARRAY_AGG(p.id ORDER BY p.created_at DESC, p.id DESC)
                    FILTER (WHERE p.id IS NOT NULL), '{}') AS posts
      FROM users u
      LEFT JOIN posts p ON p.creator_id = u.id
"#;

const SELECT_POST: &str = r#"
    SELECT p.id, p.title, p.content, p.image_url, p.creator_id,
           p.created_at, p.updated_at, u.name AS author_name
      FROM posts p
      JOIN users u ON u.id = p.creator_id
"#;

pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER} WHERE u.id = $1 GROUP BY u.id"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(classify)?;
        Ok(row.map(User::from))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("{SELECT_USER} WHERE u.email = $1 GROUP BY u.id"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(classify)?;
        Ok(row.map(User::from))
    }

    async fn insert(&self, user: NewUser) -> Result<User> {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(&user.status)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            // The unique index is the backstop for a racing duplicate
            // signup; surface it exactly like the pre-insert check.
            if err
                .as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                DomainError::Conflict("User exists".into())
            } else {
                classify(err)
            }
        })?;

        Ok(User {
            id: user.id,
            email: user.email,
            name: user.name,
            password_hash: user.password_hash,
            status: user.status,
            posts: Vec::new(),
            created_at: user.created_at,
        })
    }

    async fn update_status(&self, id: Uuid, status: &str) -> Result<Option<User>> {
        let result = sqlx::query("UPDATE users SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }
}

pub struct PgPostRepo {
    pool: PgPool,
}

impl PgPostRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepo for PgPostRepo {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<FeedItem>> {
        let row: Option<PostRow> = sqlx::query_as(&format!("{SELECT_POST} WHERE p.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(classify)?;
        Ok(row.map(FeedItem::from))
    }

    async fn find_page(&self, limit: i64, offset: i64) -> Result<FeedPage> {
        // The count is taken at query time; under concurrent writes two
        // successive pages may observe different totals. Accepted; no
        // snapshot isolation here.
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(classify)?;

        let rows: Vec<PostRow> = sqlx::query_as(&format!(
            "{SELECT_POST} ORDER BY p.created_at DESC, p.id DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(classify)?;

        Ok(FeedPage {
            items: rows.into_iter().map(FeedItem::from).collect(),
            total,
        })
    }

    async fn insert(&self, post: &Post) -> Result<()> {
        sqlx::query(
            "INSERT INTO posts (id, title, content, image_url, creator_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.creator_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE posts SET title = $2, content = $3, image_url = $4, updated_at = $5
             WHERE id = $1",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        // Per-row atomicity resolves concurrent deletes: exactly one
        // caller observes an affected row.
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(classify)?;
        Ok(result.rows_affected() > 0)
    }
}
