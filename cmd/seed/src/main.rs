//! Seeds a demo account and a couple of posts so a fresh checkout has
//! something to render. Idempotent: re-running changes nothing.

use anyhow::Context as _;
use chrono::Utc;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use auth_adapters::Argon2PasswordHasher;
use configs::AppConfig;
use domains::ports::PasswordHasher as _;

const DEMO_EMAIL: &str = "demo@rusty-feed.dev";
const DEMO_PASSWORD: &str = "demo-password";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("loading configuration")?;
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(config.database.url.expose_secret())
        .await
        .context("connecting to the database")?;
    storage_adapters::postgres::migrate(&pool)
        .await
        .context("running migrations")?;

    let password_hash = Argon2PasswordHasher
        .hash(DEMO_PASSWORD)
        .map_err(|err| anyhow::anyhow!("hashing demo password: {err}"))?;

    sqlx::query(
        "INSERT INTO users (id, email, name, password_hash, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(Uuid::now_v7())
    .bind(DEMO_EMAIL)
    .bind("Demo User")
    .bind(&password_hash)
    .bind("Seeded and ready")
    .bind(Utc::now())
    .execute(&pool)
    .await?;

    let user_id: Uuid = sqlx::query_scalar("SELECT id FROM users WHERE email = $1")
        .bind(DEMO_EMAIL)
        .fetch_one(&pool)
        .await?;

    let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE creator_id = $1")
        .bind(user_id)
        .fetch_one(&pool)
        .await?;
    if existing > 0 {
        println!("seed: demo data already present, nothing to do");
        return Ok(());
    }

    for (title, content) in [
        ("Hello from the seed", "This post was planted by cmd/seed."),
        ("Second seeded post", "Two posts make the first feed page."),
    ] {
        let now = Utc::now();
        sqlx::query(
            "INSERT INTO posts (id, title, content, image_url, creator_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(Uuid::now_v7())
        .bind(title)
        .bind(content)
        .bind("images/seed-placeholder.png")
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(&pool)
        .await?;
    }

    println!("seed: created {DEMO_EMAIL} with 2 posts (password: {DEMO_PASSWORD})");
    Ok(())
}
