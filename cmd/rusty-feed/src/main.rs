//! # rusty-feed binary
//!
//! Assembles the application from the adapter crates selected at
//! compile time and serves the HTTP surface. Assembly order matters:
//! the realtime hub is initialized before any route can run, so a
//! mutation can never find the transport missing.

use std::sync::Arc;

use anyhow::Context as _;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api_adapters::{realtime, ApiState};
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use configs::AppConfig;
use services::{AuthService, PostService};
use storage_adapters::{LocalMediaStore, PgPostRepo, PgUserRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "rusty_feed=debug,info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    // 1. Database
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(config.database.url.expose_secret())
        .await
        .context("connecting to the database")?;
    storage_adapters::postgres::migrate(&pool)
        .await
        .context("running migrations")?;
    let users = Arc::new(PgUserRepo::new(pool.clone()));
    let posts_repo = Arc::new(PgPostRepo::new(pool));

    // 2. Media storage
    let media = Arc::new(LocalMediaStore::new(
        &config.media.root,
        config.media.public_prefix.clone(),
    ));

    // 3. Credentials
    let tokens = Arc::new(JwtTokenService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));
    let passwords = Arc::new(Argon2PasswordHasher);

    // 4. Realtime transport, before the services that emit into it.
    let hub = realtime::init();

    // 5. Services and the HTTP surface
    let auth = Arc::new(AuthService::new(users.clone(), passwords, tokens.clone()));
    let posts = Arc::new(PostService::new(
        posts_repo,
        users,
        media.clone(),
        hub,
        config.feed.per_page,
    ));
    let state = ApiState::new(
        auth,
        posts,
        tokens,
        media,
        config.media.allowed_mime_types.clone(),
    );
    let app = api_adapters::router(state, &config.media.root, &config.server.client_origin);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("binding {address}"))?;
    tracing::info!(%address, "rusty-feed listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving")?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
