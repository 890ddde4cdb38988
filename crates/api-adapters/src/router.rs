//! Route table and layer stack. The identity middleware wraps every
//! route; CORS and request tracing wrap the whole surface.

use std::path::Path;

use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post, put};
use axum::{middleware as axum_middleware, Router};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::ApiState;
use crate::{middleware, realtime, rest, upload};

/// Assembles the full surface. `media_root` is the directory the static
/// images route serves; `client_origin` is the SPA origin for CORS
/// (`"*"` opens the surface up).
pub fn router(state: ApiState, media_root: &Path, client_origin: &str) -> Router {
    let cors = cors_layer(client_origin);

    Router::new()
        .route("/feed/posts", get(rest::get_posts))
        .route("/feed/post", post(rest::create_post))
        .route(
            "/feed/post/{id}",
            get(rest::get_post)
                .put(rest::update_post)
                .delete(rest::delete_post),
        )
        .route("/auth/signup", put(rest::signup))
        .route("/auth/login", post(rest::login))
        .route(
            "/auth/status",
            get(rest::get_status).patch(rest::update_status),
        )
        .route("/post-image", put(upload::put_post_image))
        .route(
            "/graphql",
            get(rest::graphql_playground).post(rest::graphql_handler),
        )
        .route("/ws", get(realtime::ws_handler))
        .nest_service("/images", ServeDir::new(media_root))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::identity,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(client_origin: &str) -> CorsLayer {
    let origin = if client_origin == "*" {
        AllowOrigin::any()
    } else {
        match client_origin.parse::<HeaderValue>() {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                tracing::warn!(%client_origin, "unparseable CORS origin, allowing any");
                AllowOrigin::any()
            }
        }
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
