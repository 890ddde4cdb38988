//! # api-adapters
//!
//! The HTTP surface of rusty-feed. The GraphQL schema and the realtime
//! hub are always available; the axum routing, middleware, upload and
//! WebSocket plumbing sit behind the `web-axum` feature.

pub mod error;
pub mod graphql;
pub mod realtime;
pub mod wire;

#[cfg(feature = "web-axum")]
pub mod middleware;

#[cfg(feature = "web-axum")]
pub mod rest;

#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub mod upload;

#[cfg(feature = "web-axum")]
mod router;

#[cfg(feature = "web-axum")]
pub use router::router;

#[cfg(feature = "web-axum")]
pub use state::ApiState;
