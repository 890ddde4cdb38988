//! # domains
//!
//! The dependency-free core of rusty-feed: entities, port traits, the
//! error taxonomy, the per-request authentication context, and the
//! realtime event type. No I/O lives here; adapters implement the ports.

pub mod auth;
pub mod error;
pub mod events;
pub mod models;
pub mod ports;

pub use auth::AuthContext;
pub use error::{DomainError, FieldError, Result};
pub use events::PostEvent;
