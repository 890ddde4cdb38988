//! # services
//!
//! Business rules of rusty-feed, written against the ports in
//! `domains`. Adapters are injected by the binary; nothing here touches
//! a socket, a file, or a database driver directly.

pub mod auth;
pub mod feed;
pub mod posts;
mod validate;

pub use auth::{AuthPayload, AuthService, SignupInput};
pub use feed::PageParams;
pub use posts::{PostInput, PostService, PostUpdate};
