//! Realtime post-change events, fanned out to connected viewers after a
//! mutation durably commits. Ephemeral: never persisted, no delivery
//! guarantee to disconnected viewers. The wire encoding is the realtime
//! adapter's concern.

use uuid::Uuid;

use crate::models::{Author, Post};

#[derive(Debug, Clone)]
pub enum PostEvent {
    /// Carries the full post with its resolved creator so viewers can
    /// render without a follow-up fetch.
    Created { post: Post, author: Author },
    Updated { post: Post, author: Author },
    /// Only the id survives deletion.
    Deleted { id: Uuid },
}

impl PostEvent {
    /// The id of the post this event concerns.
    pub fn post_id(&self) -> Uuid {
        match self {
            Self::Created { post, .. } | Self::Updated { post, .. } => post.id,
            Self::Deleted { id } => *id,
        }
    }

    /// Wire name of the action, matching the `posts` channel contract.
    pub fn action(&self) -> &'static str {
        match self {
            Self::Created { .. } => "create",
            Self::Updated { .. } => "update",
            Self::Deleted { .. } => "delete",
        }
    }
}
