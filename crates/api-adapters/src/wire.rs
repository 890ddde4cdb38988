//! Wire shapes shared by the REST arm and the realtime channel.
//! Field names are camelCase on the wire regardless of the Rust side.

use serde_json::{json, Value};

use domains::events::PostEvent;
use domains::models::{Author, Post};

pub fn post_body(post: &Post, author: &Author) -> Value {
    json!({
        "id": post.id,
        "title": post.title,
        "content": post.content,
        "imageUrl": post.image_url,
        "creator": { "id": author.id, "name": author.name },
        "createdAt": post.created_at.to_rfc3339(),
        "updatedAt": post.updated_at.to_rfc3339(),
    })
}

/// One frame of the `posts` realtime channel:
/// `{"event": "posts", "data": {"action": ..., "post": ...}}`.
/// Deletions carry only the id.
pub fn event_frame(event: &PostEvent) -> Value {
    let post = match event {
        PostEvent::Created { post, author } | PostEvent::Updated { post, author } => {
            post_body(post, author)
        }
        PostEvent::Deleted { id } => json!(id),
    };
    json!({
        "event": "posts",
        "data": { "action": event.action(), "post": post },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn delete_frames_carry_only_the_id() {
        let id = Uuid::now_v7();
        let frame = event_frame(&PostEvent::Deleted { id });
        assert_eq!(frame["event"], "posts");
        assert_eq!(frame["data"]["action"], "delete");
        assert_eq!(frame["data"]["post"], json!(id));
    }

    #[test]
    fn create_frames_embed_the_resolved_creator() {
        let now = Utc::now();
        let author = Author {
            id: Uuid::now_v7(),
            name: "Maria".into(),
        };
        let post = Post {
            id: Uuid::now_v7(),
            title: "First post".into(),
            content: "Hello, feed!".into(),
            image_url: "images/one.png".into(),
            creator_id: author.id,
            created_at: now,
            updated_at: now,
        };
        let frame = event_frame(&PostEvent::Created {
            post: post.clone(),
            author: author.clone(),
        });
        assert_eq!(frame["data"]["action"], "create");
        assert_eq!(frame["data"]["post"]["creator"]["name"], "Maria");
        assert_eq!(frame["data"]["post"]["imageUrl"], "images/one.png");
    }
}
