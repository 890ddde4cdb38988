//! # Realtime Broadcaster
//!
//! Fan-out of post-change events to every connected viewer. The hub is
//! a process-wide singleton with an explicit `init()`/`hub()` lifecycle:
//! `hub()` before `init()` is a programmer error and panics; events
//! must never be dropped silently because wiring was forgotten.
//!
//! Delivery is best effort: no viewers is a no-op, and a viewer that
//! cannot keep up loses the oldest frames. Emission order is preserved
//! per viewer by the broadcast channel.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tokio::sync::broadcast;

use domains::events::PostEvent;
use domains::ports::PostEventSink;

use crate::wire;

/// Frames a single viewer may fall behind before it starts losing them.
const CHANNEL_CAPACITY: usize = 256;

static HUB: OnceCell<Arc<RealtimeHub>> = OnceCell::new();

pub struct RealtimeHub {
    tx: broadcast::Sender<String>,
}

impl RealtimeHub {
    /// A standalone hub; tests wire these directly. Process wiring goes
    /// through [`init`].
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn viewer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl PostEventSink for RealtimeHub {
    fn emit(&self, event: PostEvent) {
        let frame = wire::event_frame(&event).to_string();
        // Err means no connected viewers: a no-op, not a failure.
        if self.tx.send(frame).is_err() {
            tracing::debug!(action = event.action(), "no viewers connected, event dropped");
        }
    }
}

/// Initializes the process-wide hub. Idempotent: repeated calls return
/// the same hub, so assembly code and tests can share one lifecycle.
pub fn init() -> Arc<RealtimeHub> {
    HUB.get_or_init(|| Arc::new(RealtimeHub::new(CHANNEL_CAPACITY)))
        .clone()
}

/// The process-wide hub. Panics when called before [`init`]; that is a
/// wiring bug, not a runtime condition to recover from.
pub fn hub() -> Arc<RealtimeHub> {
    HUB.get()
        .expect("realtime hub used before init(); call realtime::init() at startup")
        .clone()
}

#[cfg(feature = "web-axum")]
mod ws {
    use axum::extract::ws::{Message, WebSocket};
    use axum::extract::WebSocketUpgrade;
    use axum::response::Response;
    use tokio::sync::broadcast::error::RecvError;

    use super::hub;

    /// `GET /ws`, the transport handshake. The viewer is `Connected`
    /// from the upgrade until the socket closes; no reconnection logic
    /// lives server-side.
    pub async fn ws_handler(ws: WebSocketUpgrade) -> Response {
        ws.on_upgrade(viewer_loop)
    }

    async fn viewer_loop(mut socket: WebSocket) {
        let mut rx = hub().subscribe();
        tracing::debug!("viewer connected");
        loop {
            tokio::select! {
                frame = rx.recv() => match frame {
                    Ok(frame) => {
                        if socket.send(Message::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(RecvError::Lagged(missed)) => {
                        tracing::warn!(missed, "viewer lagging, frames dropped");
                    }
                    Err(RecvError::Closed) => break,
                },
                incoming = socket.recv() => match incoming {
                    // Inbound traffic is ignored; the channel is
                    // server-to-client only. None/Err is teardown.
                    Some(Ok(_)) => {}
                    _ => break,
                },
            }
        }
        tracing::debug!("viewer disconnected");
    }
}

#[cfg(feature = "web-axum")]
pub use ws::ws_handler;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use domains::models::{Author, Post};
    use uuid::Uuid;

    fn event(title: &str) -> PostEvent {
        let now = Utc::now();
        let author = Author {
            id: Uuid::now_v7(),
            name: "Maria".into(),
        };
        PostEvent::Created {
            post: Post {
                id: Uuid::now_v7(),
                title: title.into(),
                content: "Hello, feed!".into(),
                image_url: "images/one.png".into(),
                creator_id: author.id,
                created_at: now,
                updated_at: now,
            },
            author,
        }
    }

    #[tokio::test]
    async fn emit_without_viewers_is_a_noop() {
        let hub = RealtimeHub::new(8);
        hub.emit(event("Nobody listening"));
        assert_eq!(hub.viewer_count(), 0);
    }

    #[tokio::test]
    async fn every_viewer_sees_frames_in_emission_order() {
        let hub = RealtimeHub::new(8);
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();

        hub.emit(event("Post one"));
        hub.emit(event("Post two"));
        hub.emit(PostEvent::Deleted { id: Uuid::now_v7() });

        for rx in [&mut first, &mut second] {
            let a: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            let b: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            let c: serde_json::Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
            assert_eq!(a["data"]["post"]["title"], "Post one");
            assert_eq!(b["data"]["post"]["title"], "Post two");
            assert_eq!(c["data"]["action"], "delete");
        }
    }

    #[tokio::test]
    async fn init_is_idempotent_and_hub_returns_the_same_instance() {
        let first = init();
        let second = init();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&first, &hub()));
    }
}
