//! State shared across the axum handlers. Everything is `Arc`-wrapped
//! dynamic dispatch so the binary decides the adapter mix at assembly.

use std::sync::Arc;

use domains::ports::{MediaStore, TokenService};
use services::{AuthService, PostService};

use crate::graphql::{self, AppSchema};

#[derive(Clone)]
pub struct ApiState {
    pub auth: Arc<AuthService>,
    pub posts: Arc<PostService>,
    pub tokens: Arc<dyn TokenService>,
    pub media: Arc<dyn MediaStore>,
    /// Upload MIME allowlist from configuration.
    pub allowed_mime: Arc<Vec<String>>,
    pub schema: AppSchema,
}

impl ApiState {
    pub fn new(
        auth: Arc<AuthService>,
        posts: Arc<PostService>,
        tokens: Arc<dyn TokenService>,
        media: Arc<dyn MediaStore>,
        allowed_mime: Vec<String>,
    ) -> Self {
        let schema = graphql::build_schema(auth.clone(), posts.clone());
        Self {
            auth,
            posts,
            tokens,
            media,
            allowed_mime: Arc::new(allowed_mime),
            schema,
        }
    }
}
