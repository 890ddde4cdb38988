//! Shared fixtures for the end-to-end tests: a fully assembled router
//! over in-memory adapters, plus request helpers. Each `TestApp` is an
//! isolated world with its own store, media, hub and signing secret.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::SecretString;
use serde_json::{json, Value};
use tower::ServiceExt;

use api_adapters::realtime::RealtimeHub;
use api_adapters::ApiState;
use auth_adapters::{Argon2PasswordHasher, JwtTokenService};
use services::{AuthService, PostService};
use storage_adapters::{MemMediaStore, MemStore};

/// Page size the feed serves under test.
pub const PER_PAGE: u32 = 2;

pub const ALLOWED_MIME: [&str; 3] = ["image/png", "image/jpg", "image/jpeg"];

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemStore>,
    pub media: Arc<MemMediaStore>,
    pub hub: Arc<RealtimeHub>,
}

impl TestApp {
    pub fn spawn() -> Self {
        let store = MemStore::new();
        let media = MemMediaStore::new();
        let hub = Arc::new(RealtimeHub::new(64));
        let tokens = Arc::new(JwtTokenService::new(
            &SecretString::from("integration-test-secret"),
            3600,
        ));
        let passwords = Arc::new(Argon2PasswordHasher);

        let auth = Arc::new(AuthService::new(
            store.clone(),
            passwords,
            tokens.clone(),
        ));
        let posts = Arc::new(PostService::new(
            store.clone(),
            store.clone(),
            media.clone(),
            hub.clone(),
            PER_PAGE,
        ));
        let state = ApiState::new(
            auth,
            posts,
            tokens,
            media.clone(),
            ALLOWED_MIME.iter().map(|m| m.to_string()).collect(),
        );
        let router = api_adapters::router(state, Path::new("images"), "*");

        Self {
            router,
            store,
            media,
            hub,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body collect");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn call(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request build");
        self.send(request).await
    }

    pub async fn graphql(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Value,
    ) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/graphql",
            token,
            Some(json!({ "query": query, "variables": variables })),
        )
        .await
    }

    /// Signs up `email` with the shared test password and returns the
    /// new user id.
    pub async fn signup(&self, email: &str) -> Value {
        let (status, body) = self
            .call(
                Method::PUT,
                "/auth/signup",
                None,
                Some(json!({ "email": email, "name": "Test User", "password": "abcde" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        body["userId"].clone()
    }

    /// Signup + login in one step; returns a bearer token.
    pub async fn token_for(&self, email: &str) -> String {
        self.signup(email).await;
        let (status, body) = self
            .call(
                Method::POST,
                "/auth/login",
                None,
                Some(json!({ "email": email, "password": "abcde" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().expect("token in response").to_owned()
    }

    /// Creates a post through the REST arm and returns its id.
    pub async fn create_post(&self, token: &str, title: &str) -> String {
        let (status, body) = self
            .call(
                Method::POST,
                "/feed/post",
                Some(token),
                Some(json!({
                    "title": title,
                    "content": format!("Body of {title}"),
                    "imageUrl": "images/fixture.png",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body["post"]["id"].as_str().expect("post id").to_owned()
    }
}

pub const MULTIPART_BOUNDARY: &str = "rusty-feed-test-boundary";

/// Builds a `multipart/form-data` body with an optional `image` file
/// part and an optional `oldPath` text part.
pub fn multipart_body(
    image: Option<(&str, &str, &[u8])>,
    old_path: Option<&str>,
) -> Vec<u8> {
    let mut body = Vec::new();
    if let Some(old) = old_path {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"oldPath\"\r\n\r\n{old}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content_type, data)) = image {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_request(path: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::PUT).uri(path).header(
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).expect("request build")
}
