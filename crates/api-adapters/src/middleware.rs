//! # Identity Middleware
//!
//! Runs on every inbound request, before any handler. It only
//! annotates: a missing, malformed or unverifiable credential yields
//! `AuthContext::Anonymous`, never a rejection: public endpoints
//! (static images, signup, login, the WS handshake) must stay reachable
//! without credentials, and everything else checks the annotation
//! explicitly.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;

use domains::auth::AuthContext;

use crate::state::ApiState;

pub async fn identity(State(state): State<ApiState>, mut req: Request, next: Next) -> Response {
    let ctx = match bearer_token(req.headers()) {
        Some(token) => state.tokens.verify(token),
        None => AuthContext::Anonymous,
    };
    req.extensions_mut().insert(ctx);
    next.run(req).await
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: Option<&str>) -> HeaderMap {
        let mut map = HeaderMap::new();
        if let Some(value) = value {
            map.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn extracts_the_bearer_token() {
        assert_eq!(bearer_token(&headers(Some("Bearer abc.def.ghi"))), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_malformed_headers_yield_nothing() {
        assert_eq!(bearer_token(&headers(None)), None);
        assert_eq!(bearer_token(&headers(Some("abc.def.ghi"))), None);
        assert_eq!(bearer_token(&headers(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&headers(Some("Bearer "))), None);
    }
}
