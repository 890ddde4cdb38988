//! HS256 implementation of the `TokenService` port.
//!
//! `verify` collapses every failure mode (malformed token, signature
//! mismatch, expiry) into `AuthContext::Anonymous`, so a caller cannot
//! tell which one occurred.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use domains::auth::AuthContext;
use domains::error::{DomainError, Result};
use domains::ports::TokenService;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject id, stringified UUID.
    sub: String,
    email: String,
    /// Issued-at and expiry, seconds since epoch.
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    /// The secret is immutable process-wide state, loaded once from
    /// configuration.
    pub fn new(secret: &SecretString, ttl_secs: u32) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token is invalid the instant it expires.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.expose_secret().as_bytes()),
            decoding: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
            ttl: Duration::seconds(i64::from(ttl_secs)),
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, subject: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| DomainError::Internal(format!("token signing failed: {err}")))
    }

    fn verify(&self, token: &str) -> AuthContext {
        let Ok(data) = decode::<Claims>(token, &self.decoding, &self.validation) else {
            return AuthContext::Anonymous;
        };
        // A signed token with an unparseable subject is still garbage.
        match Uuid::parse_str(&data.claims.sub) {
            Ok(subject) => AuthContext::Authenticated { subject },
            Err(_) => AuthContext::Anonymous,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new(&SecretString::from("test-secret"), 3600)
    }

    #[test]
    fn issued_tokens_verify_to_the_original_subject() {
        let svc = service();
        let subject = Uuid::now_v7();
        let token = svc.issue(subject, "a@b.com").unwrap();
        assert_eq!(svc.verify(&token), AuthContext::Authenticated { subject });
    }

    #[test]
    fn expired_tokens_are_anonymous_not_garbage_identities() {
        let svc = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::now_v7().to_string(),
            email: "a@b.com".into(),
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &svc.encoding).unwrap();
        assert_eq!(svc.verify(&token), AuthContext::Anonymous);
    }

    #[test]
    fn foreign_signatures_are_rejected() {
        let svc = service();
        let other = JwtTokenService::new(&SecretString::from("different-secret"), 3600);
        let token = other.issue(Uuid::now_v7(), "a@b.com").unwrap();
        assert_eq!(svc.verify(&token), AuthContext::Anonymous);
    }

    #[test]
    fn malformed_tokens_are_anonymous() {
        let svc = service();
        for junk in ["", "not.a.jwt", "eyJhbGciOiJIUzI1NiJ9"] {
            assert_eq!(svc.verify(junk), AuthContext::Anonymous);
        }
    }

    #[test]
    fn signed_token_with_non_uuid_subject_is_anonymous() {
        let svc = service();
        let now = Utc::now();
        let claims = Claims {
            sub: "not-a-uuid".into(),
            email: "a@b.com".into(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(1)).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &svc.encoding).unwrap();
        assert_eq!(svc.verify(&token), AuthContext::Anonymous);
    }
}
