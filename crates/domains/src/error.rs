//! # DomainError
//!
//! Centralized error handling for the rusty-feed ecosystem.
//! Every variant carries a stable numeric code that both the REST and
//! GraphQL arms surface verbatim.

use serde::Serialize;
use thiserror::Error;

/// A field-level validation detail, mirrored into the `data` slot of
/// error responses.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// The primary error type for all domain operations.
#[derive(Error, Debug)]
pub enum DomainError {
    /// Malformed input; carries field-level details.
    #[error("{message}")]
    Validation {
        message: String,
        details: Vec<FieldError>,
    },

    /// Missing or invalid identity.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Valid identity, insufficient rights (e.g. editing another
    /// user's post).
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Referenced entity absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Resource already exists (e.g. duplicate email).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Unexpected/store failure. The message is logged server-side and
    /// replaced with a generic one on the wire.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn validation(message: impl Into<String>, details: Vec<FieldError>) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// The stable numeric code surfaced to clients.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { .. } => 422,
            Self::NotAuthenticated => 401,
            Self::NotAuthorized(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Field details for the `data` slot of error responses, if any.
    pub fn details(&self) -> Option<&[FieldError]> {
        match self {
            Self::Validation { details, .. } if !details.is_empty() => Some(details),
            _ => None,
        }
    }
}

/// A specialized Result type for rusty-feed logic.
pub type Result<T> = std::result::Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_are_stable() {
        assert_eq!(DomainError::validation("bad", vec![]).status(), 422);
        assert_eq!(DomainError::NotAuthenticated.status(), 401);
        assert_eq!(DomainError::NotAuthorized("nope".into()).status(), 403);
        assert_eq!(DomainError::NotFound("post").status(), 404);
        assert_eq!(DomainError::Conflict("email taken".into()).status(), 409);
        assert_eq!(DomainError::Internal("boom".into()).status(), 500);
    }

    #[test]
    fn only_validation_exposes_details() {
        let err = DomainError::validation(
            "invalid input",
            vec![FieldError::new("title", "Title invalid")],
        );
        assert_eq!(err.details().unwrap().len(), 1);
        assert!(DomainError::NotFound("user").details().is_none());
    }
}
