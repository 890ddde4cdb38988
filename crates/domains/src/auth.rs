//! # AuthContext
//!
//! The per-request outcome of identity verification. Created fresh for
//! every inbound request by the identity middleware and destroyed with
//! it; never persisted.

use uuid::Uuid;

use crate::error::{DomainError, Result};

/// Either nobody, or a verified subject. The middleware only annotates;
/// whether anonymity is acceptable is the handler's decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthContext {
    #[default]
    Anonymous,
    Authenticated {
        subject: Uuid,
    },
}

impl AuthContext {
    /// The authorization guard: fails hard on anonymity, before any side
    /// effect, with the stable 401 code. On success returns the subject
    /// id as the acting identity.
    pub fn require(&self) -> Result<Uuid> {
        match self {
            Self::Authenticated { subject } => Ok(*subject),
            Self::Anonymous => Err(DomainError::NotAuthenticated),
        }
    }

    pub fn subject(&self) -> Option<Uuid> {
        match self {
            Self::Authenticated { subject } => Some(*subject),
            Self::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }
}
