//! Account lifecycle: signup, login, and the profile status line.
//!
//! Login deliberately collapses "unknown email" and "wrong password"
//! into the same failure so the endpoint cannot be used to probe for
//! accounts.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use domains::auth::AuthContext;
use domains::error::{DomainError, Result};
use domains::models::{NewUser, User};
use domains::ports::{PasswordHasher, TokenService, UserRepo};

use crate::validate;

#[derive(Debug, Clone, Deserialize)]
pub struct SignupInput {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// What a successful login hands back to the client.
#[derive(Debug, Clone)]
pub struct AuthPayload {
    pub token: String,
    pub user_id: Uuid,
}

pub struct AuthService {
    users: Arc<dyn UserRepo>,
    passwords: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepo>,
        passwords: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Creates an account. Duplicate emails are a `Conflict`; the
    /// store's unique index backstops the check-then-insert race, so a
    /// concurrent duplicate surfaces identically.
    pub async fn signup(&self, input: SignupInput) -> Result<User> {
        let mut errors = Vec::new();
        validate::check_email(&input.email, &mut errors);
        validate::check_name(&input.name, &mut errors);
        validate::check_password(&input.password, &mut errors);
        if !errors.is_empty() {
            return Err(DomainError::validation("Invalid input", errors));
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(DomainError::Conflict("User exists".into()));
        }

        let password_hash = self.passwords.hash(&input.password)?;
        let user = self
            .users
            .insert(NewUser {
                id: Uuid::now_v7(),
                email: input.email,
                name: input.name,
                password_hash,
                status: User::DEFAULT_STATUS.into(),
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(user = %user.id, "account created");
        Ok(user)
    }

    /// Verifies credentials and issues an identity token. The token's
    /// validity window is the token service's concern.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthPayload> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(DomainError::NotAuthenticated);
        };
        if !self.passwords.verify(password, &user.password_hash) {
            return Err(DomainError::NotAuthenticated);
        }
        let token = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthPayload {
            token,
            user_id: user.id,
        })
    }

    /// The acting user's account. Identity-scoped: the guard runs first.
    pub async fn current_user(&self, ctx: &AuthContext) -> Result<User> {
        let subject = ctx.require()?;
        self.users
            .find_by_id(subject)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }

    pub async fn status(&self, ctx: &AuthContext) -> Result<String> {
        Ok(self.current_user(ctx).await?.status)
    }

    pub async fn update_status(&self, ctx: &AuthContext, status: &str) -> Result<User> {
        let subject = ctx.require()?;
        self.users
            .update_status(subject, status)
            .await?
            .ok_or(DomainError::NotFound("user"))
    }
}
