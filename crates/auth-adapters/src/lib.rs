//! # auth-adapters
//!
//! Credential handling behind the `domains` ports: Argon2id password
//! hashing, and (behind the `auth-jwt` feature) HS256 identity tokens.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2PasswordHasher;

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
