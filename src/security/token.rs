//! Session token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::role::Role;

/// Tokens are valid for a fixed window; there is no refresh flow.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Identity decoded from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: Role,
    pub username: Option<String>,
}

impl Identity {
    pub fn new(user_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            role,
            username: None,
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    #[serde(rename = "userType")]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token could not be signed")]
    Signing,
    #[error("token is invalid or expired")]
    Invalid,
}

/// Signs and verifies HS256 session tokens with the process-wide secret
#[derive(Clone)]
pub struct TokenService {
    secret: Arc<String>,
}

impl TokenService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::new(secret.into()),
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            user_id: identity.user_id,
            role: identity.role,
            username: identity.username.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };
        self.sign(&claims)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            tracing::error!("Failed to encode session token: {}", e);
            TokenError::Signing
        })
    }

    /// Fails on a bad signature, a malformed payload, or an elapsed expiry
    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| Identity {
            user_id: data.claims.user_id,
            role: data.claims.role,
            username: data.claims.username,
        })
        .map_err(|e| {
            tracing::debug!("Token verification failed: {}", e);
            TokenError::Invalid
        })
    }
}
