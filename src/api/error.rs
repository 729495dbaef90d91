use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

use crate::api::validation::{validation_fields, ErrorResponse};
use crate::db::StoreError;
use crate::security::password::HashError;
use crate::security::token::TokenError;

/// Service-level errors, one variant per failure class exposed over HTTP
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No token, or a header that is not a bearer token
    #[error("{0}")]
    Unauthenticated(String),

    /// Signature, payload or expiry check failed
    #[error("Forbidden: Invalid token.")]
    InvalidToken,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Validation failed")]
    ValidationFailed(#[from] ValidationErrors),

    /// The identity provider rejected the authorization code
    #[error("{0}")]
    OAuthExchangeFailed(String),

    /// The identity provider could not be reached or answered with an error status
    #[error("Identity provider request failed: {0}")]
    UpstreamFailure(String),

    #[error("Database error: {0}")]
    Database(StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => ServiceError::Conflict(msg),
            other => ServiceError::Database(other),
        }
    }
}

impl From<TokenError> for ServiceError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid => ServiceError::InvalidToken,
            TokenError::Signing => ServiceError::Internal(err.to_string()),
        }
    }
}

impl From<HashError> for ServiceError {
    fn from(err: HashError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ServiceError::InvalidToken | ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Conflict(_) => StatusCode::CONFLICT,
            ServiceError::BadRequest(_)
            | ServiceError::ValidationFailed(_)
            | ServiceError::OAuthExchangeFailed(_) => StatusCode::BAD_REQUEST,
            ServiceError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let body = match self {
            ServiceError::ValidationFailed(errors) => {
                warn!("Validation error: {}", errors);
                ErrorResponse {
                    error: "Validation failed".to_string(),
                    fields: Some(validation_fields(errors)),
                }
            }
            ServiceError::Database(_) | ServiceError::Internal(_) => {
                // Never leak store or runtime details to clients
                error!("{}", self);
                ErrorResponse::new("Internal server error.")
            }
            ServiceError::UpstreamFailure(_) => {
                error!("{}", self);
                ErrorResponse::new("Failed to communicate with the identity provider.")
            }
            other => {
                warn!("Request rejected ({}): {}", status.as_u16(), other);
                ErrorResponse::new(other.to_string())
            }
        };
        HttpResponse::build(status).json(body)
    }
}
