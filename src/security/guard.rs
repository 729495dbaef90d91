//! Access control: bearer-token extraction and authorization predicates
//!
//! Every role or ownership decision made by the services goes through the
//! functions in this module.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use super::role::Role;
use super::token::{Identity, TokenService};
use crate::api::error::ServiceError;

/// Authenticated caller, extracted from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct AuthUser(pub Identity);

impl AuthUser {
    pub fn identity(&self) -> &Identity {
        &self.0
    }

    pub fn into_inner(self) -> Identity {
        self.0
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthUser, ServiceError> {
    let tokens = req.app_data::<web::Data<TokenService>>().ok_or_else(|| {
        ServiceError::Internal("token service is not registered as app data".to_string())
    })?;

    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ServiceError::Unauthenticated("Unauthorized: No token provided.".into()))?;

    let token = header_value
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            ServiceError::Unauthenticated("Unauthorized: Malformed authorization header.".into())
        })?;

    let identity = tokens.verify(token)?;
    tracing::debug!("Authenticated user {} ({})", identity.user_id, identity.role);
    Ok(AuthUser(identity))
}

impl FromRequest for AuthUser {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

pub fn is_role(identity: &Identity, role: Role) -> bool {
    identity.role == role
}

pub fn is_admin(identity: &Identity) -> bool {
    is_role(identity, Role::Admin)
}

/// Applicants and federated accounts share the job-seeker permissions
pub fn is_applicant(identity: &Identity) -> bool {
    identity.role.is_applicant()
}

pub fn is_self_or_admin(identity: &Identity, target_user_id: Uuid) -> bool {
    is_admin(identity) || identity.user_id == target_user_id
}

/// Ownership is read from the stored resource, never from the token
pub fn owns(identity: &Identity, owner_id: Uuid) -> bool {
    identity.user_id == owner_id
}

fn allow(condition: bool, message: &str) -> Result<(), ServiceError> {
    if condition {
        Ok(())
    } else {
        Err(ServiceError::forbidden(message))
    }
}

pub fn require_admin(identity: &Identity) -> Result<(), ServiceError> {
    allow(is_admin(identity), "Forbidden: Only admins can access this resource.")
}

pub fn require_employer(identity: &Identity) -> Result<(), ServiceError> {
    allow(
        is_role(identity, Role::Employer),
        "Forbidden: Only employers can access this resource.",
    )
}

pub fn require_applicant(identity: &Identity) -> Result<(), ServiceError> {
    allow(
        is_applicant(identity),
        "Forbidden: Only applicants can access this resource.",
    )
}

pub fn require_self_or_admin(identity: &Identity, target_user_id: Uuid) -> Result<(), ServiceError> {
    allow(
        is_self_or_admin(identity, target_user_id),
        "Unauthorized. You can only access your own account.",
    )
}

/// Owner-only mutation, e.g. editing a job or updating an application on it
pub fn require_owner(identity: &Identity, owner_id: Uuid, message: &str) -> Result<(), ServiceError> {
    allow(owns(identity, owner_id), message)
}

/// Owner or admin, e.g. deleting a job or listing its applications
pub fn require_owner_or_admin(
    identity: &Identity,
    owner_id: Uuid,
    message: &str,
) -> Result<(), ServiceError> {
    allow(owns(identity, owner_id) || is_admin(identity), message)
}

/// Resolves which user a profile operation targets
///
/// Admins may name any user (their own id when no path id is given);
/// everyone else may only target themselves.
pub fn resolve_profile_target(
    identity: &Identity,
    path_user_id: Option<Uuid>,
) -> Result<Uuid, ServiceError> {
    match path_user_id {
        None => Ok(identity.user_id),
        Some(target) if is_self_or_admin(identity, target) => Ok(target),
        Some(_) => Err(ServiceError::forbidden(
            "Forbidden: You can only manage your own profile.",
        )),
    }
}
