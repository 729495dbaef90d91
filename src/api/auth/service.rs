use tracing::{info, warn};
use uuid::Uuid;
use validator::{Validate, ValidateEmail};

use super::models::{
    normalize_email, AuthResponse, LoginRequest, RegisterRequest, UpdateUserRequest, UserResponse,
};
use crate::api::error::ServiceError;
use crate::api::validation::validate_display_name;
use crate::db::models::User;
use crate::db::Store;
use crate::security::guard;
use crate::security::password::PasswordHasher;
use crate::security::role::Role;
use crate::security::token::{Identity, TokenService};

const INVALID_CREDENTIALS: &str = "Invalid email or password.";

/// Local accounts: registration, password login and account maintenance
pub struct AuthService {
    store: Store,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Store, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Self-registration is open to applicants and employers only
    pub async fn register(&self, request: &RegisterRequest) -> Result<UserResponse, ServiceError> {
        request.validate()?;
        match request.user_type {
            Role::Admin => {
                return Err(ServiceError::forbidden(
                    "Forbidden: Admin accounts cannot be self-registered.",
                ))
            }
            Role::Federated => {
                return Err(ServiceError::bad_request(
                    "Federated accounts are created through GitHub login.",
                ))
            }
            Role::Applicant | Role::Employer => {}
        }

        let email = normalize_email(&request.email);
        if self.store.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("Email is already registered."));
        }

        let mut user = User::new(email, request.user_type);
        user.name = Some(request.name.trim().to_string());
        user.username = request.username.clone();
        user.password_hash = Some(self.hasher.hash(&request.password).await?);
        self.store.users.insert(&user).await?;

        info!("Registered {} user {}", user.role, user.id);
        Ok(UserResponse {
            message: "User registered successfully".to_string(),
            user,
        })
    }

    /// Operator path for admin accounts, which cannot self-register
    pub async fn create_admin(
        &self,
        name: Option<&str>,
        email: &str,
        password: &str,
    ) -> Result<User, ServiceError> {
        let email = normalize_email(email);
        if !email.validate_email() {
            return Err(ServiceError::bad_request("Email must be a valid email address"));
        }
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        if let Some(name) = name {
            validate_display_name(name)
                .map_err(|_| ServiceError::bad_request("Name must be at least 2 characters"))?;
        }
        if password.chars().count() < 8 {
            return Err(ServiceError::bad_request("Password must be at least 8 characters"));
        }
        if self.store.users.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::conflict("Email is already registered."));
        }

        let mut user = User::new(email, Role::Admin);
        user.name = name.map(str::to_string);
        user.password_hash = Some(self.hasher.hash(password).await?);
        self.store.users.insert(&user).await?;

        info!("Created admin user {}", user.id);
        Ok(user)
    }

    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ServiceError> {
        let email = normalize_email(&request.email);
        let user = self
            .store
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| ServiceError::Unauthenticated(INVALID_CREDENTIALS.into()))?;

        // Federated accounts have no password to check
        let Some(hash) = user.password_hash.as_deref() else {
            warn!("Password login attempted for federated user {}", user.id);
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.into()));
        };

        if !self.hasher.verify(&request.password, hash).await? {
            warn!("Failed login for user {}", user.id);
            return Err(ServiceError::Unauthenticated(INVALID_CREDENTIALS.into()));
        }

        let identity = Identity::new(user.id, user.role).with_username(user.username.clone());
        let token = self.tokens.issue(&identity)?;
        info!("User {} logged in", user.id);

        Ok(AuthResponse {
            message: "Login successful".to_string(),
            token,
            user,
        })
    }

    pub async fn list_users(&self, identity: &Identity) -> Result<Vec<User>, ServiceError> {
        guard::require_admin(identity)?;
        Ok(self.store.users.list().await?)
    }

    pub async fn get_user(&self, identity: &Identity, user_id: Uuid) -> Result<User, ServiceError> {
        guard::require_self_or_admin(identity, user_id)?;
        self.store
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found."))
    }

    pub async fn update_user(
        &self,
        identity: &Identity,
        user_id: Uuid,
        request: &UpdateUserRequest,
    ) -> Result<UserResponse, ServiceError> {
        guard::require_self_or_admin(identity, user_id)?;
        request.validate()?;
        if request.is_empty() {
            return Err(ServiceError::bad_request(
                "At least one field (name, email, username, userType) must be provided.",
            ));
        }

        let mut user = self
            .store
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User not found."))?;

        if let Some(role) = request.user_type {
            if role != user.role {
                guard::require_admin(identity).map_err(|_| {
                    ServiceError::forbidden("Forbidden: Only admins can change a user's role.")
                })?;
                if role != Role::Federated && user.password_hash.is_none() {
                    return Err(ServiceError::bad_request(
                        "Accounts without a password can only hold the federated role.",
                    ));
                }
                info!("User {} role changed from {} to {}", user.id, user.role, role);
                user.role = role;
            }
        }
        if let Some(name) = &request.name {
            user.name = Some(name.trim().to_string());
        }
        if let Some(email) = &request.email {
            user.email = normalize_email(email);
        }
        if let Some(username) = &request.username {
            user.username = Some(username.clone());
        }

        if !self.store.users.update(&user).await? {
            return Err(ServiceError::not_found("User not found."));
        }

        info!("User {} updated by {}", user.id, identity.user_id);
        Ok(UserResponse {
            message: "User updated successfully".to_string(),
            user,
        })
    }
}
