//! Maps a GitHub identity onto a local account and issues a session token

use tracing::{info, warn};

use super::github::{ExternalEmail, ExternalProfile, GithubClient, ProviderError};
use crate::api::auth::models::{normalize_email, AuthResponse};
use crate::api::error::ServiceError;
use crate::db::models::User;
use crate::db::Store;
use crate::security::role::Role;
use crate::security::token::{Identity, TokenService};

/// Email chosen for the external identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEmail {
    pub address: String,
    /// False for the `{login}@github.com` placeholder
    pub verified: bool,
}

impl ResolvedEmail {
    fn placeholder(login: &str) -> Self {
        Self {
            address: normalize_email(&format!("{}@github.com", login)),
            verified: false,
        }
    }
}

/// First entry flagged both primary and verified
pub fn pick_primary_email(emails: &[ExternalEmail]) -> Option<&ExternalEmail> {
    emails.iter().find(|e| e.primary && e.verified)
}

impl From<ProviderError> for ServiceError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Rejected(reason) => {
                ServiceError::OAuthExchangeFailed(format!("GitHub authorization failed: {}", reason))
            }
            ProviderError::Transport(reason) => ServiceError::UpstreamFailure(reason),
        }
    }
}

pub struct FederatedLogin {
    client: GithubClient,
    store: Store,
    tokens: TokenService,
}

impl FederatedLogin {
    pub fn new(client: GithubClient, store: Store, tokens: TokenService) -> Self {
        Self {
            client,
            store,
            tokens,
        }
    }

    pub fn authorize_url(&self) -> Result<String, ServiceError> {
        self.client
            .authorize_url()
            .map(|url| url.to_string())
            .map_err(|e| ServiceError::Internal(format!("invalid authorize URL: {}", e)))
    }

    /// Runs the callback half of the flow
    ///
    /// No local user is created or modified unless every provider call
    /// succeeds and the account resolves without conflict.
    pub async fn complete(&self, code: Option<&str>) -> Result<AuthResponse, ServiceError> {
        let code = code
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ServiceError::bad_request("Authorization code not provided"))?;

        let access_token = self.client.exchange_code(code).await?;
        let profile = self.client.fetch_profile(&access_token).await?;
        let email = self.resolve_email(&profile, &access_token).await?;

        let user = self.resolve_account(&profile, &email).await?;
        let identity = Identity::new(user.id, user.role).with_username(user.username.clone());
        let token = self.tokens.issue(&identity)?;

        info!("GitHub login for user {} (external id {})", user.id, profile.id);
        Ok(AuthResponse {
            message: "GitHub login successful".to_string(),
            token,
            user,
        })
    }

    async fn resolve_email(
        &self,
        profile: &ExternalProfile,
        access_token: &str,
    ) -> Result<ResolvedEmail, ServiceError> {
        // GitHub only exposes a public profile email once it is verified
        if let Some(email) = profile.email.as_deref().filter(|e| !e.is_empty()) {
            return Ok(ResolvedEmail {
                address: normalize_email(email),
                verified: true,
            });
        }

        let emails = self.client.fetch_emails(access_token).await?;
        Ok(match pick_primary_email(&emails) {
            Some(entry) => ResolvedEmail {
                address: normalize_email(&entry.email),
                verified: true,
            },
            None => {
                warn!("No verified primary email for GitHub user {}", profile.login);
                ResolvedEmail::placeholder(&profile.login)
            }
        })
    }

    /// External id, then email, then a new federated account
    pub async fn resolve_account(
        &self,
        profile: &ExternalProfile,
        email: &ResolvedEmail,
    ) -> Result<User, ServiceError> {
        let external_id = profile.id.to_string();

        if let Some(user) = self.store.users.find_by_external_id(&external_id).await? {
            return Ok(user);
        }

        if let Some(mut existing) = self.store.users.find_by_email(&email.address).await? {
            if existing.external_id.is_some() {
                warn!(
                    "Email {} is linked to a different GitHub account than {}",
                    email.address, external_id
                );
                return Err(ServiceError::conflict(
                    "This email is already linked to a different GitHub account.",
                ));
            }
            if !email.verified {
                return Err(ServiceError::conflict(
                    "An account with this email already exists. Sign in with your password instead.",
                ));
            }

            existing.external_id = Some(external_id);
            if !self.store.users.update(&existing).await? {
                return Err(ServiceError::not_found("User not found."));
            }
            info!("Linked GitHub account {} to user {}", profile.id, existing.id);
            return Ok(existing);
        }

        let mut user = User::new(email.address.clone(), Role::Federated);
        user.name = profile
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| n.chars().count() >= 2)
            .map(str::to_string);
        user.username = Some(profile.login.clone());
        user.external_id = Some(external_id);
        self.store.users.insert(&user).await?;

        info!("Created federated user {} for GitHub login {}", user.id, profile.login);
        Ok(user)
    }
}
