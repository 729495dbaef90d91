//! HTTP client for the GitHub OAuth web flow and user API

use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::OAuthConfig;

const USER_AGENT_VALUE: &str = "job-board";
const SCOPE: &str = "read:user user:email";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered but refused to issue a token
    #[error("{0}")]
    Rejected(String),

    /// Network failure or unexpected response from the provider
    #[error("{0}")]
    Transport(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Profile fields used for account resolution
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalProfile {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalEmail {
    pub email: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    config: OAuthConfig,
}

impl GithubClient {
    pub fn new(config: OAuthConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_default();
        Self { http, config }
    }

    /// Where the user agent is sent to start the flow
    pub fn authorize_url(&self) -> Result<Url, url::ParseError> {
        let mut params = vec![
            ("client_id", self.config.client_id.as_str()),
            ("scope", SCOPE),
        ];
        if let Some(callback) = self.config.callback_url.as_deref() {
            params.push(("redirect_uri", callback));
        }
        Url::parse_with_params(&self.config.authorize_url, params)
    }

    pub async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        debug!("Exchanging authorization code with provider");

        let mut body = serde_json::json!({
            "client_id": self.config.client_id,
            "client_secret": self.config.client_secret,
            "code": code,
        });
        if let Some(callback) = &self.config.callback_url {
            body["redirect_uri"] = serde_json::Value::String(callback.clone());
        }

        let response = self
            .http
            .post(&self.config.token_url)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ProviderError::Transport(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let payload: TokenResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Transport(format!("malformed token response: {}", e)))?;

        match payload.access_token {
            Some(token) if !token.is_empty() && payload.error.is_none() => Ok(token),
            _ => {
                let reason = payload
                    .error_description
                    .or(payload.error)
                    .unwrap_or_else(|| format!("no access token (HTTP {})", status));
                warn!("Provider rejected authorization code: {}", reason);
                Err(ProviderError::Rejected(reason))
            }
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        access_token: &str,
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.config.api_url.trim_end_matches('/'), path);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {}", access_token))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Transport(format!("GET {} returned {}", path, status)));
        }
        Ok(response.json().await?)
    }

    pub async fn fetch_profile(&self, access_token: &str) -> Result<ExternalProfile, ProviderError> {
        self.get_json("/user", access_token).await
    }

    pub async fn fetch_emails(&self, access_token: &str) -> Result<Vec<ExternalEmail>, ProviderError> {
        self.get_json("/user/emails", access_token).await
    }
}
