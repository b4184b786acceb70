use super::TokenProvider;
use crate::config::AuthConfig;
use crate::error::{PingError, Result};
use crate::utils::scrub::error_body;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Tokens expiring within this window are refreshed before use.
const REFRESH_MARGIN: Duration = Duration::from_secs(60);
const DEFAULT_EXPIRES_IN_SECS: u64 = 3600;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// OAuth2 client-credentials grant against an Entra ID tenant.
pub struct ClientCredentialsProvider {
    token_url: String,
    client_id: String,
    client_secret: String,
    scope: String,
    client: Client,
    cached: Mutex<Option<CachedToken>>,
}

fn required<'a>(value: Option<&'a str>, name: &str, env: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| PingError::Auth(format!("{name} is not configured (set {env})")))
}

impl ClientCredentialsProvider {
    pub fn from_config(config: &AuthConfig, client: Client) -> Result<Self> {
        let tenant = required(config.tenant_id.as_deref(), "auth.tenant_id", "AZURE_TENANT_ID")?;
        let client_id = required(config.client_id.as_deref(), "auth.client_id", "AZURE_CLIENT_ID")?;
        let client_secret = required(
            config.client_secret.as_deref(),
            "auth.client_secret",
            "AZURE_CLIENT_SECRET",
        )?;

        let authority = config.authority.trim_end_matches('/');
        Ok(Self {
            token_url: format!("{authority}/{tenant}/oauth2/v2.0/token"),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scope: config.scope.clone(),
            client,
            cached: Mutex::new(None),
        })
    }

    async fn fetch(&self) -> Result<CachedToken> {
        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", self.scope.as_str()),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| PingError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = error_body(response).await;
            return Err(PingError::Auth(format!("token endpoint returned {status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PingError::Auth(format!("malformed token response: {e}")))?;

        if token.access_token.trim().is_empty() {
            return Err(PingError::Auth("token endpoint returned an empty access_token".into()));
        }

        let lifetime = Duration::from_secs(token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS));
        tracing::debug!(expires_in_secs = lifetime.as_secs(), "obtained agent bearer token");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + lifetime,
        })
    }
}

#[async_trait]
impl TokenProvider for ClientCredentialsProvider {
    async fn bearer_token(&self) -> Result<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() + REFRESH_MARGIN < token.expires_at
        {
            return Ok(token.value.clone());
        }

        let fresh = self.fetch().await?;
        let value = fresh.value.clone();
        *cached = Some(fresh);
        Ok(value)
    }
}
