//! OAuth2 client-credentials token provider.
//!
//! Fetches app-only bearer tokens from the identity platform's token
//! endpoint and caches them until shortly before expiry. The client
//! secret is wrapped in [`secrecy::SecretString`] and only exposed when
//! building the token request form; it never appears in Debug output or
//! logs.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::ExposeSecret;
use tokio::sync::Mutex;

use gridhook_types::config::AppSettings;
use gridhook_types::error::DirectoryError;

use super::types::TokenResponse;

/// Scope requested for app-only directory access.
const DEFAULT_SCOPE: &str = "https://graph.microsoft.com/.default";

/// A token within this margin of expiry is treated as stale.
const EXPIRY_SKEW_SECS: i64 = 300;

/// Remote-call timeout, made explicit rather than relying on client
/// defaults.
pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_SKEW_SECS) < self.expires_at
    }
}

/// Caching client-credentials token source for the directory service.
pub struct TokenProvider {
    client: reqwest::Client,
    settings: Arc<AppSettings>,
    token_url: String,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(settings: Arc<AppSettings>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        let token_url = settings.token_url.clone().unwrap_or_else(|| {
            format!(
                "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
                settings.tenant_id
            )
        });

        Self {
            client,
            settings,
            token_url,
            cached: Mutex::new(None),
        }
    }

    /// Return a bearer token, fetching a fresh one when the cached token
    /// is absent or near expiry.
    pub async fn access_token(&self) -> Result<String, DirectoryError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.is_fresh(Utc::now()) {
                return Ok(token.access_token.clone());
            }
        }

        let token = self.fetch_token().await?;
        let access_token = token.access_token.clone();
        *cached = Some(token);
        Ok(access_token)
    }

    async fn fetch_token(&self) -> Result<CachedToken, DirectoryError> {
        let form = [
            ("client_id", self.settings.client_id.as_str()),
            ("client_secret", self.settings.client_secret.expose_secret()),
            ("scope", DEFAULT_SCOPE),
            ("grant_type", "client_credentials"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DirectoryError::Auth(format!(
                "token endpoint returned {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| DirectoryError::Auth(format!("malformed token response: {e}")))?;

        tracing::debug!(expires_in = token.expires_in, "acquired directory access token");

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + chrono::Duration::seconds(token.expires_in),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_token_fresh_well_before_expiry() {
        let now = Utc::now();
        let token = CachedToken {
            access_token: "tok".to_string(),
            expires_at: now + chrono::Duration::hours(1),
        };
        assert!(token.is_fresh(now));
    }

    #[test]
    fn test_cached_token_stale_within_skew_margin() {
        let now = Utc::now();
        let token = CachedToken {
            access_token: "tok".to_string(),
            expires_at: now + chrono::Duration::seconds(EXPIRY_SKEW_SECS - 1),
        };
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn test_token_url_derived_from_tenant() {
        let provider = TokenProvider::new(test_settings(None));
        assert_eq!(
            provider.token_url,
            "https://login.microsoftonline.com/tenant-1/oauth2/v2.0/token"
        );
    }

    #[test]
    fn test_token_url_override_wins() {
        let provider = TokenProvider::new(test_settings(Some("http://localhost:9/token")));
        assert_eq!(provider.token_url, "http://localhost:9/token");
    }

    fn test_settings(token_url: Option<&str>) -> Arc<AppSettings> {
        let mut toml = String::from(
            r#"
tenant_id = "tenant-1"
client_id = "client-1"
client_secret = "s3cret"
azure_subscription_id = "azsub-1"
resource_group = "rg-1"
partner_topic = "graph-notifications"
location = "westus2"
"#,
        );
        if let Some(url) = token_url {
            toml.push_str(&format!("token_url = \"{url}\"\n"));
        }
        Arc::new(toml::from_str(&toml).unwrap())
    }
}
