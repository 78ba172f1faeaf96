//! GraphDirectoryClient -- concrete [`DirectoryService`] implementation
//! over the directory service's REST API.
//!
//! Requests carry a bearer token from [`TokenProvider`] and use an
//! explicit 30 s timeout. Failed responses are classified via their OData
//! error body; a not-found answer becomes [`DirectoryError::NotFound`] so
//! the dispatcher can reinterpret it as a soft-delete signal.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use gridhook_core::directory::DirectoryService;
use gridhook_types::config::AppSettings;
use gridhook_types::error::DirectoryError;
use gridhook_types::subscription::{DirectoryUser, Subscription};

use super::token::{REQUEST_TIMEOUT, TokenProvider};
use super::types::{Collection, ODataErrorBody};

const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Directory-service client backed by reqwest.
pub struct GraphDirectoryClient {
    client: reqwest::Client,
    token: TokenProvider,
    base_url: String,
}

impl GraphDirectoryClient {
    pub fn new(settings: Arc<AppSettings>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("failed to create reqwest client");

        let base_url = settings
            .graph_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Self {
            client,
            token: TokenProvider::new(settings),
            base_url,
        }
    }

    /// Build the full API URL for a relative path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn read_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<T, DirectoryError> {
        let status = response.status();
        if status.is_success() {
            response.json().await.map_err(|e| {
                DirectoryError::Transport(format!("malformed response for {context}: {e}"))
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(classify_error(status.as_u16(), &body, context))
        }
    }

    async fn check_status(
        &self,
        response: reqwest::Response,
        context: &str,
    ) -> Result<(), DirectoryError> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_error(status.as_u16(), &body, context))
    }
}

impl DirectoryService for GraphDirectoryClient {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>, DirectoryError> {
        let bearer = self.token.access_token().await?;
        let response = self
            .client
            .get(self.url("subscriptions"))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        let collection: Collection<Subscription> =
            self.read_json(response, "subscriptions").await?;
        Ok(collection.value)
    }

    async fn create_subscription(
        &self,
        subscription: &Subscription,
    ) -> Result<Subscription, DirectoryError> {
        let bearer = self.token.access_token().await?;
        let response = self
            .client
            .post(self.url("subscriptions"))
            .bearer_auth(bearer)
            .json(subscription)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        self.read_json(response, "subscriptions").await
    }

    async fn renew_subscription(
        &self,
        id: &str,
        expires: DateTime<Utc>,
    ) -> Result<(), DirectoryError> {
        let bearer = self.token.access_token().await?;
        let path = format!("subscriptions/{id}");
        let response = self
            .client
            .patch(self.url(&path))
            .bearer_auth(bearer)
            .json(&serde_json::json!({ "expirationDateTime": expires }))
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        self.check_status(response, &path).await
    }

    async fn get_user_by_path(
        &self,
        relative_path: &str,
    ) -> Result<DirectoryUser, DirectoryError> {
        let bearer = self.token.access_token().await?;
        let response = self
            .client
            .get(self.url(relative_path))
            .bearer_auth(bearer)
            .send()
            .await
            .map_err(|e| DirectoryError::Transport(e.to_string()))?;

        self.read_json(response, relative_path).await
    }
}

/// Map a failed response to the error taxonomy.
///
/// Not-found comes in two shapes: a plain 404, or an OData error body
/// whose code contains `ResourceNotFound` (case-insensitive).
fn classify_error(status: u16, body: &str, context: &str) -> DirectoryError {
    if status == 404 {
        return DirectoryError::NotFound(context.to_string());
    }

    if let Ok(parsed) = serde_json::from_str::<ODataErrorBody>(body) {
        if parsed
            .error
            .code
            .to_ascii_lowercase()
            .contains("resourcenotfound")
        {
            return DirectoryError::NotFound(context.to_string());
        }
        let message = format!("{}: {}", parsed.error.code, parsed.error.message);
        if status == 401 || status == 403 {
            return DirectoryError::Auth(message);
        }
        return DirectoryError::Api { status, message };
    }

    if status == 401 || status == 403 {
        return DirectoryError::Auth(body.to_string());
    }
    DirectoryError::Api {
        status,
        message: body.to_string(),
    }
}
