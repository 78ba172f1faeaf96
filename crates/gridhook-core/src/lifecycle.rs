//! Subscription lifecycle manager.
//!
//! The subscription exists remotely or not at all; no local state is kept
//! across calls. Startup runs [`SubscriptionManager::ensure_subscription`]
//! once; renewal-required notifications drive [`SubscriptionManager::renew`]
//! with the id they carry.

use std::sync::Arc;

use chrono::{Duration, Utc};

use gridhook_types::config::AppSettings;
use gridhook_types::error::DirectoryError;
use gridhook_types::subscription::Subscription;

use crate::directory::DirectoryService;

/// Change kinds watched on the subscription.
pub const SUBSCRIPTION_CHANGE_TYPE: &str = "updated,deleted,created";

/// Collection watched for changes.
pub const SUBSCRIPTION_RESOURCE: &str = "users";

/// How far into the future each create/renew pushes the expiration.
///
/// Deliberately short so the renewal path gets exercised often; a
/// production deployment would use the service's maximum and renew
/// proactively instead of relying solely on the push signal.
fn subscription_window() -> Duration {
    Duration::hours(1)
}

/// Result of the startup subscription check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The service already has at least one subscription registered.
    AlreadyExists { id: Option<String> },
    /// No subscription existed; one was created.
    Created { id: Option<String> },
}

/// Manages the create-on-startup / renew-on-signal subscription lifecycle
/// against the remote directory service.
pub struct SubscriptionManager<D: DirectoryService> {
    directory: Arc<D>,
    settings: Arc<AppSettings>,
}

impl<D: DirectoryService> SubscriptionManager<D> {
    pub fn new(directory: Arc<D>, settings: Arc<AppSettings>) -> Self {
        Self {
            directory,
            settings,
        }
    }

    /// Make sure a change subscription exists, creating one if needed.
    ///
    /// Policy: any non-empty list result counts as "already subscribed".
    /// The first returned subscription is assumed to be ours; no id or
    /// resource matching is performed. A stricter deployment would persist
    /// the created id and match against it.
    ///
    /// Callers run this once at startup and must not block on failure:
    /// errors are returned for logging, never propagated into request
    /// handling.
    pub async fn ensure_subscription(&self) -> Result<EnsureOutcome, DirectoryError> {
        let existing = self.directory.list_subscriptions().await?;
        if let Some(first) = existing.first() {
            tracing::info!(id = ?first.id, "subscription already exists");
            return Ok(EnsureOutcome::AlreadyExists {
                id: first.id.clone(),
            });
        }

        tracing::info!("no existing subscription found");

        let destination = self.settings.event_grid_destination();
        let request = Subscription {
            id: None,
            change_type: SUBSCRIPTION_CHANGE_TYPE.to_string(),
            resource: SUBSCRIPTION_RESOURCE.to_string(),
            notification_url: destination.clone(),
            lifecycle_notification_url: destination,
            client_state: Some(self.settings.client_state.clone()),
            expiration_date_time: Utc::now() + subscription_window(),
        };

        let created = self.directory.create_subscription(&request).await?;
        tracing::info!(id = ?created.id, "created new subscription");
        tracing::info!(
            topic = %self.settings.partner_topic,
            "activate the partner topic in the cloud portal and create an event subscription to start receiving notifications"
        );

        Ok(EnsureOutcome::Created { id: created.id })
    }

    /// Extend the named subscription's expiration by one window from now.
    ///
    /// The id comes from the renewal-required notification itself, so this
    /// works even if it arrives before the startup check has completed.
    /// No retry; the caller logs failures.
    pub async fn renew(&self, subscription_id: &str) -> Result<(), DirectoryError> {
        let expires = Utc::now() + subscription_window();
        self.directory
            .renew_subscription(subscription_id, expires)
            .await?;
        tracing::info!(id = %subscription_id, "subscription renewed for another hour");
        Ok(())
    }
}
