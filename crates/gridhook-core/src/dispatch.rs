//! Change dispatcher: routes inbound envelopes by event type.
//!
//! Every dispatch yields an explicit [`DispatchOutcome`] or a
//! [`DispatchError`]; the webhook boundary logs either and always
//! acknowledges, so one failing notification can never affect another
//! or trigger the event fabric's retry storm.

use std::sync::Arc;

use gridhook_types::error::DispatchError;
use gridhook_types::notification::{NotificationEnvelope, resource_entity_id};

use crate::directory::DirectoryService;
use crate::lifecycle::SubscriptionManager;

/// A watched user was created or updated.
pub const USER_UPDATED: &str = "Microsoft.Graph.UserUpdated";

/// A watched user was permanently deleted.
pub const USER_DELETED: &str = "Microsoft.Graph.UserDeleted";

/// The subscription's authorization is about to lapse and must be extended.
pub const SUBSCRIPTION_REAUTHORIZATION_REQUIRED: &str =
    "Microsoft.Graph.SubscriptionReauthorizationRequired";

/// What dispatching a single notification did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The user was resolved against the directory service.
    UserUpserted {
        id: Option<String>,
        display_name: Option<String>,
    },

    /// The lookup came back not-found: the user was removed between the
    /// change occurring and our lookup. Inferred, not announced.
    UserSoftDeleted { id: Option<String> },

    /// The user was permanently deleted; no lookup is possible or attempted.
    UserDeleted { id: Option<String> },

    /// The named subscription's expiration was extended.
    SubscriptionRenewed { subscription_id: String },

    /// Acknowledged without action.
    Skipped(SkipReason),
}

/// Why a notification was acknowledged without action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The envelope carried an empty type discriminator.
    EmptyType,
    /// Unrecognized type; unknown notification kinds must not fail the
    /// webhook (forward compatibility).
    UnknownType,
    /// The envelope had no `data` payload to act on.
    MissingPayload,
    /// The change record carried no `resource` path.
    MissingResource,
    /// A renewal signal without a subscription id.
    MissingSubscriptionId,
}

/// Routes envelopes to user-change handling or subscription renewal.
pub struct ChangeDispatcher<D: DirectoryService> {
    directory: Arc<D>,
    lifecycle: Arc<SubscriptionManager<D>>,
}

impl<D: DirectoryService> ChangeDispatcher<D> {
    pub fn new(directory: Arc<D>, lifecycle: Arc<SubscriptionManager<D>>) -> Self {
        Self {
            directory,
            lifecycle,
        }
    }

    /// Route one envelope by its type discriminator (case-insensitive).
    ///
    /// Errors are the caller's to log; they must not alter the HTTP
    /// acknowledgment.
    pub async fn dispatch(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<DispatchOutcome, DispatchError> {
        let event_type = envelope.event_type.as_str();
        if event_type.is_empty() {
            return Ok(DispatchOutcome::Skipped(SkipReason::EmptyType));
        }

        if event_type.eq_ignore_ascii_case(USER_UPDATED) {
            self.handle_user_updated(envelope).await
        } else if event_type.eq_ignore_ascii_case(USER_DELETED) {
            self.handle_user_deleted(envelope)
        } else if event_type.eq_ignore_ascii_case(SUBSCRIPTION_REAUTHORIZATION_REQUIRED) {
            self.handle_renewal(envelope).await
        } else {
            Ok(DispatchOutcome::Skipped(SkipReason::UnknownType))
        }
    }

    /// The notification only carries the user's resource path; resolve the
    /// full record from the directory service. A not-found answer means
    /// the user was soft-deleted in the meantime.
    async fn handle_user_updated(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(change) = envelope.change_notification()? else {
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingPayload));
        };
        let Some(resource) = change.resource.as_deref() else {
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingResource));
        };

        match self.directory.get_user_by_path(resource).await {
            Ok(user) => {
                tracing::info!(
                    name = user.display_name.as_deref().unwrap_or("<unknown>"),
                    id = user.id.as_deref().unwrap_or("<unknown>"),
                    "user was created or updated"
                );
                Ok(DispatchOutcome::UserUpserted {
                    id: user.id,
                    display_name: user.display_name,
                })
            }
            Err(e) if e.is_not_found() => {
                let id = resource_entity_id(resource).map(str::to_string);
                tracing::info!(id = id.as_deref().unwrap_or("<unknown>"), "user was soft-deleted");
                Ok(DispatchOutcome::UserSoftDeleted { id })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The user is already gone; only the id from the resource path remains.
    fn handle_user_deleted(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(change) = envelope.change_notification()? else {
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingPayload));
        };
        let id = change.entity_id().map(str::to_string);
        tracing::info!(id = id.as_deref().unwrap_or("<unknown>"), "user was deleted");
        Ok(DispatchOutcome::UserDeleted { id })
    }

    async fn handle_renewal(
        &self,
        envelope: &NotificationEnvelope,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(change) = envelope.change_notification()? else {
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingPayload));
        };
        let Some(subscription_id) = change.subscription_id.clone() else {
            return Ok(DispatchOutcome::Skipped(SkipReason::MissingSubscriptionId));
        };

        self.lifecycle.renew(&subscription_id).await?;
        Ok(DispatchOutcome::SubscriptionRenewed { subscription_id })
    }
}
