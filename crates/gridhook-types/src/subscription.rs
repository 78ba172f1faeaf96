//! Directory-service entities: the change subscription and the user record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A standing registration with the directory service requesting it push
/// change notifications for a watched resource to a callback destination.
///
/// The entity is owned by the remote service; this system only holds the
/// `id` long enough to issue renewal calls. `id` is `None` on a create
/// request and assigned by the service in the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Comma-separated set of watched change kinds, e.g. `"updated,deleted,created"`.
    pub change_type: String,

    /// Watched collection, e.g. `"users"`.
    pub resource: String,

    pub notification_url: String,

    pub lifecycle_notification_url: String,

    /// Shared secret echoed back on each notification. Carried on create;
    /// deliberately not verified on the inbound path in this system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,

    pub expiration_date_time: DateTime<Utc>,
}

/// A user record as returned by the directory service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_principal_name: Option<String>,
}
