//! Wire types for inbound change notifications.
//!
//! `NotificationEnvelope` is the CloudEvents-shaped outer object delivered
//! by the event fabric. Its `data` field is carried opaque and decoded on
//! demand into a [`ChangeNotification`] via [`NotificationEnvelope::change_notification`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, ParseError};

/// Outer wire object for a notification delivered by the event fabric.
///
/// Only `type` is required on the wire: an envelope without a discriminator
/// cannot be routed and is rejected at parse time. An envelope with an
/// empty discriminator parses fine and is skipped by the dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEnvelope {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event type discriminator, e.g. `Microsoft.Graph.UserUpdated`.
    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,

    /// MIME content type of the `data` field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,

    /// Opaque payload; shape varies by `event_type`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl NotificationEnvelope {
    /// Parse a raw request body into an envelope.
    ///
    /// Fails when the body is not well-formed JSON or the `type`
    /// discriminator field is missing.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        serde_json::from_slice(body).map_err(|e| ParseError::Malformed(e.to_string()))
    }

    /// Decode the `data` field into a typed change notification.
    ///
    /// Returns `Ok(None)` when `data` is absent. A present but mis-shaped
    /// payload is a contract violation and fails with [`DecodeError`],
    /// propagated to the caller rather than swallowed here.
    pub fn change_notification(&self) -> Result<Option<ChangeNotification>, DecodeError> {
        match &self.data {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| DecodeError::Shape(e.to_string())),
        }
    }
}

/// Inner payload describing what entity changed and how.
///
/// Field set mirrors the directory service's change-notification record;
/// everything is optional on the wire.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNotification {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_expiration_date_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_type: Option<String>,

    /// Relative path to the affected entity, e.g. `users/{id}`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifecycle_event: Option<String>,
}

impl ChangeNotification {
    /// The affected entity's id, extracted from `resource`.
    pub fn entity_id(&self) -> Option<&str> {
        self.resource.as_deref().and_then(resource_entity_id)
    }
}

/// Extract the entity id from a `"<collection>/<id>"` resource path.
///
/// The extraction rule is: split on `/` and take the second segment,
/// with no validation of the overall shape. Paths with extra segments
/// still yield whatever occupies that position.
pub fn resource_entity_id(resource: &str) -> Option<&str> {
    resource.split('/').nth(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope_json(event_type: &str, data: serde_json::Value) -> String {
        serde_json::json!({
            "id": "evt-1",
            "type": event_type,
            "source": "/tenants/contoso",
            "specversion": "1.0",
            "data": data,
        })
        .to_string()
    }

    #[test]
    fn test_parse_full_envelope() {
        let body = envelope_json(
            "Microsoft.Graph.UserUpdated",
            serde_json::json!({ "resource": "users/abc-123" }),
        );
        let envelope = NotificationEnvelope::parse(body.as_bytes()).unwrap();
        assert_eq!(envelope.event_type, "Microsoft.Graph.UserUpdated");
        assert_eq!(envelope.id.as_deref(), Some("evt-1"));
        assert!(envelope.data.is_some());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        let err = NotificationEnvelope::parse(b"{not json").unwrap_err();
        assert!(matches!(err, ParseError::Malformed(_)));
    }

    #[test]
    fn test_parse_rejects_missing_discriminator() {
        let body = serde_json::json!({ "id": "evt-1", "data": {} }).to_string();
        let err = NotificationEnvelope::parse(body.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_parse_accepts_empty_discriminator() {
        let body = serde_json::json!({ "type": "" }).to_string();
        let envelope = NotificationEnvelope::parse(body.as_bytes()).unwrap();
        assert_eq!(envelope.event_type, "");
    }

    #[test]
    fn test_change_notification_absent_data_is_none() {
        let body = serde_json::json!({ "type": "Microsoft.Graph.UserDeleted" }).to_string();
        let envelope = NotificationEnvelope::parse(body.as_bytes()).unwrap();
        assert!(envelope.change_notification().unwrap().is_none());
    }

    #[test]
    fn test_change_notification_mis_shaped_data_fails() {
        let body = envelope_json("Microsoft.Graph.UserDeleted", serde_json::json!(42));
        let envelope = NotificationEnvelope::parse(body.as_bytes()).unwrap();
        let err = envelope.change_notification().unwrap_err();
        assert!(matches!(err, DecodeError::Shape(_)));
    }

    #[test]
    fn test_change_notification_roundtrip_through_data() {
        let change = ChangeNotification {
            subscription_id: Some("sub-1".to_string()),
            resource: Some("users/abc-123".to_string()),
            change_type: Some("updated".to_string()),
            ..Default::default()
        };
        let body = envelope_json(
            "Microsoft.Graph.UserUpdated",
            serde_json::to_value(&change).unwrap(),
        );
        let envelope = NotificationEnvelope::parse(body.as_bytes()).unwrap();
        let decoded = envelope.change_notification().unwrap().unwrap();
        assert_eq!(decoded.resource, change.resource);
        assert_eq!(decoded.subscription_id, change.subscription_id);
    }

    #[test]
    fn test_resource_entity_id_extraction_rule() {
        assert_eq!(resource_entity_id("users/abc-123"), Some("abc-123"));
        // No validation of segment count: index 1 is whatever is there
        assert_eq!(resource_entity_id("users/abc-123/photo"), Some("abc-123"));
        assert_eq!(resource_entity_id("users"), None);
        assert_eq!(resource_entity_id(""), None);
    }

    #[test]
    fn test_entity_id_uses_resource_path() {
        let change = ChangeNotification {
            resource: Some("users/abc-123".to_string()),
            ..Default::default()
        };
        assert_eq!(change.entity_id(), Some("abc-123"));
        assert_eq!(ChangeNotification::default().entity_id(), None);
    }
}
