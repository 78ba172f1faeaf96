//! Webhook endpoint handlers.
//!
//! One route, two behaviors: the OPTIONS validation responder for the
//! event fabric's abuse-protection handshake, and the POST intake that
//! parses, dispatches, and always acknowledges. Processing failures are
//! logged and never surfaced as an error status -- a permanently
//! malformed notification must not trigger the fabric's retry storm.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{HeaderMap, HeaderName, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use gridhook_types::notification::NotificationEnvelope;

use crate::state::AppState;

/// Abuse-protection request headers sent by the event fabric.
const REQUEST_ORIGIN: &str = "webhook-request-origin";
const REQUEST_RATE: &str = "webhook-request-rate";

/// Response headers granting the requested origin and rate.
const ALLOWED_ORIGIN: HeaderName = HeaderName::from_static("webhook-allowed-origin");
const ALLOWED_RATE: HeaderName = HeaderName::from_static("webhook-allowed-rate");

/// OPTIONS /notifications - abuse-protection validation handshake.
///
/// The event fabric sends the host that will emit events and a requested
/// delivery rate; echoing them back authorizes delivery. Absent or empty
/// request headers produce no response headers at all (not empty-valued
/// ones).
pub async fn validate(headers: HeaderMap) -> Response {
    let mut response = StatusCode::OK.into_response();

    if let Some(origin) = non_empty_header(&headers, REQUEST_ORIGIN) {
        response.headers_mut().insert(ALLOWED_ORIGIN, origin);
    }
    if let Some(rate) = non_empty_header(&headers, REQUEST_RATE) {
        response.headers_mut().insert(ALLOWED_RATE, rate);
    }

    response
}

/// POST /notifications - notification intake.
///
/// Parses the envelope, dispatches it, and responds 202 regardless of
/// processing outcome. The only non-202 answer is a 400 for a body that
/// cannot be parsed into an envelope at all.
pub async fn receive(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let request_id = Uuid::now_v7();

    let envelope = match NotificationEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(%request_id, error = %e, "rejecting malformed notification body");
            return StatusCode::BAD_REQUEST;
        }
    };

    tracing::info!(
        %request_id,
        event_type = %envelope.event_type,
        notification_id = envelope.id.as_deref().unwrap_or(""),
        "received notification"
    );

    // One notification's failure must never affect another or the
    // acknowledgment: log-and-continue is the whole fault policy.
    match state.dispatcher.dispatch(&envelope).await {
        Ok(outcome) => {
            tracing::info!(%request_id, ?outcome, "notification processed");
        }
        Err(e) => {
            tracing::error!(%request_id, error = %e, "error processing notification");
        }
    }

    StatusCode::ACCEPTED
}

fn non_empty_header(headers: &HeaderMap, name: &str) -> Option<HeaderValue> {
    headers.get(name).filter(|value| !value.is_empty()).cloned()
}
