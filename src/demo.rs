//! Demo REST endpoints that synthesize sample telemetry.
//!
//! Each handler builds the kind of serialized event a telemetry SDK would
//! emit for a failing request, pushes it through the routing transport, and
//! returns a small JSON body describing what was triggered. Delivery is
//! fire-and-forget from the endpoint's point of view: send failures are
//! counted and logged but the HTTP response is returned regardless.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use uuid::Uuid;

use crate::envelope::{Envelope, EnvelopeItem, ItemKind};
use crate::server::AppState;
use crate::transport::Transport;

fn event_payload(
    event_id: Uuid,
    tags: &BTreeMap<String, String>,
    exception_type: &str,
    message: &str,
) -> Vec<u8> {
    serde_json::json!({
        "event_id": event_id.simple().to_string(),
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "level": "error",
        "platform": "rust",
        "tags": tags,
        "exception": {
            "values": [{"type": exception_type, "value": message}]
        },
        "message": {"formatted": message},
    })
    .to_string()
    .into_bytes()
}

async fn dispatch(state: &AppState, event_id: Uuid, kind: ItemKind, payload: Vec<u8>) {
    let envelope = Envelope::new(Some(event_id), vec![EnvelopeItem::new(kind, payload)]);

    match state.transport.send(envelope).await {
        Ok(()) => {
            state.stats.sent.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(error = %e, "demo event delivery failed");
        }
    }
}

fn tag_map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn reply(status: StatusCode, error: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({"error": error, "message": message})),
    )
        .into_response()
}

pub async fn gateway_error(State(state): State<Arc<AppState>>) -> Response {
    let tags = tag_map(&[
        ("status", "502"),
        ("gateway", "true"),
        ("error_type", "gateway"),
    ]);
    let event_id = Uuid::new_v4();
    let payload = event_payload(
        event_id,
        &tags,
        "BadGatewayException",
        "Upstream service returned 502 Bad Gateway",
    );
    dispatch(&state, event_id, ItemKind::Event, payload).await;

    reply(
        StatusCode::BAD_GATEWAY,
        "Bad Gateway",
        "Gateway error routed to appropriate project",
    )
}

pub async fn internal_error(State(state): State<Arc<AppState>>) -> Response {
    let tags = tag_map(&[
        ("status", "500"),
        ("internal", "true"),
        ("error_type", "internal"),
    ]);
    let event_id = Uuid::new_v4();
    let payload = event_payload(
        event_id,
        &tags,
        "InternalServerException",
        "Database connection failed with 500 Internal Server Error",
    );
    dispatch(&state, event_id, ItemKind::Event, payload).await;

    reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "Internal error routed to appropriate project",
    )
}

pub async fn generic_error(State(state): State<Arc<AppState>>) -> Response {
    let tags = tag_map(&[("error_type", "generic"), ("status", "400")]);
    let event_id = Uuid::new_v4();
    let payload = event_payload(
        event_id,
        &tags,
        "RuntimeException",
        "Generic application error occurred",
    );
    dispatch(&state, event_id, ItemKind::Event, payload).await;

    reply(
        StatusCode::BAD_REQUEST,
        "Generic Error",
        "Generic error routed to default project",
    )
}

pub async fn custom_error(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HashMap<String, String>>,
) -> Response {
    let error_type = request.get("type").map_or("generic", String::as_str);
    let message = request
        .get("message")
        .map_or("Custom error occurred", String::as_str);

    let (exception_type, message) = match error_type.to_lowercase().as_str() {
        "gateway" => (
            "BadGatewayException",
            format!("Custom gateway error: {message}"),
        ),
        "internal" => (
            "InternalServerException",
            format!("Custom internal error: {message}"),
        ),
        _ => ("RuntimeException", format!("Custom error: {message}")),
    };

    // Every body pair becomes a tag, mirroring how an SDK scope would be set
    let tags: BTreeMap<String, String> = request
        .iter()
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    let event_id = Uuid::new_v4();
    let payload = event_payload(event_id, &tags, exception_type, &message);
    dispatch(&state, event_id, ItemKind::Event, payload).await;

    reply(
        StatusCode::BAD_REQUEST,
        "Custom Error",
        &format!("Custom error with {} tags", tags.len()),
    )
}

pub async fn transaction_test(State(state): State<Arc<AppState>>) -> Response {
    let event_id = Uuid::new_v4();
    let payload = serde_json::json!({
        "event_id": event_id.simple().to_string(),
        "type": "transaction",
        "transaction": "test-transaction",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "tags": {
            "gateway": "true",
            "transaction_type": "api_call",
        },
    })
    .to_string()
    .into_bytes();
    dispatch(&state, event_id, ItemKind::Transaction, payload).await;

    reply(
        StatusCode::OK,
        "success",
        "Transaction sent for routing test",
    )
}
