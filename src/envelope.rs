//! Telemetry envelope model and wire serialization.
//!
//! An [`Envelope`] holds one or more [`EnvelopeItem`]s (an error event, a
//! trace transaction, etc.) sent together to a backend. [`Envelope::to_wire`]
//! produces the newline-delimited ingest format: one envelope header line,
//! then per item a `{type, length}` header line followed by the item's raw
//! payload bytes.

use bytes::Bytes;
use uuid::Uuid;

/// Kind of a single envelope item, as declared in the item header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    Event,
    Transaction,
    /// Any other telemetry category the host client may emit (sessions,
    /// attachments, client reports, ...). Routed to the default project
    /// without content inspection.
    Other(String),
}

impl ItemKind {
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        match s {
            "event" => Self::Event,
            "transaction" => Self::Transaction,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Event => "event",
            Self::Transaction => "transaction",
            Self::Other(s) => s.as_str(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EnvelopeItem {
    pub kind: ItemKind,
    pub payload: Bytes,
}

impl EnvelopeItem {
    #[must_use]
    pub fn new(kind: ItemKind, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Envelope {
    pub event_id: Option<Uuid>,
    pub items: Vec<EnvelopeItem>,
}

impl Envelope {
    #[must_use]
    pub fn new(event_id: Option<Uuid>, items: Vec<EnvelopeItem>) -> Self {
        Self { event_id, items }
    }

    /// Serialize to the ingest wire format with a fresh `sent_at` timestamp.
    #[must_use]
    pub fn to_wire(&self) -> Bytes {
        self.to_wire_at(chrono::Utc::now())
    }

    // Timestamp injected for deterministic tests.
    fn to_wire_at(&self, sent_at: chrono::DateTime<chrono::Utc>) -> Bytes {
        let event_id = self
            .event_id
            .map_or_else(|| "unknown".to_string(), |id| id.simple().to_string());

        let header = serde_json::json!({
            "event_id": event_id,
            "sent_at": sent_at.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        });

        let mut buf = Vec::new();
        buf.extend_from_slice(header.to_string().as_bytes());
        buf.push(b'\n');

        for item in &self.items {
            let item_header = serde_json::json!({
                "type": item.kind.as_str(),
                "length": item.payload.len(),
            });
            buf.extend_from_slice(item_header.to_string().as_bytes());
            buf.push(b'\n');
            buf.extend_from_slice(&item.payload);
            buf.push(b'\n');
        }

        Bytes::from(buf)
    }
}
