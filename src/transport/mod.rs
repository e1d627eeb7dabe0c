//! Content-based routing transport.
//!
//! [`RoutingTransport`] is the outbound transport handed to the host
//! telemetry client: every envelope it receives is classified
//! ([`classify`](crate::classify)), matched against the route table
//! ([`routing`](crate::routing)), and forwarded through the per-destination
//! sender obtained from the [`cache`]. Submodules handle credential parsing
//! and HTTP delivery ([`sender`]) and the concurrent sender cache
//! ([`cache`]).

pub mod cache;
pub mod sender;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::classify;
use crate::envelope::{Envelope, ItemKind};
use crate::error::PatchbayError;
use crate::routing::{Route, RouteTable};
use crate::server::HttpClient;
use cache::SenderCache;
use sender::mask_dsn;

/// Outbound-transport capability contract, as the host telemetry client
/// sees it. The host owns batching, retry, and backpressure policy; this
/// boundary is best-effort delivery only.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, envelope: Envelope) -> Result<(), PatchbayError>;
    async fn flush(&self, timeout: Duration);
    async fn close(&self, is_restarting: bool);
}

pub struct RoutingTransport {
    table: Arc<RouteTable>,
    cache: SenderCache,
}

impl RoutingTransport {
    #[must_use]
    pub fn new(table: Arc<RouteTable>, client: HttpClient) -> Self {
        tracing::debug!(routes = table.len(), "routing transport initialized");
        Self {
            table,
            cache: SenderCache::new(client),
        }
    }

    #[must_use]
    pub fn sender_count(&self) -> usize {
        self.cache.len()
    }

    /// Pick the destination route for an envelope from its first item.
    /// Events and transactions are classified by content; any other item
    /// kind (and an empty envelope) goes straight to the default project.
    #[must_use]
    pub fn destination_for(&self, envelope: &Envelope) -> &Route {
        let Some(item) = envelope.items.first() else {
            return self.table.default_route();
        };

        match &item.kind {
            ItemKind::Event | ItemKind::Transaction => {
                let attrs = classify::classify(&item.payload);
                let route = self.table.select(&attrs);
                tracing::debug!(
                    kind = item.kind.as_str(),
                    project = %route.name,
                    "envelope matched project"
                );
                route
            }
            ItemKind::Other(kind) => {
                tracing::debug!(kind = %kind, "non-event telemetry routed to default project");
                self.table.default_route()
            }
        }
    }
}

#[async_trait]
impl Transport for RoutingTransport {
    async fn send(&self, envelope: Envelope) -> Result<(), PatchbayError> {
        let route = self.destination_for(&envelope);
        let sender = self.cache.get_or_create(&route.dsn)?;

        sender.send(&envelope).await?;
        tracing::info!(
            project = %route.name,
            destination = %mask_dsn(&route.dsn),
            "envelope sent"
        );
        Ok(())
    }

    async fn flush(&self, timeout: Duration) {
        tracing::debug!("flushing all cached senders");
        self.cache.flush_all(timeout);
    }

    async fn close(&self, is_restarting: bool) {
        tracing::info!(is_restarting, "closing routing transport");
        self.cache.close_all();
    }
}
