//! `patchbay run` — start the demo server with the routing transport.
//!
//! Loads the route table once (file or built-in fallback), builds the
//! shared HTTP client and routing transport, and serves the demo
//! endpoints until Ctrl+C / SIGTERM. On shutdown the transport is closed,
//! which closes every cached destination sender.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::cli::RunArgs;
use crate::config;
use crate::error::PatchbayError;
use crate::logging;
use crate::server::{self, AppState, Stats};
use crate::transport::{RoutingTransport, Transport};

pub async fn execute(args: RunArgs) -> Result<(), PatchbayError> {
    let log_format = logging::resolve_format(args.pretty, args.json);
    logging::init(&args.log_level, log_format);

    let loaded = config::load_with_fallback(args.config.as_deref()).await;
    let table = Arc::new(loaded.config.compile()?);

    let transport = Arc::new(RoutingTransport::new(
        Arc::clone(&table),
        server::build_http_client(),
    ));

    let state = Arc::new(AppState {
        transport: Arc::clone(&transport),
        table: Arc::clone(&table),
        route_source: loaded.source.to_string(),
        start_time: Instant::now(),
        stats: Stats::new(),
    });

    let router = server::build_router(state, args.max_body);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        routes = table.len(),
        default_project = %table.default_route().name,
        source = %loaded.source,
        "patchbay started"
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(server::shutdown_signal())
        .await?;

    // Single-owner shutdown: in-flight demo sends have completed by now
    transport.flush(Duration::from_secs(2)).await;
    transport.close(false).await;

    tracing::info!("patchbay stopped");
    Ok(())
}
