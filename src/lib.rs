//! Patchbay is a content-based telemetry routing transport.
//!
//! It intercepts outbound telemetry envelopes (error events and trace
//! transactions), inspects each event's content, and forwards it to one of
//! several registered backend projects chosen by ordered content-matching
//! rules — so heterogeneous error traffic from a single application can be
//! partitioned across separate projects without touching application code.
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution (run, init, validate).
//! - [`classify`] -- Minimal-extraction classifier pulling routing
//!   attributes out of serialized event payloads.
//! - [`config`] -- Routes-file loading, validation, and the built-in
//!   fallback route list.
//! - [`demo`] -- REST endpoints that synthesize sample errors to
//!   demonstrate routing end-to-end.
//! - [`envelope`] -- Envelope/item model and ingest wire serialization.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`health`] -- `GET /health` endpoint handler returning runtime
//!   diagnostics.
//! - [`logging`] -- Structured tracing setup with JSON and pretty output.
//! - [`routing`] -- Ordered first-match-wins route table.
//! - [`server`] -- Axum server setup, shared state, HTTP client, and
//!   graceful shutdown.
//! - [`transport`] -- The routing transport itself: per-destination
//!   senders, the concurrent sender cache, and the orchestrator.

// Binary crate — public functions are internal, not consumed by external users.
#![allow(clippy::missing_errors_doc)]

pub mod classify;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod demo;
pub mod envelope;
pub mod error;
pub mod health;
pub mod logging;
pub mod routing;
pub mod server;
pub mod transport;
