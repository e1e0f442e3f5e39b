//! Gateway: the HTTP surface of the exporter.
//!
//! Lifecycle:
//! 1. Load + validate config
//! 2. Open the allow-list store and seed empty records
//! 3. Wire the Slack collaborators into the export pipeline
//! 4. Serve webhooks, downloads, and the admin API
//!
//! Webhook handlers always acknowledge with 200 before the pipeline
//! finishes; export outcomes travel through the caller's response URL.

pub mod admin_routes;
pub mod download_routes;
pub mod server;
pub mod state;
pub mod webhook_routes;

pub use {
    server::{build_app, start_gateway},
    state::AppState,
};
