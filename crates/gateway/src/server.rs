use std::sync::Arc;

use {
    axum::{
        Router,
        response::{IntoResponse, Json},
        routing::{delete, get, post},
    },
    tower_http::cors::{Any, CorsLayer},
    tracing::info,
};

use {
    chanlog_access::{AccessGate, AllowListStore, IdKind},
    chanlog_archive::ArtifactStore,
    chanlog_config::ChanlogConfig,
    chanlog_export::ExportPipeline,
    chanlog_slack::{ResponseUrlNotifier, SlackClient},
};

use crate::{admin_routes, download_routes, state::AppState, webhook_routes};

/// Build the gateway router (shared between production startup and tests).
pub fn build_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/slack/events/export-channel",
            post(webhook_routes::export_channel),
        )
        .route(
            "/slack/events/export-replies",
            post(webhook_routes::export_replies),
        )
        .route("/download/{token}", get(download_routes::download))
        .route(
            "/admin/users",
            get(admin_routes::list_users).post(admin_routes::add_user),
        )
        .route("/admin/users/{id}", delete(admin_routes::remove_user))
        .route(
            "/admin/channels",
            get(admin_routes::list_channels).post(admin_routes::add_channel),
        )
        .route("/admin/channels/{id}", delete(admin_routes::remove_channel))
        .route("/admin/status", get(admin_routes::status))
        .layer(cors)
        .with_state(state)
}

/// Start the gateway HTTP server and run until shutdown.
pub async fn start_gateway(config: &ChanlogConfig) -> anyhow::Result<()> {
    let token = config.slack.bot_token.clone().ok_or_else(|| {
        anyhow::anyhow!("no Slack bot token configured (set SLACK_BOT_TOKEN or [slack] bot_token)")
    })?;

    let allow_lists = Arc::new(AllowListStore::open(config.access_dir())?);
    // Explicit seeding at process start; populated records are untouched.
    let seeded_users = allow_lists
        .seed_if_empty(IdKind::User, &config.access.seed_users)
        .await?;
    let seeded_channels = allow_lists
        .seed_if_empty(IdKind::Channel, &config.access.seed_channels)
        .await?;
    if seeded_users + seeded_channels > 0 {
        info!(seeded_users, seeded_channels, "seeded allow-lists from config");
    }

    let artifacts = Arc::new(ArtifactStore::new(config.exports_dir()));
    let pipeline = Arc::new(ExportPipeline::new(
        AccessGate::new(Arc::clone(&allow_lists)),
        Arc::clone(&artifacts),
        Arc::new(SlackClient::new(token)),
        Arc::new(ResponseUrlNotifier::new()),
        config.server.public_url(),
    ));

    let app = build_app(AppState {
        allow_lists,
        artifacts,
        pipeline,
    });

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, public_url = %config.server.public_url(), "chanlog gateway listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// Liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy", "service": "chanlog" }))
}
