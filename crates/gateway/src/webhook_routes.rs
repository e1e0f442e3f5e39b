use std::{collections::HashMap, sync::Arc};

use {
    axum::{Form, extract::State, response::Response},
    tracing::debug,
};

use chanlog_export::{ExportKind, ExportRequest};

use crate::state::AppState;

/// Trigger a channel-history export.
pub async fn export_channel(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    handle(state, &form, ExportKind::History)
}

/// Trigger a thread-replies export.
pub async fn export_replies(
    State(state): State<AppState>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    handle(state, &form, ExportKind::Replies)
}

/// Common slash-command handling.
///
/// The chat platform disallows slow or non-200 synchronous responses, so this
/// always answers 200: diagnostic text when the payload is missing a field,
/// an empty body otherwise. The pipeline is spawned and keeps running after
/// the response has been returned; its outcome reaches the requester through
/// the response URL.
fn handle(state: AppState, form: &HashMap<String, String>, kind: ExportKind) -> Response {
    use axum::response::IntoResponse;

    match ExportRequest::from_form(form) {
        Ok(request) => {
            let pipeline = Arc::clone(&state.pipeline);
            tokio::spawn(async move {
                pipeline.run(request, kind).await;
            });
            ().into_response()
        },
        Err(e) => {
            debug!(field = e.field, ?kind, "malformed slash-command payload");
            e.to_string().into_response()
        },
    }
}
