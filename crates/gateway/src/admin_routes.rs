//! Operator CRUD over the allow-lists.
//!
//! Unlike the webhook surface there is no callback-URL indirection here, so
//! failures propagate as ordinary structured HTTP errors.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use chanlog_access::{Error as AccessError, IdKind};

use crate::state::AppState;

const fn list_key(kind: IdKind) -> &'static str {
    match kind {
        IdKind::User => "allowed_users",
        IdKind::Channel => "allowed_channels",
    }
}

const fn body_field(kind: IdKind) -> &'static str {
    match kind {
        IdKind::User => "user_id",
        IdKind::Channel => "channel_id",
    }
}

const fn noun(kind: IdKind) -> &'static str {
    match kind {
        IdKind::User => "User",
        IdKind::Channel => "Channel",
    }
}

pub async fn list_users(State(state): State<AppState>) -> Response {
    list(state, IdKind::User).await
}

pub async fn list_channels(State(state): State<AppState>) -> Response {
    list(state, IdKind::Channel).await
}

pub async fn add_user(State(state): State<AppState>, Json(body): Json<serde_json::Value>) -> Response {
    add(state, IdKind::User, &body).await
}

pub async fn add_channel(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    add(state, IdKind::Channel, &body).await
}

pub async fn remove_user(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    remove(state, IdKind::User, &id).await
}

pub async fn remove_channel(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    remove(state, IdKind::Channel, &id).await
}

/// Combined snapshot of both allow-lists.
pub async fn status(State(state): State<AppState>) -> Response {
    let users = match state.allow_lists.list(IdKind::User).await {
        Ok(users) => users,
        Err(e) => return internal_error(&e),
    };
    let channels = match state.allow_lists.list(IdKind::Channel).await {
        Ok(channels) => channels,
        Err(e) => return internal_error(&e),
    };
    Json(serde_json::json!({
        "user_count": users.len(),
        "channel_count": channels.len(),
        "allowed_users": users,
        "allowed_channels": channels,
    }))
    .into_response()
}

async fn list(state: AppState, kind: IdKind) -> Response {
    match state.allow_lists.list(kind).await {
        Ok(items) => Json(serde_json::json!({
            "count": items.len(),
            list_key(kind): items,
        }))
        .into_response(),
        Err(e) => internal_error(&e),
    }
}

async fn add(state: AppState, kind: IdKind, body: &serde_json::Value) -> Response {
    let field = body_field(kind);
    let Some(id) = body.get(field).and_then(serde_json::Value::as_str) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": format!("{field} is required") })),
        )
            .into_response();
    };

    match state.allow_lists.add(kind, id).await {
        Ok(()) => mutation_ok(state, kind, id, "added").await,
        Err(e @ AccessError::InvalidFormat { .. }) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

async fn remove(state: AppState, kind: IdKind, id: &str) -> Response {
    match state.allow_lists.remove(kind, id).await {
        Ok(()) => mutation_ok(state, kind, id, "removed").await,
        Err(AccessError::NotFound { .. }) => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "error": format!("{} {id} not found", noun(kind)),
            })),
        )
            .into_response(),
        Err(e) => internal_error(&e),
    }
}

/// Successful mutations echo the updated list back to the operator.
async fn mutation_ok(state: AppState, kind: IdKind, id: &str, verb: &str) -> Response {
    match state.allow_lists.list(kind).await {
        Ok(items) => Json(serde_json::json!({
            "success": true,
            "message": format!("{} {id} {verb} successfully", noun(kind)),
            list_key(kind): items,
        }))
        .into_response(),
        Err(e) => internal_error(&e),
    }
}

fn internal_error(e: &AccessError) -> Response {
    tracing::error!(error = %e, "allow-list operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": e.to_string() })),
    )
        .into_response()
}
