use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

use chanlog_archive::Error as ArchiveError;

use crate::state::AppState;

/// Single-use artifact download.
///
/// The artifact is deleted as soon as the stream has been served (or the
/// client disconnects), so refreshing the link yields 404.
pub async fn download(State(state): State<AppState>, Path(token): Path<String>) -> Response {
    match state.artifacts.retrieve(&token).await {
        Ok(download) => {
            let headers = [
                (header::CONTENT_TYPE, download.content_type().to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.token()),
                ),
            ];
            (headers, Body::from_stream(download)).into_response()
        },
        Err(ArchiveError::InvalidToken { .. }) => {
            (StatusCode::BAD_REQUEST, "Invalid filename").into_response()
        },
        Err(ArchiveError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, "File not found").into_response()
        },
        Err(e) => {
            tracing::error!(error = %e, "download failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "Download failed").into_response()
        },
    }
}
