//! Note record handlers.
//!
//! All four operations live on `/notes`; the note id travels in the JSON
//! body, not the path.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tracing::debug;

use technotes_core::NotePayload;

use crate::error::ApiError;
use crate::AppState;

/// Malformed or untyped JSON is treated as an empty payload, so it fails the
/// same field checks as a body with nothing in it. Other rejections, such as
/// an oversized body, keep their own status.
fn payload_or_empty(
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<NotePayload, ApiError> {
    match body {
        Ok(Json(payload)) => Ok(payload),
        Err(
            rejection @ (JsonRejection::JsonSyntaxError(_)
            | JsonRejection::JsonDataError(_)
            | JsonRejection::MissingJsonContentType(_)),
        ) => {
            debug!(subsystem = "api", error = %rejection, "Unreadable note payload");
            Ok(NotePayload::default())
        }
        Err(rejection) => Err(ApiError::Rejected(rejection)),
    }
}

/// GET /notes
pub async fn list_notes(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let notes = state.notes.list().await?;
    Ok(Json(notes))
}

/// POST /notes
pub async fn create_note(
    State(state): State<AppState>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.notes.create(&payload_or_empty(body)?).await?;
    Ok((StatusCode::CREATED, Json(confirmation)))
}

/// PATCH /notes
pub async fn update_note(
    State(state): State<AppState>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.notes.update(&payload_or_empty(body)?).await?;
    Ok(Json(confirmation))
}

/// DELETE /notes
///
/// Answers with a bare JSON string rather than a `{message}` object.
pub async fn delete_note(
    State(state): State<AppState>,
    body: Result<Json<NotePayload>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let confirmation = state.notes.delete(&payload_or_empty(body)?).await?;
    Ok(Json(confirmation.message))
}
