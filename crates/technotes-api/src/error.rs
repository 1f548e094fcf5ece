//! HTTP error mapping.
//!
//! Status codes by error kind:
//!
//! | Kind | Status |
//! |------|--------|
//! | validation | 400 |
//! | user not found | 400 |
//! | note not found | 404 |
//! | duplicate title | 409 |
//! | no notes | 400 |
//! | store failure | 500 |
//!
//! Body rejections other than malformed JSON keep the extractor's status
//! (413 for an oversized body).
//!
//! Bodies are `{"message": ...}`. Store failures are logged and answered with
//! a generic message.

use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};

use technotes_core::{Error, ErrorKind};

#[derive(Debug)]
pub enum ApiError {
    Internal(Error),
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unavailable(String),
    Rejected(JsonRejection),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err.kind() {
            ErrorKind::Validation | ErrorKind::EmptyResult => ApiError::BadRequest(err.to_string()),
            ErrorKind::NotFound => match err {
                // Unknown owner is a bad request, unknown note is a 404.
                Error::UserNotFound(_) => ApiError::BadRequest(err.to_string()),
                _ => ApiError::NotFound(err.to_string()),
            },
            ErrorKind::Conflict => ApiError::Conflict(err.to_string()),
            ErrorKind::Store => ApiError::Internal(err),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Rejected(rejection) => rejection.status(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(err) => {
                tracing::error!(subsystem = "api", error = %err, "Request failed");
                "Internal server error.".to_string()
            }
            ApiError::Rejected(rejection) => rejection.body_text(),
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unavailable(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = vec![
            (Error::MissingFields, StatusCode::BAD_REQUEST),
            (Error::MissingNoteId, StatusCode::BAD_REQUEST),
            (Error::UserNotFound("x".into()), StatusCode::BAD_REQUEST),
            (Error::NoteNotFound("x".into()), StatusCode::NOT_FOUND),
            (Error::DuplicateTitle("x".into()), StatusCode::CONFLICT),
            (Error::NoNotesFound, StatusCode::BAD_REQUEST),
            (
                Error::Database(sqlx::Error::PoolTimedOut),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            let label = format!("{:?}", err);
            assert_eq!(ApiError::from(err).status(), expected, "{}", label);
        }
    }

    #[test]
    fn test_internal_message_is_generic() {
        let response = ApiError::from(Error::Database(sqlx::Error::PoolTimedOut)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
