use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use core_types::ValidationErrors;
use database::DbError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Payload failed field-level checks; nothing was written.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// Storage refused the write because of a uniqueness or foreign-key constraint.
    #[error("Rejected: {0}")]
    Rejected(String),
    /// The request could not be decoded (bad JSON, bad query string, bad path).
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(#[from] DbError),
}

impl AppError {
    /// Maps a failed write to the message a client should see.
    ///
    /// Constraint rejections become `Rejected` with either the `duplicate` or the
    /// `invalid` message (foreign-key and check failures). Callers that must not
    /// reveal which of the two happened pass the same text for both. Anything
    /// else stays a database error.
    pub fn from_write(err: DbError, duplicate: &str, invalid: &str) -> Self {
        match err {
            DbError::UniqueViolation { ref constraint } => {
                tracing::warn!(constraint = %constraint, "Write rejected: duplicate.");
                AppError::Rejected(duplicate.to_string())
            }
            DbError::ForeignKeyViolation { ref constraint } => {
                tracing::warn!(constraint = %constraint, "Write rejected: missing reference.");
                AppError::Rejected(invalid.to_string())
            }
            DbError::CheckViolation { ref constraint } => {
                tracing::warn!(constraint = %constraint, "Write rejected: check constraint.");
                AppError::Rejected(invalid.to_string())
            }
            other => AppError::Database(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": "Validation failed", "fields": errors.errors }),
            ),
            AppError::Rejected(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, json!({ "error": message })),
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "An internal database error occurred" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn validation_lists_fields() {
        let err = AppError::from(ValidationErrors::single("rating", "rating must be between 1 and 5"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(body["fields"][0]["field"], "rating");
    }

    #[tokio::test]
    async fn duplicates_and_missing_references_can_share_a_message() {
        let generic = "Registration failed or already exists";
        for db_err in [
            DbError::UniqueViolation {
                constraint: "registrations_student_event_key".to_string(),
            },
            DbError::ForeignKeyViolation {
                constraint: "registrations_event_id_fkey".to_string(),
            },
        ] {
            let (status, body) = render(AppError::from_write(db_err, generic, generic)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], generic);
        }
    }

    #[tokio::test]
    async fn distinct_messages_when_asked_for() {
        let err = AppError::from_write(
            DbError::ForeignKeyViolation {
                constraint: "students_college_id_fkey".to_string(),
            },
            "A student with this email already exists",
            "College does not exist",
        );
        let (_, body) = render(err).await;
        assert_eq!(body["error"], "College does not exist");
    }

    #[tokio::test]
    async fn unexpected_failures_hide_details() {
        let err = AppError::from_write(DbError::NotFound, "dup", "missing");
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal database error occurred");
    }
}
