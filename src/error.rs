use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    /// Storage-level uniqueness was violated. Only reachable through a bug.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Export error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

impl Error {
    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::BadRequest(_)
            | Error::Validation(_)
            | Error::InvalidParticipant(_) => "validation_error",
            Error::NotFound(_) | Error::SessionNotFound(_) => "not_found",
            Error::Conflict(_) => "conflict",
            Error::StoreUnavailable(_) => "store_unavailable",
            Error::Reqwest(_) => "upstream_error",
            _ => "internal_error",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::StoreUnavailable(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let kind = self.kind();
        let retryable = self.is_retryable();
        let (status, error_message) = match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::InvalidParticipant(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Error::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Error::SessionNotFound(id) => (StatusCode::NOT_FOUND, format!("Session {} not found", id)),
            Error::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            Error::Conflict(msg) => {
                tracing::error!(error = %msg, "attendance store uniqueness violated");
                (StatusCode::INTERNAL_SERVER_ERROR, "Attendance record conflict".to_string())
            }
            Error::Database(err) => {
                tracing::error!(error = ?err, "database error");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
            Error::Reqwest(err) => (StatusCode::BAD_GATEWAY, format!("External service error: {}", err)),
            Error::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            Error::Xlsx(err) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Export error: {}", err)),
            Error::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An unexpected error occurred".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
            "kind": kind,
            "retryable": retryable,
        }));
        (status, body).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Error::NotFound("Resource not found".to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Error::StoreUnavailable(err.to_string())
            }
            sqlx::Error::Io(io) => Error::StoreUnavailable(io.to_string()),
            sqlx::Error::Database(ref db) if db.code().as_deref() == Some("23505") => {
                Error::Conflict(db.message().to_string())
            }
            other => Error::Database(other),
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}
