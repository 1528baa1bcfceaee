//! HTTP error mapping. Every failure leaves the API as `{error, code}` JSON.

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lagar_core::error::CoreError;
use lagar_pipeline::ControllerError;
use serde::Serialize;

const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by every handler and extractor.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed path or query input.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of a failed request.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl From<ControllerError> for AppError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::Core(core) => AppError::Core(core),
            ControllerError::Store(db) => AppError::Database(db),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl AppError {
    fn status_and_body(&self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: format!("{entity} with id {id} not found"),
                    code: "NOT_FOUND",
                },
            ),
            AppError::Core(CoreError::Conflict(msg)) => (
                StatusCode::CONFLICT,
                ErrorBody {
                    error: msg.clone(),
                    code: "CONFLICT",
                },
            ),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: msg.clone(),
                    code: "BAD_REQUEST",
                },
            ),
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    error: "Resource not found".to_string(),
                    code: "NOT_FOUND",
                },
            ),
            AppError::Database(err) => {
                // Store details stay in the server log.
                tracing::error!(error = %err, "Database error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: INTERNAL_MESSAGE.to_string(),
                        code: "INTERNAL_ERROR",
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}
