use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shelf_core::access::AccessDenied;
use shelf_core::error::AppError;

use crate::dto::ErrorResponse;

/// Message sent in place of any server-side failure detail.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

/// Handler error, so we can implement `IntoResponse` for `AppError`.
pub enum ApiError {
    App(AppError),
    /// Request body could not be read or decoded as JSON.
    Body(JsonRejection),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::App(err) => app_error_response(err),
            ApiError::Body(rejection) => {
                let status = rejection.status();
                tracing::debug!(%status, reason = %rejection.body_text(), "Rejected request body");

                if status == StatusCode::PAYLOAD_TOO_LARGE {
                    error_response(status, "payload_too_large", "Request body too large.")
                } else {
                    error_response(
                        StatusCode::BAD_REQUEST,
                        "validation_error",
                        "Request body must be valid JSON.",
                    )
                }
            }
        }
    }
}

fn app_error_response(err: AppError) -> Response {
    let (status, error_type) = match &err {
        AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
        AppError::Conflict(_) => (StatusCode::BAD_REQUEST, "conflict"),
        AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        AppError::Authentication(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
        AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        AppError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "database_error"),
        AppError::ConfigError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
        AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    if err.is_internal() {
        tracing::error!(error = %err, "Request failed");
        return error_response(status, error_type, INTERNAL_ERROR_MESSAGE);
    }

    error_response(status, error_type, &err.to_string())
}

/// Response for a request stopped by the access gate. Never reaches a handler.
pub struct AccessError(pub AccessDenied);

impl From<AccessDenied> for AccessError {
    fn from(denied: AccessDenied) -> Self {
        Self(denied)
    }
}

impl IntoResponse for AccessError {
    fn into_response(self) -> Response {
        let status = if self.0.is_forbidden() {
            StatusCode::FORBIDDEN
        } else {
            StatusCode::UNAUTHORIZED
        };

        error_response(status, self.0.code(), &self.0.to_string())
    }
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: &str) -> Response {
    let body = ErrorResponse {
        error: error.to_string(),
        message: message.to_string(),
    };

    (status, axum::Json(body)).into_response()
}
