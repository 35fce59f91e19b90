//! HTTP mapping for the `AppError` taxonomy.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use op_core::error::AppError;
use serde_json::json;
use std::fmt;

/// Newtype carrying `AppError` across the actix boundary.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    fn kind(&self) -> &'static str {
        match self.0 {
            AppError::NotFound(_, _) => "not_found",
            AppError::Validation(_) => "validation",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Conflict(_) => "conflict",
            AppError::Internal(_) => "internal",
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

/// Unexpected persistence failures: logged in full, surfaced generically.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        log::error!("infrastructure failure: {err:#}");
        ApiError(AppError::Internal("internal service error".to_string()))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            AppError::NotFound(_, _) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.kind(),
            "message": self.0.to_string(),
        }))
    }
}
