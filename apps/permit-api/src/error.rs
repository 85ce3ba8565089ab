//! Error types for the permit API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use permit_core::{ErrorCode, ErrorResponse, FieldError, SourceError};
use thiserror::Error;

/// API error types. Each maps to exactly one client-visible error code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid query parameters")]
    Validation(Vec<FieldError>),

    #[error("permitId must be a valid UUID")]
    InvalidPermitId(String),

    #[error("Permit with ID {0} not found")]
    PermitNotFound(String),

    #[error("The requested resource was not found")]
    RouteNotFound,

    #[error("{0}")]
    RateLimitExceeded(String),

    #[error("Internal server error - random occurrence")]
    InjectedFault,

    #[error("Permit source error: {0}")]
    Source(#[from] SourceError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidPermitId(_) => StatusCode::BAD_REQUEST,
            ApiError::PermitNotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InjectedFault | ApiError::Source(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidPermitId(_) => ErrorCode::ValidationError,
            ApiError::PermitNotFound(_) | ApiError::RouteNotFound => ErrorCode::NotFound,
            ApiError::RateLimitExceeded(_) => ErrorCode::RateLimitExceeded,
            ApiError::InjectedFault | ApiError::Source(_) | ApiError::Internal(_) => {
                ErrorCode::ServerError
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => {
                ErrorResponse::new(self.code(), self.to_string()).with_errors(errors.clone())
            }
            ApiError::Source(e) => {
                tracing::error!("Permit source error: {}", e);
                ErrorResponse::new(self.code(), "An unexpected error occurred")
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
                ErrorResponse::new(self.code(), "An unexpected error occurred")
            }
            _ => ErrorResponse::new(self.code(), self.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
