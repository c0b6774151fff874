//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::StoreError;
use crate::services::PublishError;

/// Application-level error type for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Document store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Publishing operation failed.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Store(err) | Self::Publish(PublishError::Store(err)) => store_status(err),
            Self::Publish(PublishError::NotFound { .. }) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Publish(PublishError::InvalidName(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Publish(PublishError::AllocationExhausted { .. }) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Publish(PublishError::Store(_)) | Self::Internal(_)
        )
    }
}

const fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Conflict | StoreError::RetriesExhausted { .. } => StatusCode::CONFLICT,
        StoreError::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::ReadAfterWrite { .. } | StoreError::Serialization(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Store(StoreError::Conflict | StoreError::RetriesExhausted { .. })
            | Self::Publish(PublishError::Store(
                StoreError::Conflict | StoreError::RetriesExhausted { .. },
            )) => "Concurrent update, please retry".to_string(),
            Self::Store(_) | Self::Publish(PublishError::Store(_)) | Self::Internal(_) => {
                "Internal server error".to_string()
            }
            Self::Publish(PublishError::NotFound { .. }) => "Website not found".to_string(),
            Self::Publish(err) => err.to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
