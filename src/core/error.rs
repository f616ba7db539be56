use axum::{
    extract::rejection::BytesRejection,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::modules::store::StoreError;
use crate::shared::types::ApiResponse;
use crate::shared::validation::ValidationFailure;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Store configuration is missing.")]
    ConfigurationMissing,

    /// Store failure; the store's own message is passed to the caller
    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after_secs: i64,
    },

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Payload is too large.")]
    PayloadTooLarge,
}

pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid JSON payload.";

impl From<BytesRejection> for AppError {
    fn from(rejection: BytesRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            tracing::debug!("Failed to read request body: {}", rejection.body_text());
            AppError::BadRequest(INVALID_PAYLOAD_MESSAGE.to_string())
        }
    }
}

impl From<ValidationFailure> for AppError {
    fn from(failure: ValidationFailure) -> Self {
        AppError::Validation(failure.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut retry_after = None;

        let (status, message) = match self {
            AppError::ConfigurationMissing => {
                tracing::error!("Request rejected: store configuration is missing");
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }
            AppError::Store(ref e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::RateLimited {
                message,
                retry_after_secs,
            } => {
                retry_after = Some(retry_after_secs);
                (StatusCode::TOO_MANY_REQUESTS, message)
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
        };

        let mut response = (status, Json(ApiResponse::<()>::error(message))).into_response();

        if let Some(secs) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }

        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_sets_retry_after() {
        let response = AppError::RateLimited {
            message: "Too many posts. Try again in 12s.".to_string(),
            retry_after_secs: 12,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "12");
    }

    #[test]
    fn test_store_error_passes_message_through() {
        let response = AppError::Store(StoreError::Rejected {
            status: 503,
            message: "connection refused".to_string(),
        })
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }

    #[test]
    fn test_validation_failure_keeps_message() {
        let err: AppError = ValidationFailure::ContentTooLong("Comment is too long.").into();
        assert_eq!(err.to_string(), "Comment is too long.");
    }
}
