//! Error types for the image service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

// == App Error Enum ==
/// Unified error type for the image service.
///
/// `Clone` so a single settled fetch can be handed to every coalesced waiter.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// Required configuration is missing or unusable
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The user directory call failed (non-success status or transport failure)
    #[error("Upstream error{}: {message}", .status.map(|s| format!(" ({s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// An image could not be fetched or decoded
    #[error("Failed to load image from {locator}: {reason}")]
    AssetLoad { locator: String, reason: String },

    /// Caller-supplied input is malformed
    #[error("{0}")]
    Validation(String),

    /// Resource not found
    #[error("{0}")]
    NotFound(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for an upstream failure that never produced a status code.
    pub fn transport(message: impl Into<String>) -> Self {
        AppError::Upstream {
            status: None,
            message: message.into(),
        }
    }

    /// Shorthand for an asset load failure.
    pub fn asset(locator: impl Into<String>, reason: impl ToString) -> Self {
        AppError::AssetLoad {
            locator: locator.into(),
            reason: reason.to_string(),
        }
    }

    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream {
                status: Some(404), ..
            } => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Configuration(_) | AppError::AssetLoad { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Client errors carry their explanation; server errors stay generic
        let message = match &self {
            AppError::Validation(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::Upstream {
                status: Some(404), ..
            } => "User not found".to_string(),
            AppError::Upstream { .. } => {
                error!("{}", self);
                "Failed to reach the user directory".to_string()
            }
            _ => {
                error!("{}", self);
                "Internal server error".to_string()
            }
        };

        (status, message).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image service.
pub type Result<T> = std::result::Result<T, AppError>;
