//! Error types for the classifier and its API responses

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, loading, or running the classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to download '{filename}' from '{repo_id}': {message}")]
    Download {
        repo_id: String,
        filename: String,
        message: String,
    },

    #[error("download of '{filename}' from '{repo_id}' timed out after {timeout_secs}s")]
    DownloadTimeout {
        repo_id: String,
        filename: String,
        timeout_secs: u64,
    },

    #[error("failed to load model from {path:?}: {message}")]
    Load { path: PathBuf, message: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("model is not loaded")]
    NotReady,

    #[error("invalid model state transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    NotReady,
    InvalidRequest(JsonRejection),
    Unprocessable(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotReady => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Classifier not loaded".to_string(),
            ),
            ApiError::InvalidRequest(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Unprocessable(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            timestamp: chrono::Utc::now(),
        });

        (status, body).into_response()
    }
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::NotReady => ApiError::NotReady,
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest(rejection)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    timestamp: chrono::DateTime<chrono::Utc>,
}
