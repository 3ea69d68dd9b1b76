//! Error types for mpr-web
//!
//! Response bodies keep the texts the browser frontend already shows:
//! plain text for form submission failures, `{"message": ...}` JSON for the
//! status endpoint.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Registration without a photo part, or with an empty filename (400)
    #[error("Erro: Foto não enviada ou arquivo inválido.")]
    MissingPhoto,

    /// Malformed request body (400)
    #[error("{0}")]
    BadRequest(String),

    /// Record not found (404, JSON message)
    #[error("{0}")]
    NotFound(String),

    /// Photo could not be written; raw error text is exposed (500)
    #[error("Erro ao salvar a foto: {0}")]
    PhotoSave(String),

    /// Store document could not be written (500)
    #[error("Erro ao salvar os dados: {0}")]
    Storage(String),

    /// Internal server error (500)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingPhoto | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PhotoSave(_) | ApiError::Storage(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        match self {
            ApiError::NotFound(message) => (status, Json(json!({ "message": message }))).into_response(),
            other => (status, other.to_string()).into_response(),
        }
    }
}

impl From<mpr_common::Error> for ApiError {
    fn from(err: mpr_common::Error) -> Self {
        use mpr_common::Error;

        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::Validation(msg) => ApiError::BadRequest(msg),
            Error::Storage(msg) => ApiError::Storage(msg),
            Error::Io(e) => ApiError::Storage(e.to_string()),
            Error::Json(e) => ApiError::Storage(e.to_string()),
            Error::Config(msg) => ApiError::Internal(msg),
        }
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingPhoto.into_response().status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::NotFound("x".into()).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::PhotoSave("disk full".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_photo_save_exposes_raw_error() {
        let err = ApiError::PhotoSave("Permission denied (os error 13)".into());
        assert_eq!(err.to_string(), "Erro ao salvar a foto: Permission denied (os error 13)");
    }

    #[test]
    fn test_common_not_found_maps_to_404() {
        let err: ApiError = mpr_common::Error::NotFound("record 9".into()).into();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
