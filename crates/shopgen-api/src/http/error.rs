//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use shopgen_types::error::{
    ConfigurationError, DispatchError, KnowledgeError, RetrievalError, ValidationError,
};

use crate::http::response::ApiResponse;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Hard failures from `generate`.
    Dispatch(DispatchError),
    /// Explicit knowledge operations (upload, search, delete).
    Knowledge(KnowledgeError),
    /// Request body or path failed validation.
    Validation(String),
    /// Generic internal error.
    Internal(String),
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        AppError::Dispatch(e)
    }
}

impl From<KnowledgeError> for AppError {
    fn from(e: KnowledgeError) -> Self {
        AppError::Knowledge(e)
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl AppError {
    /// HTTP status and machine-readable code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Dispatch(DispatchError::Validation(_))
            | AppError::Knowledge(KnowledgeError::Validation(_))
            | AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Dispatch(DispatchError::Configuration(ConfigurationError::UnknownSkill(_))) => {
                (StatusCode::NOT_FOUND, "SKILL_NOT_FOUND")
            }
            AppError::Dispatch(DispatchError::Configuration(_)) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "CONFIGURATION_ERROR")
            }
            AppError::Dispatch(DispatchError::Cancelled) => {
                (StatusCode::REQUEST_TIMEOUT, "REQUEST_CANCELLED")
            }
            AppError::Knowledge(KnowledgeError::Retrieval(RetrievalError::DocumentNotFound(_))) => {
                (StatusCode::NOT_FOUND, "DOCUMENT_NOT_FOUND")
            }
            AppError::Knowledge(KnowledgeError::Retrieval(RetrievalError::EmptyDocument)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Knowledge(KnowledgeError::Retrieval(_)) => {
                (StatusCode::BAD_GATEWAY, "RETRIEVAL_ERROR")
            }
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::Dispatch(e) => e.to_string(),
            AppError::Knowledge(e) => e.to_string(),
            AppError::Validation(msg) | AppError::Internal(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!(code, error = %message, "Request failed");
        } else {
            tracing::debug!(code, error = %message, "Request rejected");
        }

        let body = ApiResponse::<()>::error(code, message, uuid::Uuid::now_v7().to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                AppError::from(DispatchError::from(ValidationError::EmptyField("message".into()))),
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
            ),
            (
                AppError::from(DispatchError::from(ConfigurationError::UnknownSkill("x".into()))),
                StatusCode::NOT_FOUND,
                "SKILL_NOT_FOUND",
            ),
            (
                AppError::from(DispatchError::from(ConfigurationError::UnknownModel("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
                "CONFIGURATION_ERROR",
            ),
            (
                AppError::from(DispatchError::Cancelled),
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_CANCELLED",
            ),
            (
                AppError::from(KnowledgeError::from(RetrievalError::Embedding("down".into()))),
                StatusCode::BAD_GATEWAY,
                "RETRIEVAL_ERROR",
            ),
            (
                AppError::from(KnowledgeError::from(RetrievalError::DocumentNotFound("d".into()))),
                StatusCode::NOT_FOUND,
                "DOCUMENT_NOT_FOUND",
            ),
        ];
        for (err, status, code) in cases {
            assert_eq!(err.status_and_code(), (status, code), "{err:?}");
        }
    }
}
