use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::error::{AuthError, DomainError};

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Body extraction failure; keeps the extractor's status (400, 413, 415, 422).
    #[error("rejected request body: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

pub(crate) type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: String,
}

impl AppError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            AppError::Domain(err) => match err {
                DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
                DomainError::MissingFields => {
                    (StatusCode::BAD_REQUEST, "Please fill all fields".to_string())
                }
                DomainError::AlreadyExists(_) => (StatusCode::CONFLICT, err.to_string()),
                DomainError::InvalidCredentials => {
                    (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
                }
                DomainError::NotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
                DomainError::Upload(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Image upload failed".to_string(),
                ),
                DomainError::Persistence(_) | DomainError::Unexpected(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
                }
            },
            AppError::Auth(err) => {
                let message = match err {
                    AuthError::NoToken => "No authentication token, access denied",
                    AuthError::InvalidToken | AuthError::UserNotFound => "Token is not valid",
                };
                (StatusCode::UNAUTHORIZED, message.to_string())
            }
            AppError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Rejected { status, message } => (*status, message.clone()),
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        (status, Json(ErrorBody { message })).into_response()
    }
}
