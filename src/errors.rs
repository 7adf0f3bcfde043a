//! Error handling for the web layer.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::auth::CredentialError;
use crate::srs::SrsError;
use crate::transfer::TransferError;

pub enum ApiError {
    SQLError(sqlx::Error),
    HTTPError(axum::http::Error),
    TemplateError(askama::Error),
    CredentialError(CredentialError),
    InvalidRating(SrsError),
    MalformedImport(TransferError),
    UserNotFoundOrUnauthorized,
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::SQLError(e) => {
                error!("SQL error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string()).into_response()
            }
            Self::HTTPError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("HTTP error: {e}"),
            )
                .into_response(),
            Self::TemplateError(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Template error: {e}"),
            )
                .into_response(),
            Self::CredentialError(e) => {
                error!("Credential store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Credential error".to_string(),
                )
                    .into_response()
            }
            Self::InvalidRating(e) => {
                (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response()
            }
            Self::MalformedImport(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
            Self::UserNotFoundOrUnauthorized => (
                StatusCode::UNAUTHORIZED,
                "User not found or unauthorized".to_string(),
            )
                .into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()).into_response(),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        Self::SQLError(e)
    }
}

impl From<axum::http::Error> for ApiError {
    fn from(e: axum::http::Error) -> Self {
        Self::HTTPError(e)
    }
}

impl From<askama::Error> for ApiError {
    fn from(e: askama::Error) -> Self {
        Self::TemplateError(e)
    }
}

impl From<CredentialError> for ApiError {
    fn from(e: CredentialError) -> Self {
        Self::CredentialError(e)
    }
}

impl From<SrsError> for ApiError {
    fn from(e: SrsError) -> Self {
        Self::InvalidRating(e)
    }
}

impl From<TransferError> for ApiError {
    fn from(e: TransferError) -> Self {
        Self::MalformedImport(e)
    }
}
