//! Errors returned by the account flows and their HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::auth::validator::PasswordRule;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid password: {}", .0.reason())]
    InvalidPassword(PasswordRule),

    #[error("invalid email")]
    InvalidEmail,

    #[error("invalid role: {0}")]
    InvalidRole(String),

    #[error("user already exists")]
    DuplicateUser,

    #[error("user not found")]
    UserNotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingField(_)
            | AuthError::InvalidPassword(_)
            | AuthError::InvalidEmail
            | AuthError::InvalidRole(_) => StatusCode::BAD_REQUEST,
            AuthError::DuplicateUser => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingField(_) => "MISSING_FIELD",
            AuthError::InvalidPassword(_) => "INVALID_PASSWORD",
            AuthError::InvalidEmail => "INVALID_EMAIL",
            AuthError::InvalidRole(_) => "INVALID_ROLE",
            AuthError::DuplicateUser => "DUPLICATE_USER",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if let AuthError::Internal(e) = &self {
            error!(error = ?e, "internal error");
        }
        let status = self.status();
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.to_string(),
            },
        };
        (status, Json(body)).into_response()
    }
}
