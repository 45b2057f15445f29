use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Authentication token missing")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "MISSING_TOKEN",
            AuthError::InvalidToken(_) => "INVALID_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::Unauthorized(_) => "UNAUTHORIZED",
            AuthError::Forbidden(_) => "FORBIDDEN",
        }
    }
}

/// Failure reported by the hosted database. `code`, `details` and `hint`
/// mirror the PostgREST error body when one was returned.
#[derive(Error, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[error("Database error: {message}")]
pub struct DatabaseError {
    pub message: String,
    #[serde(skip)]
    pub status: Option<u16>,
    pub code: Option<String>,
    pub details: Option<String>,
    pub hint: Option<String>,
}

impl DatabaseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
            .filter(|s| *s >= 400)
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Auth(#[from] AuthError),

    #[error("Bad Request: {message}")]
    BadRequest {
        message: String,
        context: Option<Value>,
    },

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            context: None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(e) => e.status_code(),
            AppError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_body(&self) -> Value {
        match self {
            AppError::Auth(e) => json!({ "type": "AuthError", "code": e.code() }),
            AppError::BadRequest { context, .. } => json!({ "type": "AppError", "context": context }),
            AppError::Validation(details) => json!({ "type": "ValidationError", "details": details }),
            AppError::NotFound(_) => json!({ "type": "NotFound" }),
            AppError::Conflict(_) => json!({ "type": "Conflict" }),
            AppError::Database(e) => json!({
                "type": "DatabaseError",
                "code": e.code,
                "details": e.details,
                "hint": e.hint,
            }),
            AppError::ExternalService(_) => json!({ "type": "ExternalServiceError" }),
            AppError::Internal(_) => json!({ "type": "InternalError" }),
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Auth(e) => e.to_string(),
            AppError::BadRequest { message, .. } => message.clone(),
            AppError::Validation(_) => "Validation failed".to_string(),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ExternalService(msg) => msg.clone(),
            AppError::Database(e) => e.message.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        } else {
            tracing::warn!("Request failed: {}: {}", status, self);
        }

        let body = ApiResponse::<Value>::failure(self.public_message(), self.error_body());

        (status, Json(body)).into_response()
    }
}
