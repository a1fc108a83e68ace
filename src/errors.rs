use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use jsonwebtoken::errors::{ErrorKind, Error as JwtError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

use crate::entities::envelope::ErrorCode;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    BackendUnavailable(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BackendUnavailable(msg) => write!(f, "Backend unavailable: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Transport-agnostic code carried in envelopes. Internal failures have none.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            AppError::ValidationError(_) => Some(ErrorCode::Validation),
            AppError::NotFound(_) => Some(ErrorCode::NotFound),
            AppError::Conflict(_) => Some(ErrorCode::Conflict),
            AppError::Unauthorized(_) => Some(ErrorCode::Unauthorized),
            AppError::Forbidden(_) => Some(ErrorCode::Forbidden),
            AppError::BackendUnavailable(_) => Some(ErrorCode::BackendUnavailable),
            AppError::InternalError(_) => None,
        }
    }

    /// Message that is safe to show to a caller.
    pub fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(_) => "Validation failed".to_string(),
            AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::BackendUnavailable(_) => "Service temporarily unavailable".to_string(),
            AppError::InternalError(_) => "Internal server error".to_string(),
        }
    }

    pub fn validation(field: &str, message: &str) -> Self {
        AppError::ValidationError(vec![FieldError::new(field, message)])
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let mut body = serde_json::json!({
            "success": false,
            "error": self.public_message(),
        });
        if let Some(code) = self.code() {
            body["code"] = serde_json::json!(code);
        }
        if let AppError::ValidationError(errors) = self {
            body["details"] = serde_json::json!(errors);
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Vec<FieldError>> for AppError {
    fn from(errors: Vec<FieldError>) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string()),
                })
            })
            .collect();
        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                AppError::Conflict("Duplicate entry".into())
            }
            sqlx::Error::Database(e) if e.is_foreign_key_violation() => {
                AppError::Conflict("Foreign key violation".into())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                AppError::BackendUnavailable(format!("Database unavailable: {}", err))
            }
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(format!("IO error: {}", err))
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Clone, Display)]
pub enum AuthError {
    #[display("Invalid or expired token")]
    InvalidToken,

    #[display("Invalid credentials")]
    WrongCredentials,

    #[display("Token creation error")]
    TokenCreation,

    #[display("Token expired")]
    TokenExpired,

    #[display("Access token required")]
    MissingCredentials,

    #[display("Missing JWT service")]
    MissingJwtService,

    #[display("Forbidden: {_0}")]
    Forbidden(String),
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        let (message, code) = match self {
            AuthError::Forbidden(msg) => (msg.clone(), Some(ErrorCode::Forbidden)),
            AuthError::TokenCreation | AuthError::MissingJwtService => {
                ("Internal server error".to_string(), None)
            }
            _ => (self.to_string(), Some(ErrorCode::Unauthorized)),
        };
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({
                "success": false,
                "error": message,
                "code": code,
            }))
    }

    fn status_code(&self) -> StatusCode {
        match *self {
            AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::WrongCredentials => StatusCode::UNAUTHORIZED,
            AuthError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::TokenExpired => StatusCode::UNAUTHORIZED,
            AuthError::MissingCredentials => StatusCode::UNAUTHORIZED,
            AuthError::MissingJwtService => StatusCode::INTERNAL_SERVER_ERROR,
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl From<JwtError> for AuthError {
    fn from(e: JwtError) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Forbidden(msg) => AppError::Forbidden(msg),
            AuthError::TokenCreation | AuthError::MissingJwtService => {
                AppError::InternalError(err.to_string())
            }
            _ => AppError::Unauthorized(err.to_string()),
        }
    }
}

#[derive(Debug, Display)]
pub enum PasswordError {
    #[display("Invalid password parameters: {_0}")]
    InvalidParameters(String),

    #[display("Password hashing failed: {_0}")]
    HashingError(String),

    #[display("Invalid password hash format: {_0}")]
    InvalidHashFormat(String),

    #[display("Password verification failed: {_0}")]
    VerificationError(String),
}

impl std::error::Error for PasswordError {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldError {
            field: field.into(),
            message: message.into(),
        }
    }
}
