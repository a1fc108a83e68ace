use serde::{Deserialize, Serialize};

use crate::errors::{AppError, FieldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCode {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    BackendUnavailable,
}

/// Uniform result of every data-access operation.
///
/// Successful envelopes carry `data` and optionally a `message`; failed ones
/// carry `error`, a `code` for every failure except internal ones, and the
/// per-field `details` of a validation failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Envelope {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            code: None,
            details: None,
        }
    }

    /// Builds a failed envelope. Internal and backend failures are logged
    /// with their cause and reported to the caller as `generic_message`.
    pub fn failure(err: AppError, generic_message: &str) -> Self {
        let code = err.code();
        let (error, details) = match err {
            AppError::ValidationError(errors) => ("Validation failed".to_string(), Some(errors)),
            AppError::InternalError(cause) | AppError::BackendUnavailable(cause) => {
                tracing::error!(cause = %cause, "{}", generic_message);
                (generic_message.to_string(), None)
            }
            other => (other.public_message(), None),
        };

        Envelope {
            success: false,
            data: None,
            message: None,
            error: Some(error),
            code,
            details,
        }
    }

    pub fn from_result(result: Result<T, AppError>, generic_message: &str) -> Self {
        match result {
            Ok(data) => Envelope::ok(data),
            Err(err) => Envelope::failure(err, generic_message),
        }
    }

    /// Attaches a message to a successful envelope; failures are left as they are.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        if self.success {
            self.message = Some(message.into());
        }
        self
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            message: self.message,
            error: self.error,
            code: self.code,
            details: self.details,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl Envelope<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn done(message: impl Into<String>) -> Self {
        Envelope {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
            code: None,
            details: None,
        }
    }

    pub fn from_unit(result: Result<(), AppError>, message: &str, generic_message: &str) -> Self {
        match result {
            Ok(()) => Envelope::done(message),
            Err(err) => Envelope::failure(err, generic_message),
        }
    }
}
