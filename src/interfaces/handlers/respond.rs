use std::collections::HashMap;

use actix_web::{http::StatusCode, HttpResponse};
use serde::Serialize;
use serde_json::Value;

use crate::{
    domain::validation::Record,
    entities::envelope::{Envelope, ErrorCode},
};

/// HTTP status for a failed envelope's code. Failures without a code are
/// internal.
pub fn status_for(code: Option<ErrorCode>) -> StatusCode {
    match code {
        Some(ErrorCode::Validation) => StatusCode::BAD_REQUEST,
        Some(ErrorCode::Unauthorized) => StatusCode::UNAUTHORIZED,
        Some(ErrorCode::Forbidden) => StatusCode::FORBIDDEN,
        Some(ErrorCode::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorCode::Conflict) => StatusCode::CONFLICT,
        Some(ErrorCode::BackendUnavailable) => StatusCode::SERVICE_UNAVAILABLE,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn respond<T: Serialize>(envelope: Envelope<T>) -> HttpResponse {
    respond_with(StatusCode::OK, envelope)
}

pub fn created<T: Serialize>(envelope: Envelope<T>) -> HttpResponse {
    respond_with(StatusCode::CREATED, envelope)
}

fn respond_with<T: Serialize>(success_status: StatusCode, envelope: Envelope<T>) -> HttpResponse {
    let status = if envelope.is_success() {
        success_status
    } else {
        status_for(envelope.code)
    };
    HttpResponse::build(status).json(envelope)
}

/// Query-string parameters as a record for the validator, which coerces
/// numeric and boolean strings itself.
pub fn query_record(params: HashMap<String, String>) -> Record {
    params
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect()
}
