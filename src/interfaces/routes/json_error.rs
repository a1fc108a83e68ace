use actix_web::{
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
    http::StatusCode,
    web,
};

use crate::handlers::json_error::json_error;

/// Extractor failures answer with the same failure body as the use cases.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        let message = json_message(&err);
        tracing::debug!("Rejected JSON body: {}", err);
        InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, &message)).into()
    }));

    cfg.app_data(web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req| {
        let message = format!("Invalid query string: {}", err);
        InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, &message)).into()
    }));

    cfg.app_data(web::PathConfig::default().error_handler(|err: PathError, _req| {
        let message = format!("Invalid path parameter: {}", err);
        InternalError::from_response(err, json_error(StatusCode::BAD_REQUEST, &message)).into()
    }));
}

fn json_message(err: &JsonPayloadError) -> String {
    match err {
        JsonPayloadError::ContentType => "Content-Type must be application/json".to_string(),
        JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
            "Request body is too large".to_string()
        }
        JsonPayloadError::Deserialize(e) if e.is_data() => format!("Invalid request body: {}", e),
        _ => "Invalid JSON in request body".to_string(),
    }
}
