use actix_web::{http::StatusCode, HttpResponse};
use serde_json::json;

/// Failure body for requests rejected before they reach a use case.
pub fn json_error(status: StatusCode, error: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "error": error,
    }))
}

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(json!({
        "success": false,
        "error": "Route not found",
        "code": "not-found",
    }))
}
