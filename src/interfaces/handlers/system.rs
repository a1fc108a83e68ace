use actix_web::{get, web, HttpResponse, Responder};
use humantime::format_duration;
use chrono::Utc;
use std::time::Duration;
use serde::Serialize;

use crate::{constants::START_TIME, AppState};

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    pub success: bool,
    pub status: &'static str,
    pub database: &'static str,
    pub uptime: String,
    pub timestamp: String,
    pub start_at: String,
    pub version: &'static str,
}

/// Liveness plus a database round trip. Answers 503 while the database is
/// unreachable.
#[get("/health")]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let now_utc = Utc::now();
    let uptime_secs = now_utc.signed_duration_since(*START_TIME).num_seconds().max(0) as u64;

    let database_ok = match state.database.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Health check database ping failed: {}", e);
            false
        }
    };

    let response = HealthCheckResponse {
        success: database_ok,
        status: if database_ok { "OK" } else { "degraded" },
        database: if database_ok { "connected" } else { "unavailable" },
        uptime: format_duration(Duration::from_secs(uptime_secs)).to_string(),
        timestamp: now_utc.to_rfc3339(),
        start_at: START_TIME.to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
    };

    if database_ok {
        HttpResponse::Ok().json(response)
    } else {
        HttpResponse::ServiceUnavailable().json(response)
    }
}
