use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, HttpRequest, Responder};
use serde_json::Value;

use crate::handlers::respond::{created, query_record, respond};
use crate::use_cases::extractors::AdminClaims;
use crate::utils::get_client_ip::contact_provenance;
use crate::AppState;

#[post("")]
#[tracing::instrument(skip(state, req, body))]
pub async fn submit_message(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> impl Responder {
    let provenance = contact_provenance(&req, state.trust_x_forwarded_for);
    created(state.contact_handler.submit_message(body.into_inner(), provenance).await)
}

#[get("/contact")]
#[tracing::instrument(skip(state, _admin))]
pub async fn list_messages(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.contact_handler.list_messages(&query).await)
}

#[get("/contact/unread")]
#[tracing::instrument(skip(state, _admin))]
pub async fn unread_messages(_admin: AdminClaims, state: web::Data<AppState>) -> impl Responder {
    respond(state.contact_handler.list_unread_messages().await)
}

#[get("/contact/{id}")]
#[tracing::instrument(skip(state, _admin))]
pub async fn get_message(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.contact_handler.get_message(&path).await)
}

#[patch("/contact/{id}/status")]
#[tracing::instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn update_status(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    respond(state.contact_handler.update_status(&path, body.into_inner()).await)
}

#[delete("/contact/{id}")]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.0.sub))]
pub async fn delete_message(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.contact_handler.delete_message(&path).await)
}
