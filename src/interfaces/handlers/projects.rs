use std::collections::HashMap;

use actix_web::{delete, get, patch, post, web, Responder};
use serde_json::Value;

use crate::handlers::respond::{created, query_record, respond};
use crate::use_cases::extractors::AdminClaims;
use crate::use_cases::projects::Audience;
use crate::AppState;

type Query = web::Query<HashMap<String, String>>;

#[get("")]
#[tracing::instrument(skip(state))]
pub async fn list_projects(state: web::Data<AppState>, query: Query) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.project_handler.list_projects(&query, Audience::Public).await)
}

#[get("/featured")]
#[tracing::instrument(skip(state))]
pub async fn featured_projects(state: web::Data<AppState>, query: Query) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.project_handler.get_featured_projects(&query).await)
}

#[get("/category/{category}")]
#[tracing::instrument(skip(state))]
pub async fn projects_by_category(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: Query,
) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.project_handler.get_projects_by_category(&path, &query).await)
}

#[get("/search")]
#[tracing::instrument(skip(state))]
pub async fn search_projects(state: web::Data<AppState>, query: Query) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.project_handler.search_projects(&query).await)
}

#[get("/stats")]
pub async fn project_stats(state: web::Data<AppState>) -> impl Responder {
    respond(state.project_handler.get_project_stats().await)
}

#[get("/id/{id}")]
#[tracing::instrument(skip(state))]
pub async fn project_by_id(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    respond(state.project_handler.get_project_by_id(&path, Audience::Public).await)
}

#[get("/slug/{slug}")]
#[tracing::instrument(skip(state))]
pub async fn project_by_slug(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    respond(state.project_handler.get_project_by_slug(&path, Audience::Public).await)
}

#[get("/id/{id}/images")]
#[tracing::instrument(skip(state))]
pub async fn project_images(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    respond(state.project_handler.list_project_images(&path, Audience::Public).await)
}

// Admin

#[get("/projects")]
#[tracing::instrument(skip(state, _admin))]
pub async fn admin_list_projects(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    query: Query,
) -> impl Responder {
    let query = query_record(query.into_inner());
    respond(state.project_handler.list_projects(&query, Audience::Admin).await)
}

#[post("/projects")]
#[tracing::instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn create_project(
    admin: AdminClaims,
    state: web::Data<AppState>,
    body: web::Json<Value>,
) -> impl Responder {
    created(state.project_handler.create_project(body.into_inner()).await)
}

#[get("/projects/{id}")]
#[tracing::instrument(skip(state, _admin))]
pub async fn admin_project_by_id(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.project_handler.get_project_by_id(&path, Audience::Admin).await)
}

#[patch("/projects/{id}")]
#[tracing::instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn update_project(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    respond(state.project_handler.update_project(&path, body.into_inner()).await)
}

#[delete("/projects/{id}")]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.0.sub))]
pub async fn delete_project(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.project_handler.delete_project(&path).await)
}

#[get("/projects/{id}/images")]
#[tracing::instrument(skip(state, _admin))]
pub async fn admin_project_images(
    _admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.project_handler.list_project_images(&path, Audience::Admin).await)
}

#[post("/projects/{id}/images")]
#[tracing::instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn add_project_image(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> impl Responder {
    created(state.project_handler.add_project_image(&path, body.into_inner()).await)
}

#[delete("/projects/{id}/images/{image_id}")]
#[tracing::instrument(skip(state, admin), fields(admin = %admin.0.sub))]
pub async fn delete_project_image(
    admin: AdminClaims,
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> impl Responder {
    let (project_id, image_id) = path.into_inner();
    respond(state.project_handler.delete_project_image(&project_id, &image_id).await)
}
