use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{delete, get, post, web, Responder};

use crate::entities::upload::IncomingFile;
use crate::handlers::respond::{created, respond};
use crate::use_cases::extractors::AuthClaims;
use crate::AppState;

#[derive(Debug, MultipartForm)]
pub struct SingleUploadForm {
    pub file: Option<TempFile>,
}

#[derive(Debug, MultipartForm)]
pub struct MultipleUploadForm {
    #[multipart(rename = "files")]
    pub files: Vec<TempFile>,
}

/// The temp file stays owned by the form, so it lives until the request
/// finishes and is cleaned up if it was never moved into the store.
fn incoming(file: &TempFile) -> IncomingFile {
    IncomingFile {
        original_name: file.file_name.clone().unwrap_or_else(|| "upload".to_string()),
        declared_mime: file.content_type.as_ref().map(|mime| mime.to_string()),
        size: file.size as u64,
        temp_path: file.file.path().to_path_buf(),
    }
}

#[post("/single")]
#[tracing::instrument(skip(state, claims, form), fields(user = %claims.0.sub))]
pub async fn upload_single(
    claims: AuthClaims,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<SingleUploadForm>,
) -> impl Responder {
    let files: Vec<IncomingFile> = form.file.iter().map(incoming).collect();
    let envelope = state.upload_handler.upload_files(files, claims.0.user_id()).await;
    created(envelope.map(|uploads| uploads.into_iter().next()))
}

#[post("/multiple")]
#[tracing::instrument(skip(state, claims, form), fields(user = %claims.0.sub))]
pub async fn upload_multiple(
    claims: AuthClaims,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<MultipleUploadForm>,
) -> impl Responder {
    let files: Vec<IncomingFile> = form.files.iter().map(incoming).collect();
    created(state.upload_handler.upload_files(files, claims.0.user_id()).await)
}

#[get("")]
#[tracing::instrument(skip(state, _claims))]
pub async fn list_uploads(_claims: AuthClaims, state: web::Data<AppState>) -> impl Responder {
    respond(state.upload_handler.list_uploads().await)
}

#[delete("/{id}")]
#[tracing::instrument(skip(state, claims), fields(user = %claims.0.sub))]
pub async fn delete_upload(
    claims: AuthClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    respond(state.upload_handler.delete_upload(&path).await)
}
