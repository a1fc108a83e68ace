use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MAX_FILES_PER_REQUEST: usize = 10;
pub const PUBLIC_URL_PREFIX: &str = "/uploads";

pub const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "video/mp4",
    "video/webm",
    "video/ogg",
    "model/gltf+json",
    "model/gltf-binary",
    "application/octet-stream",
];

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Upload {
    pub id: u64,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: String,
    pub uploaded_by: Option<u64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadInsert {
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub path: String,
    pub uploaded_by: Option<u64>,
}

/// A file received from a client and parked on local disk until stored.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub original_name: String,
    pub declared_mime: Option<String>,
    pub size: u64,
    pub temp_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadResponse {
    pub id: u64,
    pub filename: String,
    pub original_name: String,
    pub mime_type: String,
    pub size: u64,
    pub url: String,
    pub uploaded_by: Option<u64>,
    pub created_at: DateTime<Utc>,
}

impl From<Upload> for UploadResponse {
    fn from(upload: Upload) -> Self {
        UploadResponse {
            url: public_url(&upload.filename),
            id: upload.id,
            filename: upload.filename,
            original_name: upload.original_name,
            mime_type: upload.mime_type,
            size: upload.size,
            uploaded_by: upload.uploaded_by,
            created_at: upload.created_at,
        }
    }
}

pub fn public_url(filename: &str) -> String {
    format!("{}/{}", PUBLIC_URL_PREFIX, filename)
}
