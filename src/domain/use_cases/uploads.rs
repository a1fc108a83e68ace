use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    domain::validation::validate_id,
    entities::{
        envelope::Envelope,
        upload::{IncomingFile, Upload, UploadInsert, UploadResponse, ALLOWED_MIME_TYPES, MAX_FILES_PER_REQUEST},
    },
    errors::{AppError, FieldError},
    repositories::upload::UploadRepository,
    storage::file_store::FileStore,
};

const FALLBACK_MIME: &str = "application/octet-stream";
const MAX_EXTENSION_LEN: usize = 10;

pub struct UploadHandler<R, S>
where
    R: UploadRepository,
    S: FileStore,
{
    pub upload_repo: R,
    pub file_store: S,
    max_upload_bytes: u64,
}

impl<R, S> UploadHandler<R, S>
where
    R: UploadRepository,
    S: FileStore,
{
    pub fn new(upload_repo: R, file_store: S, max_upload_bytes: u64) -> Self {
        UploadHandler {
            upload_repo,
            file_store,
            max_upload_bytes,
        }
    }

    /// Stores every file or none of them: all checks run before the first
    /// file is moved into the store, and a failed insert rolls back the files
    /// already stored for the batch.
    pub async fn upload_files(
        &self,
        files: Vec<IncomingFile>,
        uploaded_by: Option<u64>,
    ) -> Envelope<Vec<UploadResponse>> {
        let count = files.len();
        Envelope::from_result(self.try_upload_files(files, uploaded_by).await, "Failed to upload files")
            .with_message(if count == 1 {
                "File uploaded successfully".to_string()
            } else {
                format!("{count} files uploaded successfully")
            })
    }

    async fn try_upload_files(
        &self,
        files: Vec<IncomingFile>,
        uploaded_by: Option<u64>,
    ) -> Result<Vec<UploadResponse>, AppError> {
        if files.is_empty() {
            return Err(AppError::validation("file", "No file uploaded"));
        }
        if files.len() > MAX_FILES_PER_REQUEST {
            return Err(AppError::validation(
                "files",
                &format!("Cannot upload more than {MAX_FILES_PER_REQUEST} files at once"),
            ));
        }

        let mut checked = Vec::with_capacity(files.len());
        let mut errors = Vec::new();
        for file in files {
            match self.inspect(&file).await {
                Ok(mime_type) => checked.push((file, mime_type)),
                Err(message) => errors.push(FieldError::new("file", message)),
            }
        }
        if !errors.is_empty() {
            return Err(AppError::ValidationError(errors));
        }

        let mut stored = Vec::with_capacity(checked.len());
        for (file, mime_type) in checked {
            match self.store(file, mime_type, uploaded_by).await {
                Ok(upload) => stored.push(upload),
                Err(e) => {
                    self.roll_back(&stored).await;
                    return Err(e);
                }
            }
        }

        tracing::info!(count = stored.len(), ?uploaded_by, "Files uploaded");
        Ok(stored.into_iter().map(UploadResponse::from).collect())
    }

    /// Undoes the earlier files of a batch that failed part way. Failures here
    /// are logged only; the original error is what the caller sees.
    async fn roll_back(&self, stored: &[Upload]) {
        for upload in stored {
            if let Err(e) = self.upload_repo.delete_upload(upload.id).await {
                tracing::warn!(upload_id = upload.id, "Failed to roll back upload row: {}", e);
            }
            if let Err(e) = self.file_store.remove(Path::new(&upload.path)).await {
                tracing::warn!(path = %upload.path, "Failed to roll back upload file: {}", e);
            }
        }
    }

    /// Returns the MIME type to record, or a message saying why the file is
    /// rejected.
    async fn inspect(&self, file: &IncomingFile) -> Result<String, String> {
        let mime_type = file
            .declared_mime
            .as_deref()
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| FALLBACK_MIME.to_string());

        if !ALLOWED_MIME_TYPES.contains(&mime_type.as_str()) {
            return Err(format!(
                "{}: file type {} is not allowed",
                file.original_name, mime_type
            ));
        }

        if file.size > self.max_upload_bytes {
            return Err(format!(
                "{}: file exceeds the maximum size of {} bytes",
                file.original_name, self.max_upload_bytes
            ));
        }

        let detected = sniff(&file.temp_path).await.map_err(|e| {
            tracing::warn!(path = %file.temp_path.display(), "Could not read upload: {}", e);
            format!("{}: file could not be read", file.original_name)
        })?;

        if contradicts(&mime_type, detected.as_deref()) {
            tracing::warn!(
                declared = %mime_type,
                detected = detected.as_deref().unwrap_or("unknown"),
                "Upload content does not match its declared type"
            );
            return Err(format!(
                "{}: file content does not match type {}",
                file.original_name, mime_type
            ));
        }

        Ok(mime_type)
    }

    async fn store(
        &self,
        file: IncomingFile,
        mime_type: String,
        uploaded_by: Option<u64>,
    ) -> Result<Upload, AppError> {
        let filename = stored_filename(&file.original_name);
        let path = self.file_store.save(&file.temp_path, &filename).await?;

        let insert = UploadInsert {
            filename,
            original_name: file.original_name,
            mime_type,
            size: file.size,
            path: path.to_string_lossy().into_owned(),
            uploaded_by,
        };

        match self.upload_repo.create_upload(&insert).await {
            Ok(upload) => Ok(upload),
            Err(e) => {
                if let Err(cleanup) = self.file_store.remove(&path).await {
                    tracing::warn!(path = %path.display(), "Failed to remove orphaned upload: {}", cleanup);
                }
                Err(e)
            }
        }
    }

    /// Newest first.
    pub async fn list_uploads(&self) -> Envelope<Vec<UploadResponse>> {
        let result = self.upload_repo
            .list_uploads()
            .await
            .map(|uploads| uploads.into_iter().map(UploadResponse::from).collect());
        Envelope::from_result(result, "Failed to fetch uploads")
    }

    pub async fn delete_upload(&self, id: &str) -> Envelope<()> {
        Envelope::from_unit(self.try_delete_upload(id).await, "File deleted successfully", "Failed to delete file")
    }

    async fn try_delete_upload(&self, id: &str) -> Result<(), AppError> {
        let id = validate_id(id)?;
        let upload = self.upload_repo.get_upload_by_id(id).await?;

        self.file_store.remove(&PathBuf::from(&upload.path)).await?;
        self.upload_repo.delete_upload(upload.id).await?;

        tracing::info!(upload_id = upload.id, "Upload deleted");
        Ok(())
    }
}

async fn sniff(path: &Path) -> std::io::Result<Option<String>> {
    let path = path.to_path_buf();
    let detected = tokio::task::spawn_blocking(move || infer::get_from_path(path))
        .await
        .map_err(std::io::Error::other)??;
    Ok(detected.map(|kind| kind.mime_type().to_string()))
}

/// An image claim needs image content; a video claim needs video or audio
/// content (ogg and webm containers sniff as either). Other types are not
/// checked.
pub fn contradicts(declared: &str, detected: Option<&str>) -> bool {
    let family = |mime: &str| mime.split('/').next().unwrap_or_default().to_string();

    match family(declared).as_str() {
        "image" => detected.map(family).as_deref() != Some("image"),
        "video" => !matches!(detected.map(family).as_deref(), Some("video" | "audio")),
        _ => false,
    }
}

/// `file-<uuid>` plus the lowercased extension of the original name when it
/// is short and alphanumeric.
pub fn stored_filename(original_name: &str) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    format!("file-{}{}", Uuid::new_v4(), extension)
}
