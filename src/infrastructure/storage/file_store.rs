use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::errors::AppError;

#[async_trait]
pub trait FileStore: Send + Sync {
    /// Moves the file at `source` into the store under `filename` and
    /// returns the stored path.
    async fn save(&self, source: &Path, filename: &str) -> Result<PathBuf, AppError>;

    /// Removes a stored file. A file that is already gone is not an error.
    async fn remove(&self, path: &Path) -> Result<(), AppError>;
}

/// Stores uploads in a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(LocalFileStore { root })
    }

    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn save(&self, source: &Path, filename: &str) -> Result<PathBuf, AppError> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(AppError::InternalError(format!("Refusing to store file as {filename:?}")));
        }

        let destination = self.root.join(filename);

        // rename fails across filesystems (temp dir vs upload dir).
        if fs::rename(source, &destination).await.is_err() {
            fs::copy(source, &destination).await?;
            if let Err(e) = fs::remove_file(source).await {
                tracing::warn!(path = %source.display(), "Failed to remove temp file: {}", e);
            }
        }

        Ok(destination)
    }

    async fn remove(&self, path: &Path) -> Result<(), AppError> {
        if !self.contains(path) {
            return Err(AppError::InternalError(format!(
                "Refusing to remove {} outside the upload directory",
                path.display()
            )));
        }

        match fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Upload file already missing");
                Ok(())
            }
            Err(e) => Err(AppError::from(e)),
        }
    }
}
