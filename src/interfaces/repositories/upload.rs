use async_trait::async_trait;

use crate::{
    entities::upload::{Upload, UploadInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxUploadRepo,
};

const UPLOAD_COLUMNS: &str =
    "id, filename, original_name, mime_type, size, path, uploaded_by, created_at";

#[async_trait]
pub trait UploadRepository: Send + Sync {
    async fn create_upload(&self, upload: &UploadInsert) -> Result<Upload, AppError>;
    async fn list_uploads(&self) -> Result<Vec<Upload>, AppError>;
    async fn get_upload_by_id(&self, id: u64) -> Result<Upload, AppError>;
    async fn delete_upload(&self, id: u64) -> Result<(), AppError>;
}

#[async_trait]
impl UploadRepository for SqlxUploadRepo {
    async fn create_upload(&self, upload: &UploadInsert) -> Result<Upload, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO uploads (filename, original_name, mime_type, size, path, uploaded_by)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&upload.filename)
        .bind(&upload.original_name)
        .bind(&upload.mime_type)
        .bind(upload.size)
        .bind(&upload.path)
        .bind(upload.uploaded_by)
        .execute(&self.pool)
        .await?;

        self.get_upload_by_id(result.last_insert_id()).await
    }

    async fn list_uploads(&self) -> Result<Vec<Upload>, AppError> {
        sqlx::query_as::<_, Upload>(&format!(
            "SELECT {UPLOAD_COLUMNS} FROM uploads ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_upload_by_id(&self, id: u64) -> Result<Upload, AppError> {
        sqlx::query_as::<_, Upload>(&format!("SELECT {UPLOAD_COLUMNS} FROM uploads WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Upload not found".into()))
    }

    async fn delete_upload(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM uploads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Upload not found".into()));
        }
        Ok(())
    }
}
