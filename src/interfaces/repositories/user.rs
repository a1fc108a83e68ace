use async_trait::async_trait;

use crate::{
    entities::user::{User, UserInsert},
    errors::AppError,
    repositories::sqlx_repo::{is_unique_violation, SqlxUserRepo},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, created_at, updated_at";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    /// Matches either the username or the email address.
    async fn get_user_by_login(&self, identifier: &str) -> Result<Option<User>, AppError>;
    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>, AppError>;
    async fn update_password(&self, id: u64, password_hash: &str) -> Result<(), AppError>;
}

#[async_trait]
impl UserRepository for SqlxUserRepo {
    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, role) VALUES (?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("User with this username or email already exists".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        self.get_user_by_id(result.last_insert_id())
            .await?
            .ok_or_else(|| AppError::InternalError("Created user could not be read back".into()))
    }

    async fn get_user_by_login(&self, identifier: &str) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? OR email = ? LIMIT 1"
        ))
        .bind(identifier)
        .bind(identifier.to_lowercase())
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_user_by_id(&self, id: u64) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn update_password(&self, id: u64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".into()));
        }
        Ok(())
    }
}
