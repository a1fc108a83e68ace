use async_trait::async_trait;
use sqlx::{MySql, QueryBuilder};

use crate::{
    entities::contact::{ContactMessage, ContactQuery, NewContactMessage, Provenance, StatusUpdate},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

const CONTACT_COLUMNS: &str = "id, name, email, phone, company, subject, message, status, \
    priority, source, ip_address, user_agent, created_at, updated_at";

const MESSAGE_NOT_FOUND: &str = "Contact message not found";

#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_message(&self, message: &NewContactMessage, provenance: &Provenance) -> Result<ContactMessage, AppError>;
    async fn list_messages(&self, query: &ContactQuery) -> Result<Vec<ContactMessage>, AppError>;
    async fn list_unread_messages(&self) -> Result<Vec<ContactMessage>, AppError>;
    async fn get_message_by_id(&self, id: u64) -> Result<ContactMessage, AppError>;
    async fn update_status(&self, id: u64, update: &StatusUpdate) -> Result<ContactMessage, AppError>;
    async fn delete_message(&self, id: u64) -> Result<(), AppError>;
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_message(&self, message: &NewContactMessage, provenance: &Provenance) -> Result<ContactMessage, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO contact_messages (
                name, email, phone, company, subject, message, source, ip_address, user_agent
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.name)
        .bind(&message.email)
        .bind(&message.phone)
        .bind(&message.company)
        .bind(&message.subject)
        .bind(&message.message)
        .bind(&provenance.source)
        .bind(&provenance.ip_address)
        .bind(&provenance.user_agent)
        .execute(&self.pool)
        .await?;

        self.get_message_by_id(result.last_insert_id()).await
    }

    async fn list_messages(&self, query: &ContactQuery) -> Result<Vec<ContactMessage>, AppError> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages WHERE 1 = 1"
        ));
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(priority) = query.priority {
            builder.push(" AND priority = ").push_bind(priority.as_str());
        }
        builder
            .push(" ORDER BY created_at DESC, id DESC LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        builder
            .build_query_as::<ContactMessage>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_unread_messages(&self) -> Result<Vec<ContactMessage>, AppError> {
        // ENUM columns sort by declaration order: low < medium < high.
        sqlx::query_as::<_, ContactMessage>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages \
             WHERE status = 'unread' \
             ORDER BY priority DESC, created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn get_message_by_id(&self, id: u64) -> Result<ContactMessage, AppError> {
        sqlx::query_as::<_, ContactMessage>(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(MESSAGE_NOT_FOUND.into()))
    }

    async fn update_status(&self, id: u64, update: &StatusUpdate) -> Result<ContactMessage, AppError> {
        sqlx::query(
            r#"
            UPDATE contact_messages
            SET status = ?, priority = COALESCE(?, priority), updated_at = CURRENT_TIMESTAMP(3)
            WHERE id = ?
            "#,
        )
        .bind(update.status.as_str())
        .bind(update.priority.map(|p| p.as_str()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        self.get_message_by_id(id).await
    }

    async fn delete_message(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(MESSAGE_NOT_FOUND.into()));
        }
        Ok(())
    }
}
