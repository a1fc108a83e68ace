use tracing::{info, instrument};

use super::mysql::Database;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    username VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    password_hash VARCHAR(255) NOT NULL,
    role ENUM('admin', 'user') NOT NULL DEFAULT 'user',
    created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    updated_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3) ON UPDATE CURRENT_TIMESTAMP(3),
    UNIQUE KEY users_username_key (username),
    UNIQUE KEY users_email_key (email)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

const CREATE_PROJECTS: &str = r#"
CREATE TABLE IF NOT EXISTS projects (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    slug VARCHAR(255) NOT NULL,
    description TEXT NOT NULL,
    short_description VARCHAR(500) NULL,
    category ENUM('web', 'mobile', '3d', 'animation', 'illustration', 'game', 'other') NOT NULL,
    technologies JSON NULL,
    tags JSON NULL,
    client VARCHAR(255) NULL,
    client_url VARCHAR(500) NULL,
    project_url VARCHAR(500) NULL,
    github_url VARCHAR(500) NULL,
    demo_url VARCHAR(500) NULL,
    image_url VARCHAR(500) NULL,
    thumbnail_url VARCHAR(500) NULL,
    video_url VARCHAR(500) NULL,
    model_url VARCHAR(500) NULL,
    featured BOOLEAN NOT NULL DEFAULT FALSE,
    published BOOLEAN NOT NULL DEFAULT TRUE,
    featured_order INT NOT NULL DEFAULT 0,
    project_order INT NOT NULL DEFAULT 0,
    start_date DATE NULL,
    end_date DATE NULL,
    created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    updated_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    UNIQUE KEY projects_slug_key (slug)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

const CREATE_PROJECT_IMAGES: &str = r#"
CREATE TABLE IF NOT EXISTS project_images (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    project_id BIGINT UNSIGNED NOT NULL,
    url VARCHAR(500) NOT NULL,
    alt_text VARCHAR(255) NULL,
    caption VARCHAR(500) NULL,
    sort_order INT NOT NULL DEFAULT 0,
    created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    CONSTRAINT project_images_project_fk FOREIGN KEY (project_id)
        REFERENCES projects (id) ON DELETE CASCADE
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

const CREATE_CONTACT_MESSAGES: &str = r#"
CREATE TABLE IF NOT EXISTS contact_messages (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    phone VARCHAR(50) NULL,
    company VARCHAR(255) NULL,
    subject VARCHAR(255) NULL,
    message TEXT NOT NULL,
    status ENUM('unread', 'read', 'replied', 'archived') NOT NULL DEFAULT 'unread',
    priority ENUM('low', 'medium', 'high') NOT NULL DEFAULT 'medium',
    source VARCHAR(100) NOT NULL DEFAULT 'contact_form',
    ip_address VARCHAR(45) NULL,
    user_agent TEXT NULL,
    created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    updated_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

const CREATE_UPLOADS: &str = r#"
CREATE TABLE IF NOT EXISTS uploads (
    id BIGINT UNSIGNED NOT NULL AUTO_INCREMENT PRIMARY KEY,
    filename VARCHAR(255) NOT NULL,
    original_name VARCHAR(255) NOT NULL,
    mime_type VARCHAR(100) NOT NULL,
    size BIGINT UNSIGNED NOT NULL,
    path VARCHAR(500) NOT NULL,
    uploaded_by BIGINT UNSIGNED NULL,
    created_at TIMESTAMP(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
    CONSTRAINT uploads_uploaded_by_fk FOREIGN KEY (uploaded_by)
        REFERENCES users (id) ON DELETE SET NULL
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci
"#;

/// Order matters: referenced tables come first.
const TABLES: [(&str, &str); 5] = [
    ("users", CREATE_USERS),
    ("projects", CREATE_PROJECTS),
    ("project_images", CREATE_PROJECT_IMAGES),
    ("contact_messages", CREATE_CONTACT_MESSAGES),
    ("uploads", CREATE_UPLOADS),
];

/// Columns added after the first release. Definitions must be valid on a
/// table that already holds rows.
const ADDITIVE_COLUMNS: &[(&str, &str, &str)] = &[
    ("projects", "short_description", "VARCHAR(500) NULL"),
    ("projects", "client", "VARCHAR(255) NULL"),
    ("projects", "client_url", "VARCHAR(500) NULL"),
    ("projects", "demo_url", "VARCHAR(500) NULL"),
    ("projects", "thumbnail_url", "VARCHAR(500) NULL"),
    ("projects", "video_url", "VARCHAR(500) NULL"),
    ("projects", "model_url", "VARCHAR(500) NULL"),
    ("projects", "featured_order", "INT NOT NULL DEFAULT 0"),
    ("projects", "project_order", "INT NOT NULL DEFAULT 0"),
    ("projects", "start_date", "DATE NULL"),
    ("projects", "end_date", "DATE NULL"),
    ("contact_messages", "phone", "VARCHAR(50) NULL"),
    ("contact_messages", "company", "VARCHAR(255) NULL"),
    ("contact_messages", "priority", "ENUM('low', 'medium', 'high') NOT NULL DEFAULT 'medium'"),
    ("contact_messages", "source", "VARCHAR(100) NOT NULL DEFAULT 'contact_form'"),
    ("contact_messages", "ip_address", "VARCHAR(45) NULL"),
    ("contact_messages", "user_agent", "TEXT NULL"),
];

const INDEXES: &[(&str, &str, &str)] = &[
    ("projects", "idx_projects_category", "(category)"),
    ("projects", "idx_projects_listing", "(published, featured_order, project_order, created_at)"),
    ("projects", "idx_projects_featured", "(featured, featured_order)"),
    ("project_images", "idx_project_images_project", "(project_id, sort_order)"),
    ("contact_messages", "idx_contact_status", "(status)"),
    ("contact_messages", "idx_contact_created", "(created_at)"),
    ("uploads", "idx_uploads_created", "(created_at)"),
];

const PROCEDURES: &[(&str, &str)] = &[
    (
        "get_featured_projects",
        r#"CREATE PROCEDURE get_featured_projects(IN p_limit INT)
SELECT * FROM projects
WHERE featured = TRUE AND published = TRUE
ORDER BY featured_order ASC, project_order ASC, created_at DESC, id DESC
LIMIT p_limit"#,
    ),
    (
        "get_projects_by_category",
        r#"CREATE PROCEDURE get_projects_by_category(IN p_category VARCHAR(32), IN p_limit INT, IN p_offset INT)
SELECT * FROM projects
WHERE category = p_category AND published = TRUE
ORDER BY featured_order ASC, project_order ASC, created_at DESC, id DESC
LIMIT p_limit OFFSET p_offset"#,
    ),
    (
        "search_projects",
        r#"CREATE PROCEDURE search_projects(IN p_term VARCHAR(255), IN p_limit INT)
SELECT * FROM projects
WHERE published = TRUE
  AND (title LIKE CONCAT('%', p_term, '%')
    OR short_description LIKE CONCAT('%', p_term, '%')
    OR description LIKE CONCAT('%', p_term, '%')
    OR CAST(technologies AS CHAR) LIKE CONCAT('%', p_term, '%')
    OR CAST(tags AS CHAR) LIKE CONCAT('%', p_term, '%'))
ORDER BY featured DESC, featured_order ASC, created_at DESC, id DESC
LIMIT p_limit"#,
    ),
    (
        "get_project_stats",
        r#"CREATE PROCEDURE get_project_stats()
SELECT
    CAST(COUNT(*) AS SIGNED) AS total_projects,
    CAST(COALESCE(SUM(published = TRUE), 0) AS SIGNED) AS published_projects,
    CAST(COALESCE(SUM(featured = TRUE), 0) AS SIGNED) AS featured_projects,
    CAST(COUNT(DISTINCT category) AS SIGNED) AS category_count
FROM projects"#,
    ),
    (
        "get_project_category_counts",
        r#"CREATE PROCEDURE get_project_category_counts()
SELECT CAST(category AS CHAR) AS category, CAST(COUNT(*) AS SIGNED) AS total
FROM projects
GROUP BY category
ORDER BY total DESC, category ASC"#,
    ),
];

/// What one initialization pass had to create.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchemaReport {
    pub columns_added: Vec<String>,
    pub indexes_added: Vec<String>,
    pub procedures_added: Vec<String>,
}

impl SchemaReport {
    pub fn is_noop(&self) -> bool {
        self.columns_added.is_empty() && self.indexes_added.is_empty() && self.procedures_added.is_empty()
    }
}

/// Brings the database up to the current schema. Safe to run on every
/// start: existing tables, columns, indexes and routines are left alone.
pub struct SchemaManager<'a> {
    db: &'a Database,
}

impl<'a> SchemaManager<'a> {
    pub fn new(db: &'a Database) -> Self {
        SchemaManager { db }
    }

    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<SchemaReport, sqlx::Error> {
        let mut report = SchemaReport::default();

        for (table, ddl) in TABLES {
            sqlx::raw_sql(ddl).execute(self.db.pool()).await?;
            tracing::debug!(table, "table ensured");
        }

        for (table, column, definition) in ADDITIVE_COLUMNS {
            if !self.column_exists(table, column).await? {
                let ddl = format!("ALTER TABLE {table} ADD COLUMN {column} {definition}");
                sqlx::raw_sql(&ddl).execute(self.db.pool()).await?;
                report.columns_added.push(format!("{table}.{column}"));
            }
        }

        for (table, index, columns) in INDEXES {
            if !self.index_exists(table, index).await? {
                let ddl = format!("CREATE INDEX {index} ON {table} {columns}");
                sqlx::raw_sql(&ddl).execute(self.db.pool()).await?;
                report.indexes_added.push(index.to_string());
            }
        }

        for (name, ddl) in PROCEDURES {
            if !self.procedure_exists(name).await? {
                sqlx::raw_sql(ddl).execute(self.db.pool()).await?;
                report.procedures_added.push(name.to_string());
            }
        }

        if report.is_noop() {
            info!("Database schema up to date");
        } else {
            info!(
                columns = ?report.columns_added,
                indexes = ?report.indexes_added,
                procedures = ?report.procedures_added,
                "Database schema updated"
            );
        }

        Ok(report)
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND COLUMN_NAME = ?",
        )
        .bind(table)
        .bind(column)
        .fetch_one(self.db.pool())
        .await?;
        Ok(count > 0)
    }

    async fn index_exists(&self, table: &str, index: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.STATISTICS \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND INDEX_NAME = ?",
        )
        .bind(table)
        .bind(index)
        .fetch_one(self.db.pool())
        .await?;
        Ok(count > 0)
    }

    async fn procedure_exists(&self, name: &str) -> Result<bool, sqlx::Error> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM information_schema.ROUTINES \
             WHERE ROUTINE_SCHEMA = DATABASE() AND ROUTINE_NAME = ? AND ROUTINE_TYPE = 'PROCEDURE'",
        )
        .bind(name)
        .fetch_one(self.db.pool())
        .await?;
        Ok(count > 0)
    }
}
