use async_trait::async_trait;
use sqlx::{
    self,
    query_builder::Separated,
    types::Json,
    Encode, MySql, QueryBuilder, Type,
};

use crate::{
    entities::{
        option_fields::OptionField,
        project::{
            CategoryCount, Category, NewProject, NewProjectImage, Project, ProjectChanges,
            ProjectImage, ProjectQuery, ProjectRow, ProjectStats, ProjectStatsRow,
        },
    },
    errors::AppError,
    repositories::sqlx_repo::{is_foreign_key_violation, is_unique_violation, SqlxProjectRepo},
};

const PROJECT_COLUMNS: &str = "id, title, slug, description, short_description, category, \
    technologies, tags, client, client_url, project_url, github_url, demo_url, image_url, \
    thumbnail_url, video_url, model_url, featured, published, featured_order, project_order, \
    start_date, end_date, created_at, updated_at";

const LISTING_ORDER: &str =
    " ORDER BY featured_order ASC, project_order ASC, created_at DESC, id DESC";

const SLUG_CONFLICT: &str = "Project with this slug already exists";
const PROJECT_NOT_FOUND: &str = "Project not found";

#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, AppError>;
    async fn get_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError>;
    async fn get_projects_by_category(&self, category: Category, limit: u32, offset: u32) -> Result<Vec<Project>, AppError>;
    async fn search_projects(&self, term: &str, limit: u32) -> Result<Vec<Project>, AppError>;
    async fn get_project_by_id(&self, id: u64, published_only: bool) -> Result<Project, AppError>;
    async fn get_project_by_slug(&self, slug: &str, published_only: bool) -> Result<Project, AppError>;
    async fn create_project(&self, project: &NewProject) -> Result<Project, AppError>;
    async fn update_project(&self, id: u64, changes: &ProjectChanges) -> Result<Project, AppError>;
    async fn delete_project(&self, id: u64) -> Result<(), AppError>;
    async fn get_project_stats(&self) -> Result<ProjectStats, AppError>;
    async fn list_project_images(&self, project_id: u64) -> Result<Vec<ProjectImage>, AppError>;
    async fn add_project_image(&self, project_id: u64, image: &NewProjectImage) -> Result<ProjectImage, AppError>;
    async fn delete_project_image(&self, project_id: u64, image_id: u64) -> Result<(), AppError>;
}

/// Appends `column = ?` unless the field is unchanged. `SetToNull` binds NULL.
fn assign<'args, T, U, F>(
    set: &mut Separated<'_, 'args, MySql, &'static str>,
    column: &str,
    field: &OptionField<T>,
    to_param: F,
) where
    F: FnOnce(&T) -> U,
    U: 'args + Encode<'args, MySql> + Type<MySql>,
{
    if field.is_unchanged() {
        return;
    }
    set.push(format!("{column} = "));
    set.push_bind_unseparated(field.value_ref().map(to_param));
}

fn map_slug_conflict(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e) {
        AppError::Conflict(SLUG_CONFLICT.into())
    } else {
        AppError::from(e)
    }
}

impl SqlxProjectRepo {
    async fn fetch_rows(&self, mut builder: QueryBuilder<'_, MySql>) -> Result<Vec<Project>, AppError> {
        let rows = builder
            .build_query_as::<ProjectRow>()
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }
}

#[async_trait]
impl ProjectRepository for SqlxProjectRepo {
    async fn list_projects(&self, query: &ProjectQuery) -> Result<Vec<Project>, AppError> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE 1 = 1"
        ));

        if !query.categories.is_empty() {
            builder.push(" AND category IN (");
            let mut separated = builder.separated(", ");
            for category in &query.categories {
                separated.push_bind(category.as_str());
            }
            separated.push_unseparated(")");
        }
        if let Some(featured) = query.featured {
            builder.push(" AND featured = ").push_bind(featured);
        }
        if let Some(published) = query.published {
            builder.push(" AND published = ").push_bind(published);
        }

        builder
            .push(LISTING_ORDER)
            .push(" LIMIT ")
            .push_bind(query.limit)
            .push(" OFFSET ")
            .push_bind(query.offset);

        self.fetch_rows(builder).await
    }

    async fn get_featured_projects(&self, limit: u32) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>("CALL get_featured_projects(?)")
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_projects_by_category(&self, category: Category, limit: u32, offset: u32) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>("CALL get_projects_by_category(?, ?, ?)")
            .bind(category.as_str())
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn search_projects(&self, term: &str, limit: u32) -> Result<Vec<Project>, AppError> {
        let rows = sqlx::query_as::<_, ProjectRow>("CALL search_projects(?, ?)")
            .bind(term)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Project::from).collect())
    }

    async fn get_project_by_id(&self, id: u64, published_only: bool) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = "
        ));
        builder.push_bind(id);
        if published_only {
            builder.push(" AND published = TRUE");
        }

        builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?
            .map(Project::from)
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))
    }

    async fn get_project_by_slug(&self, slug: &str, published_only: bool) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::<MySql>::new(format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE slug = "
        ));
        builder.push_bind(slug);
        if published_only {
            builder.push(" AND published = TRUE");
        }

        builder
            .build_query_as::<ProjectRow>()
            .fetch_optional(&self.pool)
            .await?
            .map(Project::from)
            .ok_or_else(|| AppError::NotFound(PROJECT_NOT_FOUND.into()))
    }

    async fn create_project(&self, project: &NewProject) -> Result<Project, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO projects (
                title, slug, description, short_description, category, technologies, tags,
                client, client_url, project_url, github_url, demo_url, image_url,
                thumbnail_url, video_url, model_url, featured, published,
                featured_order, project_order, start_date, end_date
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&project.title)
        .bind(&project.slug)
        .bind(&project.description)
        .bind(&project.short_description)
        .bind(project.category.as_str())
        .bind(Json(&project.technologies))
        .bind(Json(&project.tags))
        .bind(&project.client)
        .bind(&project.client_url)
        .bind(&project.project_url)
        .bind(&project.github_url)
        .bind(&project.demo_url)
        .bind(&project.image_url)
        .bind(&project.thumbnail_url)
        .bind(&project.video_url)
        .bind(&project.model_url)
        .bind(project.featured)
        .bind(project.published)
        .bind(project.featured_order)
        .bind(project.project_order)
        .bind(project.start_date)
        .bind(project.end_date)
        .execute(&self.pool)
        .await
        .map_err(map_slug_conflict)?;

        self.get_project_by_id(result.last_insert_id(), false).await
    }

    async fn update_project(&self, id: u64, changes: &ProjectChanges) -> Result<Project, AppError> {
        let mut builder = QueryBuilder::<MySql>::new("UPDATE projects SET ");
        {
            let mut set = builder.separated(", ");
            assign(&mut set, "title", &changes.title, |v| v.clone());
            assign(&mut set, "slug", &changes.slug, |v| v.clone());
            assign(&mut set, "description", &changes.description, |v| v.clone());
            assign(&mut set, "short_description", &changes.short_description, |v| v.clone());
            assign(&mut set, "category", &changes.category, |v| v.as_str());
            assign(&mut set, "technologies", &changes.technologies, |v| Json(v.clone()));
            assign(&mut set, "tags", &changes.tags, |v| Json(v.clone()));
            assign(&mut set, "client", &changes.client, |v| v.clone());
            assign(&mut set, "client_url", &changes.client_url, |v| v.clone());
            assign(&mut set, "project_url", &changes.project_url, |v| v.clone());
            assign(&mut set, "github_url", &changes.github_url, |v| v.clone());
            assign(&mut set, "demo_url", &changes.demo_url, |v| v.clone());
            assign(&mut set, "image_url", &changes.image_url, |v| v.clone());
            assign(&mut set, "thumbnail_url", &changes.thumbnail_url, |v| v.clone());
            assign(&mut set, "video_url", &changes.video_url, |v| v.clone());
            assign(&mut set, "model_url", &changes.model_url, |v| v.clone());
            assign(&mut set, "featured", &changes.featured, |v| *v);
            assign(&mut set, "published", &changes.published, |v| *v);
            assign(&mut set, "featured_order", &changes.featured_order, |v| *v);
            assign(&mut set, "project_order", &changes.project_order, |v| *v);
            assign(&mut set, "start_date", &changes.start_date, |v| *v);
            assign(&mut set, "end_date", &changes.end_date, |v| *v);
            set.push("updated_at = CURRENT_TIMESTAMP(3)");
        }
        builder.push(" WHERE id = ").push_bind(id);

        builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(map_slug_conflict)?;

        // rows_affected() is 0 for matched-but-identical rows, so existence
        // is decided by the read-back.
        self.get_project_by_id(id, false).await
    }

    async fn delete_project(&self, id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(PROJECT_NOT_FOUND.into()));
        }
        Ok(())
    }

    async fn get_project_stats(&self) -> Result<ProjectStats, AppError> {
        let totals = sqlx::query_as::<_, ProjectStatsRow>("CALL get_project_stats()")
            .fetch_one(&self.pool)
            .await?;

        let categories = sqlx::query_as::<_, CategoryCount>("CALL get_project_category_counts()")
            .fetch_all(&self.pool)
            .await?;

        Ok(ProjectStats::from_parts(totals, categories))
    }

    async fn list_project_images(&self, project_id: u64) -> Result<Vec<ProjectImage>, AppError> {
        sqlx::query_as::<_, ProjectImage>(
            r#"
            SELECT id, project_id, url, alt_text, caption, sort_order, created_at
            FROM project_images
            WHERE project_id = ?
            ORDER BY sort_order ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn add_project_image(&self, project_id: u64, image: &NewProjectImage) -> Result<ProjectImage, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_images (project_id, url, alt_text, caption, sort_order)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(project_id)
        .bind(&image.url)
        .bind(&image.alt_text)
        .bind(&image.caption)
        .bind(image.sort_order)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_foreign_key_violation(&e) {
                AppError::NotFound(PROJECT_NOT_FOUND.into())
            } else {
                AppError::from(e)
            }
        })?;

        sqlx::query_as::<_, ProjectImage>(
            r#"
            SELECT id, project_id, url, alt_text, caption, sort_order, created_at
            FROM project_images
            WHERE id = ?
            "#,
        )
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn delete_project_image(&self, project_id: u64, image_id: u64) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM project_images WHERE id = ? AND project_id = ?")
            .bind(image_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project image not found".into()));
        }
        Ok(())
    }
}
