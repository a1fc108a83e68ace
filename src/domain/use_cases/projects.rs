use serde::Deserialize;
use serde_json::Value;

use crate::{
    domain::validation::{
        clean_payload, from_record, schemas, validate, validate_id, Record,
    },
    entities::{
        envelope::Envelope,
        pagination::{PageRequest, Paged},
        project::{
            Category, NewProject, NewProjectImage, Project, ProjectChanges, ProjectImage,
            ProjectQuery, ProjectStats,
        },
    },
    errors::{AppError, FieldError},
    repositories::project::ProjectRepository,
};

#[derive(Debug, Deserialize)]
struct ListingParams {
    limit: u32,
    offset: u32,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    featured: Option<bool>,
    #[serde(default)]
    published: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    q: String,
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct LimitParam {
    limit: u32,
}

/// Who is reading. Public readers only ever see published projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Audience {
    Public,
    Admin,
}

impl Audience {
    fn published_only(self) -> bool {
        self == Audience::Public
    }
}

fn category_error() -> AppError {
    AppError::validation(
        "category",
        &format!("Category must be one of: {}", Category::NAMES.join(", ")),
    )
}

/// Parses a comma-separated category filter. Duplicates collapse.
fn parse_categories(raw: Option<&str>) -> Result<Vec<Category>, AppError> {
    let mut categories = Vec::new();
    for part in raw.unwrap_or_default().split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let category: Category = part.parse().map_err(|_| category_error())?;
        if !categories.contains(&category) {
            categories.push(category);
        }
    }
    Ok(categories)
}

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
    max_page_size: u32,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R, max_page_size: u32) -> Self {
        ProjectHandler {
            project_repo,
            max_page_size: max_page_size.max(1),
        }
    }

    fn max_limit(&self) -> i64 {
        i64::from(self.max_page_size)
    }

    /// Lists projects matching the query-string filters.
    pub async fn list_projects(&self, query: &Record, audience: Audience) -> Envelope<Paged<Project>> {
        Envelope::from_result(self.try_list_projects(query, audience).await, "Failed to fetch projects")
    }

    async fn try_list_projects(&self, query: &Record, audience: Audience) -> Result<Paged<Project>, AppError> {
        let record = validate(&schemas::project_listing(self.max_limit()), query)?;
        let params: ListingParams = from_record(record)?;

        let page = PageRequest { limit: params.limit, offset: params.offset }.clamped(self.max_page_size);
        let published = if audience.published_only() { Some(true) } else { params.published };

        let query = ProjectQuery {
            categories: parse_categories(params.category.as_deref())?,
            featured: params.featured,
            published,
            limit: page.limit,
            offset: page.offset,
        };

        let projects = self.project_repo.list_projects(&query).await?;
        Ok(Paged::new(projects, page))
    }

    pub async fn get_featured_projects(&self, query: &Record) -> Envelope<Vec<Project>> {
        Envelope::from_result(self.try_get_featured_projects(query).await, "Failed to fetch featured projects")
    }

    async fn try_get_featured_projects(&self, query: &Record) -> Result<Vec<Project>, AppError> {
        let record = validate(&schemas::featured_limit(self.max_limit()), query)?;
        let params: LimitParam = from_record(record)?;
        self.project_repo.get_featured_projects(params.limit).await
    }

    pub async fn get_projects_by_category(&self, category: &str, query: &Record) -> Envelope<Paged<Project>> {
        Envelope::from_result(
            self.try_get_projects_by_category(category, query).await,
            "Failed to fetch projects by category",
        )
    }

    async fn try_get_projects_by_category(&self, category: &str, query: &Record) -> Result<Paged<Project>, AppError> {
        let category: Category = category.parse().map_err(|_| category_error())?;
        let record = validate(
            &schemas::pagination(schemas::DEFAULT_CATEGORY_PAGE_SIZE, self.max_limit()),
            query,
        )?;
        let page: PageRequest = from_record(record)?;
        let page = page.clamped(self.max_page_size);

        let projects = self.project_repo
            .get_projects_by_category(category, page.limit, page.offset)
            .await?;
        Ok(Paged::new(projects, page))
    }

    pub async fn search_projects(&self, query: &Record) -> Envelope<Vec<Project>> {
        Envelope::from_result(self.try_search_projects(query).await, "Failed to search projects")
    }

    async fn try_search_projects(&self, query: &Record) -> Result<Vec<Project>, AppError> {
        let record = validate(&schemas::SEARCH, query)?;
        let params: SearchParams = from_record(record)?;
        self.project_repo.search_projects(params.q.trim(), params.limit).await
    }

    pub async fn get_project_by_id(&self, id: &str, audience: Audience) -> Envelope<Project> {
        Envelope::from_result(self.try_get_project_by_id(id, audience).await, "Failed to fetch project")
    }

    async fn try_get_project_by_id(&self, id: &str, audience: Audience) -> Result<Project, AppError> {
        let id = validate_id(id)?;
        self.project_repo.get_project_by_id(id, audience.published_only()).await
    }

    pub async fn get_project_by_slug(&self, slug: &str, audience: Audience) -> Envelope<Project> {
        Envelope::from_result(self.try_get_project_by_slug(slug, audience).await, "Failed to fetch project")
    }

    async fn try_get_project_by_slug(&self, slug: &str, audience: Audience) -> Result<Project, AppError> {
        if !schemas::is_valid_slug(slug) {
            return Err(AppError::validation("slug", schemas::SLUG_MESSAGE));
        }
        self.project_repo.get_project_by_slug(slug, audience.published_only()).await
    }

    /// Creates a project from a raw request body.
    pub async fn create_project(&self, payload: Value) -> Envelope<Project> {
        Envelope::from_result(self.try_create_project(payload).await, "Failed to create project")
            .with_message("Project created successfully")
    }

    async fn try_create_project(&self, payload: Value) -> Result<Project, AppError> {
        let record = clean_payload(&schemas::PROJECT_CREATE, payload)?;
        let project: NewProject = from_record(record)?;
        self.project_repo.create_project(&project).await
    }

    /// Applies a partial update. Fields absent from the body stay as they are.
    pub async fn update_project(&self, id: &str, payload: Value) -> Envelope<Project> {
        Envelope::from_result(self.try_update_project(id, payload).await, "Failed to update project")
            .with_message("Project updated successfully")
    }

    async fn try_update_project(&self, id: &str, payload: Value) -> Result<Project, AppError> {
        let id = validate_id(id)?;
        let record = clean_payload(&schemas::PROJECT_UPDATE, payload)?;
        if record.is_empty() {
            return Err(AppError::validation("body", "No valid fields to update"));
        }
        let changes: ProjectChanges = from_record(record)?;

        let current = self.project_repo.get_project_by_id(id, false).await?;
        check_date_order(&current, &changes)?;

        self.project_repo.update_project(id, &changes).await
    }

    pub async fn delete_project(&self, id: &str) -> Envelope<()> {
        let result = match validate_id(id) {
            Ok(id) => self.project_repo.delete_project(id).await,
            Err(e) => Err(e),
        };
        Envelope::from_unit(result, "Project deleted successfully", "Failed to delete project")
    }

    pub async fn get_project_stats(&self) -> Envelope<ProjectStats> {
        Envelope::from_result(self.project_repo.get_project_stats().await, "Failed to fetch project statistics")
    }

    pub async fn list_project_images(&self, project_id: &str, audience: Audience) -> Envelope<Vec<ProjectImage>> {
        Envelope::from_result(
            self.try_list_project_images(project_id, audience).await,
            "Failed to fetch project images",
        )
    }

    async fn try_list_project_images(&self, project_id: &str, audience: Audience) -> Result<Vec<ProjectImage>, AppError> {
        let project_id = validate_id(project_id)?;
        // Confirms the project exists and is visible to this reader.
        self.project_repo.get_project_by_id(project_id, audience.published_only()).await?;
        self.project_repo.list_project_images(project_id).await
    }

    pub async fn add_project_image(&self, project_id: &str, payload: Value) -> Envelope<ProjectImage> {
        Envelope::from_result(self.try_add_project_image(project_id, payload).await, "Failed to add project image")
            .with_message("Project image added successfully")
    }

    async fn try_add_project_image(&self, project_id: &str, payload: Value) -> Result<ProjectImage, AppError> {
        let project_id = validate_id(project_id)?;
        let record = clean_payload(&schemas::PROJECT_IMAGE_CREATE, payload)?;
        let image: NewProjectImage = from_record(record)?;
        self.project_repo.add_project_image(project_id, &image).await
    }

    pub async fn delete_project_image(&self, project_id: &str, image_id: &str) -> Envelope<()> {
        let result = match (validate_id(project_id), validate_id(image_id)) {
            (Ok(project_id), Ok(image_id)) => {
                self.project_repo.delete_project_image(project_id, image_id).await
            }
            (Err(e), _) => Err(e),
            (_, Err(_)) => Err(AppError::validation("image_id", "Invalid ID parameter")),
        };
        Envelope::from_unit(result, "Project image deleted successfully", "Failed to delete project image")
    }
}

/// End date may not precede start date once the update is merged onto the
/// stored row.
fn check_date_order(current: &Project, changes: &ProjectChanges) -> Result<(), AppError> {
    let start = changes.start_date.merged_with(current.start_date);
    let end = changes.end_date.merged_with(current.end_date);

    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(AppError::ValidationError(vec![
            FieldError::new("end_date", "End date must be after start date"),
        ])),
        _ => Ok(()),
    }
}
