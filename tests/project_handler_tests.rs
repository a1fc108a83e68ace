mod test_utils;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::{mock, predicate::*};
use serde_json::{json, Map, Value};

use dh_portfolio_backend::{
    entities::{
        envelope::ErrorCode,
        option_fields::OptionField,
        project::{
            Category, NewProject, NewProjectImage, Project, ProjectChanges, ProjectImage,
            ProjectQuery, ProjectStats,
        },
    },
    errors::{AppError, FieldError},
    repositories::project::ProjectRepository,
    use_cases::projects::{Audience, ProjectHandler},
};
use test_utils::*;

mock! {
    pub ProjectRepo {}

    #[async_trait]
    impl ProjectRepository for ProjectRepo {
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
}

fn handler(repo: MockProjectRepo) -> ProjectHandler<MockProjectRepo> {
    ProjectHandler::new(repo, 100)
}

fn query(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap_or_default()
}

fn not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

#[actix_rt::test]
async fn public_listing_only_sees_published_projects() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects()
        .withf(|q| q.published == Some(true) && q.limit == 20 && q.offset == 0 && q.categories.is_empty())
        .times(1)
        .returning(|_| Ok(vec![sample_project(1, "first")]));

    let envelope = handler(repo)
        .list_projects(&query(json!({ "published": "false" })), Audience::Public)
        .await;

    assert!(envelope.success);
    let page = envelope.data.unwrap();
    assert_eq!(page.count, 1);
    assert!(!page.pagination.has_more);
}

#[actix_rt::test]
async fn admin_listing_honours_the_published_filter() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects()
        .withf(|q| q.published == Some(false) && q.featured == Some(true) && q.limit == 5 && q.offset == 10)
        .times(1)
        .returning(|_| Ok(vec![]));

    let envelope = handler(repo)
        .list_projects(
            &query(json!({ "published": "false", "featured": "true", "limit": "5", "offset": "10" })),
            Audience::Admin,
        )
        .await;

    assert!(envelope.success);
}

#[actix_rt::test]
async fn category_filter_is_a_deduplicated_set() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects()
        .withf(|q| q.categories == vec![Category::Web, Category::ThreeD])
        .times(1)
        .returning(|_| Ok(vec![]));

    let envelope = handler(repo)
        .list_projects(&query(json!({ "category": "web, 3d,web" })), Audience::Public)
        .await;

    assert!(envelope.success);
}

#[actix_rt::test]
async fn unknown_category_is_rejected_before_querying() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo)
        .list_projects(&query(json!({ "category": "web,sculpture" })), Audience::Public)
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, Some(ErrorCode::Validation));
    assert_eq!(envelope.details.unwrap()[0].field, "category");
}

#[actix_rt::test]
async fn oversized_limit_is_a_validation_error() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo)
        .list_projects(&query(json!({ "limit": "1000" })), Audience::Public)
        .await;

    assert_eq!(envelope.code, Some(ErrorCode::Validation));
    assert_eq!(
        envelope.details.unwrap(),
        vec![FieldError::new("limit", "Limit cannot exceed 100")]
    );
}

#[actix_rt::test]
async fn full_page_signals_more_results() {
    let mut repo = MockProjectRepo::new();
    repo.expect_list_projects()
        .returning(|q| Ok((0..q.limit as u64).map(|i| sample_project(i + 1, &format!("p-{i}"))).collect()));

    let envelope = handler(repo)
        .list_projects(&query(json!({ "limit": "3" })), Audience::Public)
        .await;

    let page = envelope.data.unwrap();
    assert_eq!(page.count, 3);
    assert!(page.pagination.has_more);
}

#[actix_rt::test]
async fn featured_uses_default_limit() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_featured_projects()
        .with(eq(6))
        .times(1)
        .returning(|_| Ok(vec![sample_project(1, "featured")]));

    let envelope = handler(repo).get_featured_projects(&query(json!({}))).await;
    assert_eq!(envelope.data.unwrap().len(), 1);
}

#[actix_rt::test]
async fn by_category_validates_the_path_segment() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_projects_by_category()
        .with(eq(Category::Game), eq(12), eq(0))
        .times(1)
        .returning(|_, _, _| Ok(vec![]));
    let handler = handler(repo);

    assert!(handler.get_projects_by_category("game", &query(json!({}))).await.success);

    let rejected = handler.get_projects_by_category("games", &query(json!({}))).await;
    assert_eq!(rejected.code, Some(ErrorCode::Validation));
}

#[actix_rt::test]
async fn search_requires_a_term() {
    let mut repo = MockProjectRepo::new();
    repo.expect_search_projects()
        .with(eq("rust"), eq(20))
        .times(1)
        .returning(|_, _| Ok(vec![sample_project(3, "rusty")]));
    let handler = handler(repo);

    let found = handler.search_projects(&query(json!({ "q": "  rust " }))).await;
    assert_eq!(found.data.unwrap()[0].slug, "rusty");

    let missing = handler.search_projects(&query(json!({}))).await;
    assert_eq!(
        missing.details.unwrap(),
        vec![FieldError::new("q", "Search query is required")]
    );
}

#[actix_rt::test]
async fn get_by_id_reports_missing_projects() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .with(eq(99999), eq(true))
        .times(1)
        .returning(|_, _| Err(not_found()));

    let envelope = handler(repo).get_project_by_id("99999", Audience::Public).await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, Some(ErrorCode::NotFound));
    assert_eq!(envelope.error.as_deref(), Some("Project not found"));
}

#[actix_rt::test]
async fn get_by_id_rejects_malformed_ids() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo).get_project_by_id("abc", Audience::Public).await;
    assert_eq!(envelope.code, Some(ErrorCode::Validation));
}

#[actix_rt::test]
async fn admin_reads_include_unpublished_projects() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_slug()
        .with(eq("draft"), eq(false))
        .times(1)
        .returning(|slug, _| {
            let mut project = sample_project(4, slug);
            project.published = false;
            Ok(project)
        });

    let envelope = handler(repo).get_project_by_slug("draft", Audience::Admin).await;
    assert!(!envelope.data.unwrap().published);
}

#[actix_rt::test]
async fn malformed_slug_is_rejected() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo).get_project_by_slug("Not_A_Slug", Audience::Public).await;
    assert_eq!(envelope.code, Some(ErrorCode::Validation));
}

#[actix_rt::test]
async fn create_applies_defaults_and_sanitizes() {
    let mut repo = MockProjectRepo::new();
    repo.expect_create_project()
        .withf(|p: &NewProject| {
            p.title == "Shiny"
                && p.slug == "shiny"
                && p.category == Category::ThreeD
                && p.tags == vec!["blender".to_string()]
                && p.technologies.is_empty()
                && !p.featured
                && p.published
                && p.start_date == NaiveDate::from_ymd_opt(2024, 1, 1)
        })
        .times(1)
        .returning(|p| {
            let mut project = sample_project(10, &p.slug);
            project.title = p.title.clone();
            project.category = p.category;
            Ok(project)
        });

    let envelope = handler(repo)
        .create_project(json!({
            "title": "  <Shiny>  ",
            "slug": "shiny",
            "description": "A 3D scene",
            "category": "3d",
            "tags": ["blender", "blender"],
            "start_date": "2024-01-01",
        }))
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Project created successfully"));
    assert_eq!(envelope.data.unwrap().id, 10);
}

#[actix_rt::test]
async fn duplicate_slug_is_a_conflict() {
    let mut repo = MockProjectRepo::new();
    repo.expect_create_project()
        .times(1)
        .returning(|_| Err(AppError::Conflict("Project with this slug already exists".into())));

    let envelope = handler(repo)
        .create_project(json!({
            "title": "Again",
            "slug": "portfolio-site",
            "description": "Same slug",
            "category": "web",
        }))
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.code, Some(ErrorCode::Conflict));
    assert_eq!(envelope.error.as_deref(), Some("Project with this slug already exists"));
    assert!(envelope.message.is_none());
}

#[actix_rt::test]
async fn invalid_create_never_reaches_the_repository() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo)
        .create_project(json!({ "title": "", "slug": "x", "category": "web" }))
        .await;

    assert_eq!(envelope.code, Some(ErrorCode::Validation));
    let details = envelope.details.unwrap();
    assert!(details.contains(&FieldError::new("title", "Title cannot be empty")));
    assert!(details.contains(&FieldError::new("description", "Description is required")));
}

#[actix_rt::test]
async fn update_changes_only_the_given_fields() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .with(eq(5), eq(false))
        .times(1)
        .returning(|id, _| Ok(sample_project(id, "five")));
    repo.expect_update_project()
        .withf(|id, changes| {
            let expected = ProjectChanges {
                featured: OptionField::SetToValue(true),
                ..Default::default()
            };
            *id == 5 && *changes == expected
        })
        .times(1)
        .returning(|id, _| {
            let mut project = sample_project(id, "five");
            project.featured = true;
            Ok(project)
        });

    let envelope = handler(repo).update_project("5", json!({ "featured": true })).await;

    assert!(envelope.success);
    assert_eq!(envelope.message.as_deref(), Some("Project updated successfully"));
    assert!(envelope.data.unwrap().featured);
}

#[actix_rt::test]
async fn update_can_clear_nullable_columns() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .returning(|id, _| Ok(sample_project(id, "five")));
    repo.expect_update_project()
        .withf(|_, changes| changes.client.is_set_to_null() && changes.title.is_unchanged())
        .times(1)
        .returning(|id, _| Ok(sample_project(id, "five")));

    let envelope = handler(repo).update_project("5", json!({ "client": null })).await;
    assert!(envelope.success);
}

#[actix_rt::test]
async fn empty_update_is_rejected() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo).update_project("5", json!({ "unknown": 1 })).await;

    assert_eq!(
        envelope.details.unwrap(),
        vec![FieldError::new("body", "No valid fields to update")]
    );
}

#[actix_rt::test]
async fn update_checks_dates_against_the_stored_row() {
    let mut repo = MockProjectRepo::new();
    // Stored start date is 2024-01-01.
    repo.expect_get_project_by_id()
        .returning(|id, _| Ok(sample_project(id, "five")));
    repo.expect_update_project().never();

    let envelope = handler(repo)
        .update_project("5", json!({ "end_date": "2023-12-31" }))
        .await;

    assert_eq!(
        envelope.details.unwrap(),
        vec![FieldError::new("end_date", "End date must be after start date")]
    );
}

#[actix_rt::test]
async fn update_of_missing_project_is_not_found() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .returning(|_, _| Err(not_found()));
    repo.expect_update_project().never();

    let envelope = handler(repo).update_project("404", json!({ "title": "New" })).await;
    assert_eq!(envelope.code, Some(ErrorCode::NotFound));
}

#[actix_rt::test]
async fn delete_reports_success_message() {
    let mut repo = MockProjectRepo::new();
    repo.expect_delete_project()
        .with(eq(3))
        .times(1)
        .returning(|_| Ok(()));

    let envelope = handler(repo).delete_project("3").await;

    assert!(envelope.success);
    assert!(envelope.data.is_none());
    assert_eq!(envelope.message.as_deref(), Some("Project deleted successfully"));
}

#[actix_rt::test]
async fn database_failures_become_generic_errors() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_stats()
        .returning(|| Err(AppError::InternalError("Database error: lost connection".into())));

    let envelope = handler(repo).get_project_stats().await;

    assert!(!envelope.success);
    assert!(envelope.code.is_none());
    assert_eq!(envelope.error.as_deref(), Some("Failed to fetch project statistics"));
}

#[actix_rt::test]
async fn images_of_hidden_projects_are_not_listed_publicly() {
    let mut repo = MockProjectRepo::new();
    repo.expect_get_project_by_id()
        .with(eq(8), eq(true))
        .returning(|_, _| Err(not_found()));
    repo.expect_list_project_images().never();

    let envelope = handler(repo).list_project_images("8", Audience::Public).await;
    assert_eq!(envelope.code, Some(ErrorCode::NotFound));
}

#[actix_rt::test]
async fn add_image_validates_the_url() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo)
        .add_project_image("8", json!({ "url": "not a url" }))
        .await;

    assert_eq!(
        envelope.details.unwrap(),
        vec![FieldError::new("url", "Image URL must be a valid URL")]
    );
}

#[actix_rt::test]
async fn delete_image_names_the_bad_id() {
    let repo = MockProjectRepo::new();

    let envelope = handler(repo).delete_project_image("8", "x").await;
    assert_eq!(envelope.details.unwrap()[0].field, "image_id");
}
