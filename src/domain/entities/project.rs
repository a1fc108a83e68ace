use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use crate::entities::{option_fields::OptionField, variants::string_enum};

string_enum! {
    pub enum Category ("category") {
        Web => "web",
        Mobile => "mobile",
        ThreeD => "3d",
        Animation => "animation",
        Illustration => "illustration",
        Game => "game",
        Other => "other",
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub technologies: Option<Json<Vec<String>>>,
    pub tags: Option<Json<Vec<String>>>,
    pub client: Option<String>,
    pub client_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub model_url: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub featured_order: i32,
    pub project_order: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub short_description: Option<String>,
    pub category: Category,
    pub technologies: Vec<String>,
    pub tags: Vec<String>,
    pub client: Option<String>,
    pub client_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub demo_url: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    pub model_url: Option<String>,
    pub featured: bool,
    pub published: bool,
    pub featured_order: i32,
    pub project_order: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProjectRow> for Project {
    fn from(row: ProjectRow) -> Self {
        Project {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            short_description: row.short_description,
            category: row.category,
            technologies: row.technologies.map(|j| j.0).unwrap_or_default(),
            tags: dedup_preserving_order(row.tags.map(|j| j.0).unwrap_or_default()),
            client: row.client,
            client_url: row.client_url,
            project_url: row.project_url,
            github_url: row.github_url,
            demo_url: row.demo_url,
            image_url: row.image_url,
            thumbnail_url: row.thumbnail_url,
            video_url: row.video_url,
            model_url: row.model_url,
            featured: row.featured,
            published: row.published,
            featured_order: row.featured_order,
            project_order: row.project_order,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Tags are a set; the first occurrence wins.
pub fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

// ───── Write Models ──────────────────────────────────────────────────

/// A validated project submission with defaults applied.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default)]
    pub short_description: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub client_url: Option<String>,
    #[serde(default)]
    pub project_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default = "default_true")]
    pub published: bool,
    #[serde(default)]
    pub featured_order: i32,
    #[serde(default)]
    pub project_order: i32,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

/// Partial update of a project. Each field is applied independently.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectChanges {
    pub title: OptionField<String>,
    pub slug: OptionField<String>,
    pub description: OptionField<String>,
    pub short_description: OptionField<String>,
    pub category: OptionField<Category>,
    pub technologies: OptionField<Vec<String>>,
    pub tags: OptionField<Vec<String>>,
    pub client: OptionField<String>,
    pub client_url: OptionField<String>,
    pub project_url: OptionField<String>,
    pub github_url: OptionField<String>,
    pub demo_url: OptionField<String>,
    pub image_url: OptionField<String>,
    pub thumbnail_url: OptionField<String>,
    pub video_url: OptionField<String>,
    pub model_url: OptionField<String>,
    pub featured: OptionField<bool>,
    pub published: OptionField<bool>,
    pub featured_order: OptionField<i32>,
    pub project_order: OptionField<i32>,
    pub start_date: OptionField<NaiveDate>,
    pub end_date: OptionField<NaiveDate>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        *self == ProjectChanges::default()
    }
}

// ───── Queries ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectQuery {
    pub categories: Vec<Category>,
    pub featured: Option<bool>,
    pub published: Option<bool>,
    pub limit: u32,
    pub offset: u32,
}

// ───── Images ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct ProjectImage {
    pub id: u64,
    pub project_id: u64,
    pub url: String,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewProjectImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

// ───── Stats ─────────────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectStatsRow {
    pub total_projects: i64,
    pub published_projects: i64,
    pub featured_projects: i64,
    pub category_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryCount {
    #[sqlx(try_from = "String")]
    pub category: Category,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectStats {
    pub total_projects: i64,
    pub published_projects: i64,
    pub draft_projects: i64,
    pub featured_projects: i64,
    pub category_count: i64,
    pub categories: Vec<CategoryCount>,
}

impl ProjectStats {
    pub fn from_parts(row: ProjectStatsRow, categories: Vec<CategoryCount>) -> Self {
        ProjectStats {
            total_projects: row.total_projects,
            published_projects: row.published_projects,
            draft_projects: row.total_projects - row.published_projects,
            featured_projects: row.featured_projects,
            category_count: row.category_count,
            categories,
        }
    }
}
