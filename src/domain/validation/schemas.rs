use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use crate::entities::{
    contact::{MessagePriority, MessageStatus},
    project::Category,
};
use super::rules::{FieldSpec, Pattern, Rule, Schema};

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));
static PERSON_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s'-]+$").expect("valid regex"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[1-9]\d{0,15}$").expect("valid regex"));

pub const SLUG_MESSAGE: &str = "Slug must contain only lowercase letters, numbers, and hyphens";

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const DEFAULT_FEATURED_LIMIT: i64 = 6;
pub const DEFAULT_CATEGORY_PAGE_SIZE: i64 = 12;
pub const DEFAULT_CONTACT_PAGE_SIZE: i64 = 50;
pub const MAX_SEARCH_LIMIT: i64 = 50;

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.len() <= 255 && SLUG_RE.is_match(slug)
}

fn text(min: usize, max: usize) -> Rule {
    Rule::Text { min, max, pattern: None }
}

fn url() -> Rule {
    Rule::Url { max: 500 }
}

fn order() -> Rule {
    Rule::Integer { min: Some(0), max: Some(1000) }
}

fn slug() -> Rule {
    Rule::Text {
        min: 1,
        max: 255,
        pattern: Some(Pattern::new(&SLUG_RE, SLUG_MESSAGE)),
    }
}

fn technologies() -> Rule {
    Rule::TextList { max_items: 20, max_item_len: 100, unique: false }
}

fn tags() -> Rule {
    Rule::TextList { max_items: 15, max_item_len: 50, unique: true }
}

const PROJECT_URL_FIELDS: [(&str, &str); 8] = [
    ("client_url", "Client URL"),
    ("project_url", "Project URL"),
    ("github_url", "GitHub URL"),
    ("demo_url", "Demo URL"),
    ("image_url", "Image URL"),
    ("thumbnail_url", "Thumbnail URL"),
    ("video_url", "Video URL"),
    ("model_url", "Model URL"),
];

pub static PROJECT_CREATE: Lazy<Schema> = Lazy::new(|| {
    let mut fields = vec![
        FieldSpec::required("title", "Title", text(1, 255)),
        FieldSpec::required("slug", "Slug", slug()),
        FieldSpec::required("description", "Description", text(1, 65535)),
        FieldSpec::optional("short_description", "Short description", text(0, 500)),
        FieldSpec::required("category", "Category", Rule::OneOf { values: Category::NAMES }),
        FieldSpec::optional("technologies", "Technologies", technologies()).with_default(json!([])),
        FieldSpec::optional("tags", "Tags", tags()).with_default(json!([])),
        FieldSpec::optional("client", "Client", text(0, 255)),
    ];
    fields.extend(
        PROJECT_URL_FIELDS
            .iter()
            .map(|&(name, label)| FieldSpec::optional(name, label, url())),
    );
    fields.extend([
        FieldSpec::optional("featured", "Featured", Rule::Boolean).with_default(json!(false)),
        FieldSpec::optional("published", "Published", Rule::Boolean).with_default(json!(true)),
        FieldSpec::optional("featured_order", "Featured order", order()).with_default(json!(0)),
        FieldSpec::optional("project_order", "Project order", order()).with_default(json!(0)),
        FieldSpec::optional("start_date", "Start date", Rule::Date { not_before: None }),
        FieldSpec::optional("end_date", "End date", Rule::Date { not_before: Some("start_date") }),
    ]);
    Schema::new(fields)
});

/// Every field optional. Columns that may hold NULL accept an explicit
/// `null` to clear them. Date ordering against stored values is checked
/// by the caller once the current row is known.
pub static PROJECT_UPDATE: Lazy<Schema> = Lazy::new(|| {
    let mut fields = vec![
        FieldSpec::optional("title", "Title", text(1, 255)),
        FieldSpec::optional("slug", "Slug", slug()),
        FieldSpec::optional("description", "Description", text(1, 65535)),
        FieldSpec::nullable("short_description", "Short description", text(0, 500)),
        FieldSpec::optional("category", "Category", Rule::OneOf { values: Category::NAMES }),
        FieldSpec::optional("technologies", "Technologies", technologies()),
        FieldSpec::optional("tags", "Tags", tags()),
        FieldSpec::nullable("client", "Client", text(0, 255)),
    ];
    fields.extend(
        PROJECT_URL_FIELDS
            .iter()
            .map(|&(name, label)| FieldSpec::nullable(name, label, url())),
    );
    fields.extend([
        FieldSpec::optional("featured", "Featured", Rule::Boolean),
        FieldSpec::optional("published", "Published", Rule::Boolean),
        FieldSpec::optional("featured_order", "Featured order", order()),
        FieldSpec::optional("project_order", "Project order", order()),
        FieldSpec::nullable("start_date", "Start date", Rule::Date { not_before: None }),
        FieldSpec::nullable("end_date", "End date", Rule::Date { not_before: Some("start_date") }),
    ]);
    Schema::new(fields)
});

pub static PROJECT_IMAGE_CREATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::required("url", "Image URL", url()),
        FieldSpec::optional("alt_text", "Alt text", text(0, 255)),
        FieldSpec::optional("caption", "Caption", text(0, 500)),
        FieldSpec::optional("sort_order", "Sort order", order()).with_default(json!(0)),
    ])
});

pub static CONTACT_CREATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::required(
            "name",
            "Name",
            Rule::Text {
                min: 1,
                max: 255,
                pattern: Some(Pattern::new(
                    &PERSON_NAME_RE,
                    "Name can only contain letters, spaces, hyphens, and apostrophes",
                )),
            },
        ),
        FieldSpec::required("email", "Email", Rule::Email { max: 255 }),
        FieldSpec::optional(
            "phone",
            "Phone",
            Rule::Text {
                min: 0,
                max: 50,
                pattern: Some(Pattern::new(&PHONE_RE, "Please provide a valid phone number")),
            },
        ),
        FieldSpec::optional("company", "Company", text(0, 255)),
        FieldSpec::optional("subject", "Subject", text(0, 255)),
        FieldSpec::required("message", "Message", text(1, 10000)),
    ])
});

pub static CONTACT_STATUS_UPDATE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::required("status", "Status", Rule::OneOf { values: MessageStatus::NAMES }),
        FieldSpec::optional("priority", "Priority", Rule::OneOf { values: MessagePriority::NAMES }),
    ])
});

pub static SEARCH: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        FieldSpec::required("q", "Search query", text(1, 255)),
        FieldSpec::optional("limit", "Limit", Rule::Integer { min: Some(1), max: Some(MAX_SEARCH_LIMIT) })
            .with_default(json!(DEFAULT_PAGE_SIZE)),
    ])
});

fn limit_field(default_limit: i64, max_limit: i64) -> FieldSpec {
    FieldSpec::optional("limit", "Limit", Rule::Integer { min: Some(1), max: Some(max_limit) })
        .with_default(json!(default_limit.min(max_limit)))
}

fn offset_field() -> FieldSpec {
    FieldSpec::optional("offset", "Offset", Rule::Integer { min: Some(0), max: Some(i64::from(u32::MAX)) })
        .with_default(json!(0))
}

/// `limit` in `1..=max_limit` and `offset >= 0`.
pub fn pagination(default_limit: i64, max_limit: i64) -> Schema {
    Schema::new(vec![limit_field(default_limit, max_limit), offset_field()])
}

/// Pagination plus the project listing filters. `category` is a
/// comma-separated list checked by the caller.
pub fn project_listing(max_limit: i64) -> Schema {
    Schema::new(vec![
        limit_field(DEFAULT_PAGE_SIZE, max_limit),
        offset_field(),
        FieldSpec::optional("category", "Category", text(1, 255)),
        FieldSpec::optional("featured", "Featured", Rule::Boolean),
        FieldSpec::optional("published", "Published", Rule::Boolean),
    ])
}

pub fn contact_listing(max_limit: i64) -> Schema {
    Schema::new(vec![
        limit_field(DEFAULT_CONTACT_PAGE_SIZE, max_limit),
        offset_field(),
        FieldSpec::optional("status", "Status", Rule::OneOf { values: MessageStatus::NAMES }),
        FieldSpec::optional("priority", "Priority", Rule::OneOf { values: MessagePriority::NAMES }),
    ])
}

pub fn featured_limit(max_limit: i64) -> Schema {
    Schema::new(vec![limit_field(DEFAULT_FEATURED_LIMIT, max_limit)])
}
