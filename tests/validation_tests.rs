use dh_portfolio_backend::{
    errors::{AppError, FieldError},
    validation::{
        clean_payload, parse_iso_date, sanitize_str, sanitize_text, schemas, validate, validate_id,
        validate_value, FieldSpec, Record, Rule, Schema,
    },
};
use serde_json::{json, Value};

fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn message_for<'a>(errors: &'a [FieldError], field: &str) -> Option<&'a str> {
    errors.iter().find(|e| e.field == field).map(|e| e.message.as_str())
}

fn valid_project() -> Value {
    json!({
        "title": "My Project",
        "slug": "my-project",
        "description": "Does things",
        "category": "web",
    })
}

#[test]
fn omitted_and_empty_required_fields_report_different_messages() {
    let errors = validate(&schemas::CONTACT_CREATE, &record(json!({
        "name": "",
        "message": "Hello",
    })))
    .unwrap_err();

    assert_eq!(message_for(&errors, "name"), Some("Name cannot be empty"));
    assert_eq!(message_for(&errors, "email"), Some("Email is required"));
    assert_eq!(message_for(&errors, "message"), None);
}

#[test]
fn all_failures_are_reported_together() {
    let errors = validate(&schemas::PROJECT_CREATE, &record(json!({
        "slug": "Bad Slug",
        "category": "sculpture",
    })))
    .unwrap_err();

    let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"slug"));
    assert!(fields.contains(&"description"));
    assert!(fields.contains(&"category"));
    assert_eq!(
        message_for(&errors, "slug"),
        Some("Slug must contain only lowercase letters, numbers, and hyphens")
    );
}

#[test]
fn category_accepts_every_member_and_nothing_else() {
    for category in ["web", "mobile", "3d", "animation", "illustration", "game", "other"] {
        let mut body = valid_project();
        body["category"] = json!(category);
        assert!(validate_value(&schemas::PROJECT_CREATE, &body).is_ok(), "{category} rejected");
    }

    for category in ["Web", "desktop", "", "3D"] {
        let mut body = valid_project();
        body["category"] = json!(category);
        let errors = validate_value(&schemas::PROJECT_CREATE, &body).unwrap_err();
        assert!(message_for(&errors, "category").is_some(), "{category} accepted");
    }
}

#[test]
fn create_defaults_are_applied() {
    let normalized = validate_value(&schemas::PROJECT_CREATE, &valid_project()).unwrap();

    assert_eq!(normalized["technologies"], json!([]));
    assert_eq!(normalized["tags"], json!([]));
    assert_eq!(normalized["featured"], json!(false));
    assert_eq!(normalized["published"], json!(true));
    assert_eq!(normalized["featured_order"], json!(0));
    assert_eq!(normalized["project_order"], json!(0));
    assert!(!normalized.contains_key("client"));
}

#[test]
fn unknown_fields_are_dropped() {
    let mut body = valid_project();
    body["id"] = json!(42);
    body["created_at"] = json!("2020-01-01");

    let normalized = validate_value(&schemas::PROJECT_CREATE, &body).unwrap();
    assert!(!normalized.contains_key("id"));
    assert!(!normalized.contains_key("created_at"));
}

#[test]
fn end_date_before_start_date_is_rejected() {
    let mut body = valid_project();
    body["start_date"] = json!("2024-05-01");
    body["end_date"] = json!("2024-04-30");

    let errors = validate_value(&schemas::PROJECT_CREATE, &body).unwrap_err();
    assert_eq!(message_for(&errors, "end_date"), Some("End date must be after start date"));
}

#[test]
fn dates_are_normalized_to_calendar_dates() {
    let mut body = valid_project();
    body["start_date"] = json!("2024-05-01T12:30:00Z");

    let normalized = validate_value(&schemas::PROJECT_CREATE, &body).unwrap();
    assert_eq!(normalized["start_date"], json!("2024-05-01"));

    assert!(parse_iso_date("2024-02-30").is_none());
    assert!(parse_iso_date("yesterday").is_none());
}

#[test]
fn urls_must_be_http_or_https() {
    let mut body = valid_project();
    body["github_url"] = json!("ftp://example.com/repo");
    body["demo_url"] = json!("https://demo.example.com");

    let errors = validate_value(&schemas::PROJECT_CREATE, &body).unwrap_err();
    assert_eq!(message_for(&errors, "github_url"), Some("GitHub URL must be a valid URL"));
    assert_eq!(message_for(&errors, "demo_url"), None);
}

#[test]
fn tags_are_deduplicated_and_technologies_are_not() {
    let mut body = valid_project();
    body["tags"] = json!(["rust", "web", "rust"]);
    body["technologies"] = json!(["Rust", "Rust"]);

    let normalized = validate_value(&schemas::PROJECT_CREATE, &body).unwrap();
    assert_eq!(normalized["tags"], json!(["rust", "web"]));
    assert_eq!(normalized["technologies"], json!(["Rust", "Rust"]));
}

#[test]
fn list_limits_are_enforced() {
    let mut body = valid_project();
    body["tags"] = json!((0..16).map(|i| format!("tag-{i}")).collect::<Vec<_>>());

    let errors = validate_value(&schemas::PROJECT_CREATE, &body).unwrap_err();
    assert_eq!(message_for(&errors, "tags"), Some("Tags cannot have more than 15 entries"));
}

#[test]
fn update_keeps_explicit_nulls_only_for_nullable_fields() {
    let normalized = validate_value(&schemas::PROJECT_UPDATE, &json!({
        "client": null,
        "featured": true,
    }))
    .unwrap();
    assert_eq!(normalized["client"], Value::Null);
    assert_eq!(normalized["featured"], json!(true));
    assert_eq!(normalized.len(), 2);

    let errors = validate_value(&schemas::PROJECT_UPDATE, &json!({ "title": null })).unwrap_err();
    assert_eq!(message_for(&errors, "title"), Some("Title cannot be null"));
}

#[test]
fn query_strings_are_coerced() {
    let normalized = validate(&schemas::project_listing(100), &record(json!({
        "limit": "10",
        "offset": "20",
        "featured": "true",
    })))
    .unwrap();

    assert_eq!(normalized["limit"], json!(10));
    assert_eq!(normalized["offset"], json!(20));
    assert_eq!(normalized["featured"], json!(true));
}

#[test]
fn pagination_bounds_are_checked() {
    let schema = schemas::pagination(20, 100);

    let errors = validate(&schema, &record(json!({ "limit": "0", "offset": "-1" }))).unwrap_err();
    assert_eq!(message_for(&errors, "limit"), Some("Limit must be 1 or greater"));
    assert_eq!(message_for(&errors, "offset"), Some("Offset must be 0 or greater"));

    let errors = validate(&schema, &record(json!({ "limit": "101" }))).unwrap_err();
    assert_eq!(message_for(&errors, "limit"), Some("Limit cannot exceed 100"));

    let errors = validate(&schema, &record(json!({ "limit": "ten" }))).unwrap_err();
    assert_eq!(message_for(&errors, "limit"), Some("Limit must be an integer"));

    let normalized = validate(&schema, &Record::new()).unwrap();
    assert_eq!(normalized["limit"], json!(20));
    assert_eq!(normalized["offset"], json!(0));
}

#[test]
fn contact_name_and_phone_patterns() {
    let errors = validate_value(&schemas::CONTACT_CREATE, &json!({
        "name": "R2-D2",
        "email": "r2@example.com",
        "phone": "call me",
        "message": "Beep",
    }))
    .unwrap_err();

    assert_eq!(
        message_for(&errors, "name"),
        Some("Name can only contain letters, spaces, hyphens, and apostrophes")
    );
    assert_eq!(message_for(&errors, "phone"), Some("Please provide a valid phone number"));
}

#[test]
fn contact_email_format_is_checked() {
    let errors = validate_value(&schemas::CONTACT_CREATE, &json!({
        "name": "Jane Doe",
        "email": "not-an-email",
        "message": "Hello",
    }))
    .unwrap_err();

    assert_eq!(message_for(&errors, "email"), Some("Please provide a valid email address"));
}

#[test]
fn status_update_accepts_only_known_values() {
    assert!(validate_value(&schemas::CONTACT_STATUS_UPDATE, &json!({ "status": "replied" })).is_ok());

    let errors = validate_value(&schemas::CONTACT_STATUS_UPDATE, &json!({
        "status": "deleted",
        "priority": "urgent",
    }))
    .unwrap_err();
    assert_eq!(
        message_for(&errors, "status"),
        Some("Status must be one of: unread, read, replied, archived")
    );
    assert_eq!(message_for(&errors, "priority"), Some("Priority must be one of: low, medium, high"));
}

#[test]
fn non_object_bodies_are_rejected() {
    let errors = validate_value(&schemas::CONTACT_CREATE, &json!(["name"])).unwrap_err();
    assert_eq!(errors, vec![FieldError::new("body", "Request body must be a JSON object")]);
}

#[test]
fn custom_schema_text_bounds() {
    let schema = Schema::new(vec![FieldSpec::required(
        "code",
        "Code",
        Rule::Text { min: 3, max: 5, pattern: None },
    )]);

    let errors = validate(&schema, &record(json!({ "code": "ab" }))).unwrap_err();
    assert_eq!(message_for(&errors, "code"), Some("Code must be at least 3 characters"));

    let errors = validate(&schema, &record(json!({ "code": "abcdef" }))).unwrap_err();
    assert_eq!(message_for(&errors, "code"), Some("Code cannot exceed 5 characters"));

    let errors = validate(&schema, &record(json!({ "code": 123 }))).unwrap_err();
    assert_eq!(message_for(&errors, "code"), Some("Code must be a string"));
}

#[test]
fn sanitize_strips_markup_and_script_vectors() {
    assert_eq!(sanitize_str("  <b>Hello</b>  "), "bHello/b");
    assert_eq!(sanitize_str("JavaScript:alert(1)"), "alert(1)");
    assert_eq!(sanitize_str("x onclick=steal()"), "x steal()");
    assert_eq!(sanitize_str("javajavascript:script:go"), "go");
    assert_eq!(sanitize_str("plain text"), "plain text");
}

#[test]
fn sanitize_walks_nested_values() {
    let cleaned = sanitize_text(json!({
        "title": " <i>Title</i> ",
        "tags": ["<x>", "ok"],
        "featured": true,
        "order": 3,
    }));

    assert_eq!(cleaned, json!({
        "title": "iTitle/i",
        "tags": ["x", "ok"],
        "featured": true,
        "order": 3,
    }));
}

#[test]
fn clean_payload_sanitizes_before_validating() {
    // Only markup: empty once sanitized.
    let err = clean_payload(&schemas::CONTACT_CREATE, json!({
        "name": "Jane Doe",
        "email": "jane@x.com",
        "message": "<>",
    }))
    .unwrap_err();

    match err {
        AppError::ValidationError(errors) => {
            assert_eq!(message_for(&errors, "message"), Some("Message cannot be empty"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn ids_must_be_positive_integers() {
    assert_eq!(validate_id("42").unwrap(), 42);
    assert_eq!(validate_id(" 7 ").unwrap(), 7);

    for raw in ["0", "-1", "abc", "", "1.5"] {
        match validate_id(raw) {
            Err(AppError::ValidationError(errors)) => {
                assert_eq!(errors, vec![FieldError::new("id", "Invalid ID parameter")]);
            }
            other => panic!("{raw:?} gave {other:?}"),
        }
    }
}

#[test]
fn slugs() {
    assert!(schemas::is_valid_slug("my-project-2"));
    assert!(!schemas::is_valid_slug("My-Project"));
    assert!(!schemas::is_valid_slug("my_project"));
    assert!(!schemas::is_valid_slug(""));
}
