use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;
use validator::ValidateEmail;

use crate::errors::FieldError;

/// A field-name → value map as it arrives from a body or a query string.
pub type Record = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: &'static Regex,
    pub message: &'static str,
}

impl Pattern {
    pub fn new(regex: &'static Regex, message: &'static str) -> Self {
        Pattern { regex, message }
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Text {
        min: usize,
        max: usize,
        pattern: Option<Pattern>,
    },
    Email {
        max: usize,
    },
    Url {
        max: usize,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Boolean,
    OneOf {
        values: &'static [&'static str],
    },
    /// ISO-8601 date, normalized to `YYYY-MM-DD`. `not_before` names another
    /// date field of the same schema that this one may not precede.
    Date {
        not_before: Option<&'static str>,
    },
    TextList {
        max_items: usize,
        max_item_len: usize,
        unique: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    /// Optional, and an explicit `null` is kept to clear the value.
    Nullable,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub presence: Presence,
    pub rule: Rule,
    pub default: Option<Value>,
}

impl FieldSpec {
    pub fn required(name: &'static str, label: &'static str, rule: Rule) -> Self {
        FieldSpec { name, label, presence: Presence::Required, rule, default: None }
    }

    pub fn optional(name: &'static str, label: &'static str, rule: Rule) -> Self {
        FieldSpec { name, label, presence: Presence::Optional, rule, default: None }
    }

    pub fn nullable(name: &'static str, label: &'static str, rule: Rule) -> Self {
        FieldSpec { name, label, presence: Presence::Nullable, rule, default: None }
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Schema { fields }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Evaluates `schema` against `data`.
///
/// Every field is checked and all failures are reported together. On success
/// the returned map holds only declared fields, with defaults applied and
/// values coerced to their canonical JSON form.
pub fn validate(schema: &Schema, data: &Record) -> Result<Record, Vec<FieldError>> {
    let mut normalized = Record::new();
    let mut errors = Vec::new();

    for rule_field in schema.fields() {
        match data.get(rule_field.name) {
            None | Some(Value::Null) if rule_field.presence == Presence::Required => {
                errors.push(FieldError::new(rule_field.name, format!("{} is required", rule_field.label)));
            }
            None => {
                if let Some(default) = &rule_field.default {
                    normalized.insert(rule_field.name.to_string(), default.clone());
                }
            }
            Some(Value::Null) => {
                if rule_field.presence == Presence::Nullable {
                    normalized.insert(rule_field.name.to_string(), Value::Null);
                } else {
                    errors.push(FieldError::new(rule_field.name, format!("{} cannot be null", rule_field.label)));
                }
            }
            Some(value) => match check(rule_field, value) {
                Ok(v) => {
                    normalized.insert(rule_field.name.to_string(), v);
                }
                Err(message) => errors.push(FieldError::new(rule_field.name, message)),
            },
        }
    }

    check_date_order(schema, &normalized, &mut errors);

    if errors.is_empty() {
        Ok(normalized)
    } else {
        Err(errors)
    }
}

/// Same as [`validate`] for an arbitrary JSON body.
pub fn validate_value(schema: &Schema, data: &Value) -> Result<Record, Vec<FieldError>> {
    match data {
        Value::Object(map) => validate(schema, map),
        Value::Null => validate(schema, &Record::new()),
        _ => Err(vec![FieldError::new("body", "Request body must be a JSON object")]),
    }
}

fn check_date_order(schema: &Schema, normalized: &Record, errors: &mut Vec<FieldError>) {
    for rule_field in schema.fields() {
        let Rule::Date { not_before: Some(other) } = &rule_field.rule else {
            continue;
        };
        if errors.iter().any(|e| e.field == rule_field.name || e.field == *other) {
            continue;
        }

        let this = normalized.get(rule_field.name).and_then(Value::as_str).and_then(parse_iso_date);
        let earlier = normalized.get(*other).and_then(Value::as_str).and_then(parse_iso_date);

        if let (Some(this), Some(earlier)) = (this, earlier) {
            if this < earlier {
                let other_label = schema.field(other).map(|f| f.label).unwrap_or(*other);
                errors.push(FieldError::new(
                    rule_field.name,
                    format!("{} must be after {}", rule_field.label, other_label.to_lowercase()),
                ));
            }
        }
    }
}

fn check(rule_field: &FieldSpec, value: &Value) -> Result<Value, String> {
    let label = rule_field.label;

    match &rule_field.rule {
        Rule::Text { min, max, pattern } => {
            let s = expect_text(label, value)?;
            let len = s.chars().count();
            if len < *min {
                return Err(format!("{label} must be at least {min} characters"));
            }
            if len > *max {
                return Err(format!("{label} cannot exceed {max} characters"));
            }
            if let Some(pattern) = pattern {
                if !pattern.regex.is_match(s) {
                    return Err(pattern.message.to_string());
                }
            }
            Ok(Value::String(s.to_string()))
        }
        Rule::Email { max } => {
            let s = expect_text(label, value)?;
            if s.chars().count() > *max {
                return Err(format!("{label} cannot exceed {max} characters"));
            }
            if !s.validate_email() {
                return Err("Please provide a valid email address".to_string());
            }
            Ok(Value::String(s.to_string()))
        }
        Rule::Url { max } => {
            let s = expect_text(label, value)?;
            if s.chars().count() > *max {
                return Err(format!("{label} cannot exceed {max} characters"));
            }
            if !is_web_url(s) {
                return Err(format!("{label} must be a valid URL"));
            }
            Ok(Value::String(s.to_string()))
        }
        Rule::Integer { min, max } => {
            let n = coerce_integer(value).ok_or_else(|| format!("{label} must be an integer"))?;
            if let Some(min) = min {
                if n < *min {
                    return Err(format!("{label} must be {min} or greater"));
                }
            }
            if let Some(max) = max {
                if n > *max {
                    return Err(format!("{label} cannot exceed {max}"));
                }
            }
            Ok(Value::from(n))
        }
        Rule::Boolean => coerce_bool(value)
            .map(Value::Bool)
            .ok_or_else(|| format!("{label} must be a boolean")),
        Rule::OneOf { values } => match value.as_str() {
            Some(s) if values.contains(&s) => Ok(Value::String(s.to_string())),
            _ => Err(format!("{label} must be one of: {}", values.join(", "))),
        },
        Rule::Date { .. } => {
            let s = expect_text(label, value)?;
            parse_iso_date(s)
                .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                .ok_or_else(|| format!("{label} must be a valid ISO date"))
        }
        Rule::TextList { max_items, max_item_len, unique } => {
            let items = value.as_array().ok_or_else(|| format!("{label} must be a list"))?;
            if items.len() > *max_items {
                return Err(format!("{label} cannot have more than {max_items} entries"));
            }

            let mut out: Vec<String> = Vec::with_capacity(items.len());
            for item in items {
                let s = item
                    .as_str()
                    .ok_or_else(|| format!("{label} entries must be strings"))?;
                if s.is_empty() {
                    return Err(format!("{label} entries cannot be empty"));
                }
                if s.chars().count() > *max_item_len {
                    return Err(format!("{label} entries cannot exceed {max_item_len} characters"));
                }
                if *unique && out.iter().any(|existing| existing == s) {
                    continue;
                }
                out.push(s.to_string());
            }
            Ok(Value::from(out))
        }
    }
}

fn expect_text<'a>(label: &str, value: &'a Value) -> Result<&'a str, String> {
    match value.as_str() {
        Some("") => Err(format!("{label} cannot be empty")),
        Some(s) => Ok(s),
        None => Err(format!("{label} must be a string")),
    }
}

fn coerce_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn is_web_url(s: &str) -> bool {
    match Url::parse(s) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host().is_some(),
        Err(_) => false,
    }
}

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}
