use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static ANGLE_BRACKETS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[<>]").expect("valid regex"));
static SCRIPT_PROTOCOL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)javascript:").expect("valid regex"));
static EVENT_HANDLER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)on\w+=").expect("valid regex"));

/// Strips markup delimiters, `javascript:` and inline `on*=` handlers, then trims.
///
/// Passes repeat until nothing changes, so a removal cannot splice a new
/// match together (`javajavascript:script:`).
pub fn sanitize_str(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = {
            let stripped = ANGLE_BRACKETS.replace_all(&current, "");
            let stripped = SCRIPT_PROTOCOL.replace_all(&stripped, "");
            EVENT_HANDLER.replace_all(&stripped, "").into_owned()
        };
        if next == current {
            break;
        }
        current = next;
    }
    current.trim().to_string()
}

/// Sanitizes every string inside `value`; other JSON types pass through.
pub fn sanitize_text(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_str(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_text).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, v)| (key, sanitize_text(v)))
                .collect(),
        ),
        other => other,
    }
}
