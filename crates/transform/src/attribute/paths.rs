//! JSON path dialect for attribute resolution
//!
//! Paths are `.`-separated key segments; `\.` escapes a dot that is part of
//! a key name. `resource.attributes.service\.name` walks `resource`, then
//! `attributes`, then the literal key `service.name`.
//!
//! User-facing paths use `/` as the separator so key names may contain dots
//! without escaping; [`convert_user_path`] translates them into the dialect.

use serde_json::Value;

#[cfg(test)]
#[path = "paths_test.rs"]
mod tests;

/// Well-known telemetry attributes and the places they are usually found.
///
/// Attribute-mode filters try these locations in order before falling back
/// to [`generic_paths`]. The first path that resolves wins.
pub(crate) fn well_known_paths(attribute: &str) -> Option<&'static [&'static str]> {
    let paths: &[&str] = match attribute {
        // Service identification
        "service.name" => &[
            "service.name",
            "resource.attributes.service\\.name",
            "resourceAttributes.service\\.name",
            "resource.service\\.name",
        ],
        "service.namespace" => &[
            "service.namespace",
            "resource.attributes.service\\.namespace",
            "resourceAttributes.service\\.namespace",
            "resource.service\\.namespace",
        ],
        "service.version" => &[
            "service.version",
            "resource.attributes.service\\.version",
            "resourceAttributes.service\\.version",
            "resource.service\\.version",
        ],

        // Deployment
        "deployment.environment" => &[
            "deployment.environment",
            "resource.attributes.deployment\\.environment",
            "resourceAttributes.deployment\\.environment",
            "resource.deployment\\.environment",
        ],

        // HTTP attributes
        "http.status_code" => &[
            "http.status_code",
            "attributes.http\\.status_code",
            "http\\.status_code",
        ],
        "http.method" => &["http.method", "attributes.http\\.method", "http\\.method"],
        "http.url" => &["http.url", "attributes.http\\.url", "http\\.url"],
        "http.target" => &["http.target", "attributes.http\\.target", "http\\.target"],

        // Logging
        "log.level" => &["log.level", "severity", "severityText", "level"],

        _ => return None,
    };
    Some(paths)
}

/// Fallback locations tried for any attribute, with its dots escaped
pub(crate) fn generic_paths(attribute: &str) -> Vec<String> {
    let escaped = escape_key(attribute);
    vec![
        escaped.clone(),
        format!("attributes.{escaped}"),
        format!("resource.attributes.{escaped}"),
        format!("resourceAttributes.{escaped}"),
        format!("body.{escaped}"),
    ]
}

/// Convert a user-facing path (`/`-separated) into the internal dialect.
///
/// Splits on `/` and escapes every literal `.` within each segment, so
/// `metadata/labels/app.name` becomes `metadata.labels.app\.name`.
pub fn convert_user_path(user_path: &str) -> String {
    user_path
        .split('/')
        .map(escape_key)
        .collect::<Vec<_>>()
        .join(".")
}

/// Escape literal dots in a single key name
fn escape_key(key: &str) -> String {
    key.replace('.', "\\.")
}

/// Parse a dialect path into its key segments, honoring `\.` escapes
pub(crate) fn parse_path(path: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            '.' => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    segments.push(current);
    segments
}

/// Walk a parsed path through nested JSON objects
pub(crate) fn lookup<'a>(root: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = root;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Canonical string form of a resolved JSON value.
///
/// Numbers render unquoted (`200`, not `"200"`), booleans as `true`/`false`,
/// null as `null`, and compound values as compact JSON. This is the single
/// form all comparison operators evaluate against.
pub(crate) fn canonical_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
