//! Tests for the attribute filter processor

use super::*;

fn attr_filter(attribute: &str, operator: &str, value: &str) -> AttributeFilterProcessor {
    AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        attribute: Some(attribute.into()),
        path: None,
        operator: operator.into(),
        value: value.into(),
    })
    .unwrap()
}

fn path_filter(path: &str, operator: &str, value: &str) -> AttributeFilterProcessor {
    AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        attribute: None,
        path: Some(path.into()),
        operator: operator.into(),
        value: value.into(),
    })
    .unwrap()
}

fn dropped(processor: &AttributeFilterProcessor, record: &str) -> bool {
    processor
        .process(&ProcessContext::default(), Bytes::copy_from_slice(record.as_bytes()))
        .unwrap()
        .is_drop()
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_requires_attribute_xor_path() {
    let both = AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        attribute: Some("service.name".into()),
        path: Some("a/b".into()),
        operator: "equals".into(),
        value: "x".into(),
    });
    assert!(matches!(both, Err(TransformError::Config(_))));

    let neither = AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        ..Default::default()
    });
    assert!(matches!(neither, Err(TransformError::Config(_))));
}

#[test]
fn test_invalid_regex_rejected_at_construction() {
    let result = AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        attribute: Some("service.name".into()),
        operator: "regex".into(),
        value: "[unclosed".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(TransformError::Config(_))));
}

#[test]
fn test_unknown_operator_rejected() {
    let result = AttributeFilterProcessor::new(AttributeFilterConfig {
        name: "attr".into(),
        attribute: Some("service.name".into()),
        operator: "startswith".into(),
        value: "x".into(),
        ..Default::default()
    });
    assert!(matches!(result, Err(TransformError::Config(_))));
}

#[test]
fn test_empty_operator_defaults_to_equals() {
    let f = attr_filter("service.name", "", "auth-service");
    assert!(dropped(&f, r#"{"service":{"name":"auth-service"}}"#));
    assert!(!dropped(&f, r#"{"service":{"name":"other"}}"#));
}

// ============================================================================
// Fail-open behavior
// ============================================================================

#[test]
fn test_non_json_record_always_passes() {
    let f = attr_filter("service.name", "equals", "auth-service");

    assert!(!dropped(&f, "plain text log line"));
    assert!(!dropped(&f, "{not valid json"));
    assert!(!dropped(&f, ""));
}

#[test]
fn test_missing_attribute_passes() {
    let f = attr_filter("service.name", "equals", "auth-service");
    assert!(!dropped(&f, r#"{"body":"no service here"}"#));
}

#[test]
fn test_missing_explicit_path_passes() {
    let f = path_filter("metadata/labels/app.name", "equals", "my-app");
    assert!(!dropped(&f, r#"{"metadata":{"labels":{}}}"#));
}

// ============================================================================
// Attribute resolution
// ============================================================================

#[test]
fn test_equals_on_nested_resource_attributes() {
    let f = attr_filter("service.name", "equals", "auth-service");

    let record = r#"{"resource":{"attributes":{"service.name":"auth-service"}},"body":"hi"}"#;
    assert!(dropped(&f, record));
}

#[test]
fn test_equals_on_top_level_nested_form() {
    let f = attr_filter("service.name", "equals", "auth-service");
    assert!(dropped(&f, r#"{"service":{"name":"auth-service"}}"#));
}

#[test]
fn test_equals_on_flattened_resource_attributes() {
    let f = attr_filter("service.name", "equals", "auth-service");
    assert!(dropped(&f, r#"{"resourceAttributes":{"service.name":"auth-service"}}"#));
}

#[test]
fn test_equals_with_numeric_json_value() {
    let f = attr_filter("http.status_code", "equals", "200");

    assert!(dropped(&f, r#"{"http.status_code":200,"message":"ok"}"#));
    assert!(!dropped(&f, r#"{"http.status_code":404,"message":"gone"}"#));
}

#[test]
fn test_numeric_value_under_attributes() {
    let f = attr_filter("http.status_code", "equals", "500");
    assert!(dropped(&f, r#"{"attributes":{"http.status_code":500}}"#));
}

#[test]
fn test_log_level_severity_aliases() {
    let f = attr_filter("log.level", "equals", "debug");

    assert!(dropped(&f, r#"{"log":{"level":"debug"}}"#));
    assert!(dropped(&f, r#"{"severity":"debug"}"#));
    assert!(dropped(&f, r#"{"severityText":"debug"}"#));
    assert!(dropped(&f, r#"{"level":"debug"}"#));
    assert!(!dropped(&f, r#"{"level":"info"}"#));
}

#[test]
fn test_first_resolving_candidate_wins() {
    // Top-level nested form resolves before resource.attributes; the
    // comparand targets the top-level value.
    let f = attr_filter("service.name", "equals", "primary");
    let record = r#"{
        "service": {"name": "primary"},
        "resource": {"attributes": {"service.name": "secondary"}}
    }"#;
    assert!(dropped(&f, record));

    let f = attr_filter("service.name", "equals", "secondary");
    assert!(!dropped(&f, record));
}

#[test]
fn test_custom_attribute_uses_generic_fallbacks() {
    let f = attr_filter("team.owner", "equals", "core");

    assert!(dropped(&f, r#"{"team.owner":"core"}"#));
    assert!(dropped(&f, r#"{"attributes":{"team.owner":"core"}}"#));
    assert!(dropped(&f, r#"{"resource":{"attributes":{"team.owner":"core"}}}"#));
    assert!(dropped(&f, r#"{"body":{"team.owner":"core"}}"#));
    assert!(!dropped(&f, r#"{"other":{"team.owner":"core"}}"#));
}

// ============================================================================
// Explicit paths
// ============================================================================

#[test]
fn test_explicit_path_with_dotted_key() {
    let f = path_filter("metadata/labels/app.name", "equals", "my-app");
    assert!(dropped(&f, r#"{"metadata":{"labels":{"app.name":"my-app"}}}"#));
}

#[test]
fn test_explicit_path_is_used_verbatim() {
    // Explicit paths do not fall back to generic locations.
    let f = path_filter("level", "equals", "debug");
    assert!(dropped(&f, r#"{"level":"debug"}"#));
    assert!(!dropped(&f, r#"{"attributes":{"level":"debug"}}"#));
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_contains_operator() {
    let f = attr_filter("http.url", "contains", "/internal/");

    assert!(dropped(&f, r#"{"http.url":"https://api.example.com/internal/health"}"#));
    assert!(!dropped(&f, r#"{"http.url":"https://api.example.com/public"}"#));
}

#[test]
fn test_regex_operator() {
    // No explicit anchors needed: the pattern must span the whole value.
    let f = attr_filter("http.status_code", "regex", "5\\d\\d");

    assert!(dropped(&f, r#"{"http.status_code":500}"#));
    assert!(dropped(&f, r#"{"http.status_code":503}"#));
    assert!(!dropped(&f, r#"{"http.status_code":200}"#));
    assert!(!dropped(&f, r#"{"http.status_code":5000}"#));
}

#[test]
fn test_regex_requires_a_full_match() {
    // A partial hit is not a match: "error" inside "error_rate" passes.
    let f = attr_filter("log.level", "regex", "error");
    assert!(dropped(&f, r#"{"level":"error"}"#));
    assert!(!dropped(&f, r#"{"level":"error_rate"}"#));
    assert!(!dropped(&f, r#"{"level":"preerror"}"#));

    let f = attr_filter("log.level", "regex", "warn(ing)?");
    assert!(dropped(&f, r#"{"level":"warn"}"#));
    assert!(dropped(&f, r#"{"level":"warning"}"#));
    assert!(!dropped(&f, r#"{"level":"warnings"}"#));
}

#[test]
fn test_boolean_values_compare_canonically() {
    let f = attr_filter("internal.sampled", "equals", "true");
    assert!(dropped(&f, r#"{"internal.sampled":true}"#));
    assert!(!dropped(&f, r#"{"internal.sampled":false}"#));
}
