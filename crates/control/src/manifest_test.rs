//! Tests for manifest parsing

use super::*;

#[test]
fn test_parses_full_manifest() {
    let raw = r#"{
        "version": "3",
        "pipelines": [{
            "name": "default_pipeline",
            "batch_size": 250,
            "processors": [
                {"id": "f1", "type": "filter", "params": {"value": "noise"}},
                {"id": "r1", "type": "redact",
                 "params": {"pattern": "secret", "replacement": "xxxx"}}
            ],
            "outputs": [
                {"type": "http", "url": "http://collector:9000/ingest",
                 "headers": {"X-Api-Key": "k"}},
                {"type": "console"}
            ]
        }]
    }"#;

    let manifest = Manifest::parse(raw).unwrap();
    assert_eq!(manifest.version, "3");
    assert_eq!(manifest.pipelines.len(), 1);

    let pipeline = &manifest.pipelines[0];
    assert_eq!(pipeline.name, "default_pipeline");
    assert_eq!(pipeline.effective_batch_size(), 250);

    assert_eq!(pipeline.processors.len(), 2);
    assert_eq!(pipeline.processors[0].kind, "filter");
    assert_eq!(pipeline.processors[0].params["value"], "noise");
    assert_eq!(pipeline.processors[1].id, "r1");

    assert_eq!(pipeline.outputs.len(), 2);
    assert_eq!(pipeline.outputs[0].kind, "http");
    assert_eq!(pipeline.outputs[0].url, "http://collector:9000/ingest");
    assert_eq!(pipeline.outputs[0].headers["X-Api-Key"], "k");
    assert_eq!(pipeline.outputs[1].kind, "console");
    assert!(pipeline.outputs[1].url.is_empty());
}

#[test]
fn test_missing_batch_size_defaults_to_100() {
    let raw = r#"{"version": "1", "pipelines": [{"name": "p"}]}"#;
    let manifest = Manifest::parse(raw).unwrap();
    assert_eq!(manifest.pipelines[0].effective_batch_size(), 100);
}

#[test]
fn test_zero_batch_size_defaults_to_100() {
    let raw = r#"{"version": "1", "pipelines": [{"name": "p", "batch_size": 0}]}"#;
    let manifest = Manifest::parse(raw).unwrap();
    assert_eq!(manifest.pipelines[0].effective_batch_size(), 100);
}

#[test]
fn test_empty_pipelines_is_valid() {
    let manifest = Manifest::parse(r#"{"version": "1"}"#).unwrap();
    assert!(manifest.pipelines.is_empty());
}

#[test]
fn test_invalid_json_is_an_error() {
    assert!(matches!(
        Manifest::parse("{not json"),
        Err(ControlError::Manifest(_))
    ));
    assert!(matches!(
        Manifest::parse(r#"{"pipelines": "nope"}"#),
        Err(ControlError::Manifest(_))
    ));
}

#[test]
fn test_processor_rule_requires_a_type() {
    let raw = r#"{"pipelines": [{"processors": [{"id": "p1"}]}]}"#;
    assert!(matches!(
        Manifest::parse(raw),
        Err(ControlError::Manifest(_))
    ));
}
