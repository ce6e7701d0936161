//! Integration test: load manifests from disk, compile their models, and
//! validate documents against the result.

use std::path::PathBuf;

use jsm_schema::{
    compare_schemas, validate_document, CatalogError, DocumentValidationError, ModelCatalog,
    SchemaError,
};
use serde_json::{json, Value};

/// Find the repository root.
fn repo_root() -> PathBuf {
    let mut dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    dir.pop(); // crates/
    dir.pop(); // repo root
    dir
}

fn fixture(name: &str) -> Value {
    let content = std::fs::read_to_string(repo_root().join("fixtures").join(name)).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn people() -> ModelCatalog {
    ModelCatalog::from_path(repo_root().join("fixtures/people.yaml")).unwrap()
}

#[test]
fn test_yaml_manifest_matches_typed_fixtures() {
    let catalog = people();
    assert!(compare_schemas(&fixture("schema2.json"), &catalog.compile("Person").unwrap()));
    assert!(compare_schemas(&fixture("schema3.json"), &catalog.compile("Driver").unwrap()));
}

#[test]
fn test_manifest_order_preserved() {
    let names = people().names().iter().map(|s| s.to_string()).collect::<Vec<_>>();
    assert_eq!(names.first().map(String::as_str), Some("Person"));
    assert_eq!(names.last().map(String::as_str), Some("Adult"));
    assert_eq!(names.len(), 11);
}

#[test]
fn test_inherited_manifest_model() {
    let schema = people().compile("Adult").unwrap();
    let keys: Vec<&String> = schema["properties"].as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["name", "surname", "age", "kids", "car", "nickname"]);
    assert_eq!(schema["properties"]["age"], json!({"type": "integer", "minimum": 18}));
    assert_eq!(
        schema["properties"]["nickname"],
        json!({"type": "string", "minLength": 2, "maxLength": 12, "pattern": "(?i)^[a-z]+$"})
    );
    assert!(compare_schemas(
        &json!({"required": ["age", "name", "surname"]}),
        &json!({"required": schema["required"]})
    ));
}

#[test]
fn test_json_manifest_from_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.json");
    std::fs::write(
        &path,
        json!({
            "models": [
                {"name": "Event", "fields": [
                    {"name": "time", "kind": "time"},
                    {"name": "date", "kind": "date"},
                    {"name": "end", "kind": "datetime"}
                ]},
                {"name": "Person", "fields": [
                    {"name": "names", "kind": "list", "target": ["string", "int", "Event"]}
                ]}
            ]
        })
        .to_string(),
    )
    .unwrap();

    let catalog = ModelCatalog::from_path(&path).unwrap();
    assert!(compare_schemas(&fixture("schema4.json"), &catalog.compile("Event").unwrap()));
    assert!(compare_schemas(
        &fixture("schema_with_list.json"),
        &catalog.compile("Person").unwrap()
    ));
}

#[test]
fn test_missing_manifest_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = ModelCatalog::from_path(dir.path().join("absent.yaml")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_malformed_yaml_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "models:\n  - name: [unclosed\n").unwrap();
    let err = ModelCatalog::from_path(&path).unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}

#[test]
fn test_unknown_model_name() {
    assert_eq!(
        people().compile("Nobody").unwrap_err(),
        SchemaError::UnknownModel("Nobody".to_string())
    );
}

#[test]
fn test_documents_validated_against_compiled_schema() {
    let schema = people().compile("Adult").unwrap();

    let valid = json!({
        "name": "Chuck",
        "surname": "Norris",
        "age": 42,
        "nickname": "Walker",
        "car": {"brand": "Dodge", "registration": "TX 1"},
        "kids": [{"name": "Eric", "surname": "Norris", "toys": [{"name": "ball"}]}]
    });
    validate_document("Adult", &schema, &valid).unwrap();

    let invalid = json!({
        "name": "Chuck",
        "surname": "Norris",
        "age": 17,
        "kids": [{"name": "Eric"}]
    });
    match validate_document("Adult", &schema, &invalid).unwrap_err() {
        DocumentValidationError::ValidationFailed { model, violations } => {
            assert_eq!(model, "Adult");
            let pointers: Vec<&str> = violations.iter().map(|v| v.pointer.as_str()).collect();
            assert!(pointers.contains(&"/age"), "pointers: {pointers:?}");
            assert!(pointers.contains(&"/kids/0"), "pointers: {pointers:?}");
            assert_eq!(
                violations.fields().into_iter().collect::<Vec<_>>(),
                ["age", "kids"]
            );
        }
        other => panic!("Expected ValidationFailed, got: {other}"),
    }
}
