//! Tests for reading and building schemas.

use std::fs;
use std::sync::Arc;

use jsv::{
    InstanceType, KeywordKind, LoadError, ReadWarning, ReaderOptions, Schema, SchemaBuilder,
    SchemaError, SchemaReader, Validator,
};
use serde_json::json;
use tempfile::TempDir;

// =========================================================================
// Reading
// =========================================================================

#[test]
fn boolean_and_empty_documents() {
    let mut reader = SchemaReader::new();
    assert!(matches!(*reader.read_str("true").unwrap(), Schema::True));
    assert!(matches!(*reader.read_str("false").unwrap(), Schema::False));
    assert!(matches!(*reader.read_str("{}").unwrap(), Schema::Empty));
}

#[test]
fn assertions_read_as_simple_and_applicators_as_complex() {
    let mut reader = SchemaReader::new();
    let simple = reader.read_str(r#"{"type": "string", "maxLength": 3}"#).unwrap();
    assert!(matches!(*simple, Schema::Simple(_)));

    let complex = reader
        .read_str(r#"{"type": "object", "properties": {"a": true}}"#)
        .unwrap();
    assert!(matches!(*complex, Schema::Complex(_)));
}

#[test]
fn schemas_render_back_to_their_source() {
    let text = r#"{"type":["string","null"],"pattern":"^a","properties":{"b":false}}"#;
    let schema = SchemaReader::new().read_str(text).unwrap();
    assert_eq!(schema.to_string(), text);
    assert_eq!(
        schema.to_json(),
        json!({"type": ["string", "null"], "pattern": "^a", "properties": {"b": false}})
    );
}

#[test]
fn annotations_are_exposed() {
    let schema = SchemaReader::new()
        .read_str(
            r#"{
                "$schema": "http://json-schema.org/draft-07/schema#",
                "title": "Point",
                "description": "A point on the plane",
                "default": {"x": 0},
                "format": "point"
            }"#,
        )
        .unwrap();
    assert_eq!(schema.title(), Some("Point"));
    assert_eq!(schema.description(), Some("A point on the plane"));
    assert_eq!(schema.default_value(), Some(&json!({"x": 0})));
    assert!(schema.contains_keyword("format"));
    assert!(schema.contains_keyword("$schema"));
    assert!(!schema.contains_keyword("type"));

    assert!(Validator::validate_str(&schema, "[]").is_valid());
}

#[test]
fn invalid_documents_are_rejected() {
    let mut reader = SchemaReader::new();
    assert!(matches!(
        reader.read_str(r#"{"type": }"#),
        Err(SchemaError::InvalidJson { line: 1, .. })
    ));
    assert!(matches!(
        reader.read_str("[true]"),
        Err(SchemaError::NotASchema { .. })
    ));
    assert!(matches!(
        reader.read_str(r#"{"allOf": [true, 3]}"#),
        Err(SchemaError::NotASchema { ref path }) if path == "/allOf/1"
    ));
    assert!(matches!(
        reader.read_str(r#"{"pattern": "[a-"}"#),
        Err(SchemaError::InvalidRegex { .. })
    ));
}

#[test]
fn invalid_keyword_values_name_the_keyword() {
    let cases = [
        (r#"{"type": "text"}"#, "#: invalid value for 'type': unknown type 'text'"),
        (r#"{"minimum": "3"}"#, "#: invalid value for 'minimum': expected a number"),
        (
            r#"{"multipleOf": 0}"#,
            "#: invalid value for 'multipleOf': expected a number greater than 0",
        ),
        (
            r#"{"required": ["a", 1]}"#,
            "#: invalid value for 'required': expected an array of strings",
        ),
        (
            r#"{"anyOf": []}"#,
            "#: invalid value for 'anyOf': expected a non-empty array of schemas",
        ),
        (
            r#"{"oneOf": {}}"#,
            "#: invalid value for 'oneOf': expected a non-empty array of schemas",
        ),
        (
            r#"{"items": {"maxItems": 1.5}}"#,
            "#/items: invalid value for 'maxItems': expected a non-negative integer",
        ),
    ];
    for (text, message) in cases {
        let error = SchemaReader::new().read_str(text).unwrap_err();
        assert_eq!(error.to_string(), message, "{text}");
    }
}

#[test]
fn integral_floats_are_accepted_as_counts() {
    let schema = SchemaReader::new().read_str(r#"{"maxItems": 2.0}"#).unwrap();
    assert!(!Validator::validate_str(&schema, "[1, 2, 3]").is_valid());
}

// =========================================================================
// Unknown keywords
// =========================================================================

#[test]
fn unknown_keywords_warn_with_suggestions() {
    let mut reader = SchemaReader::new();
    let schema = reader
        .read_str(r##"{"properties": {"a": {"maxLenght": 2}}, "$ref": "#/x"}"##)
        .unwrap();

    assert_eq!(
        reader.warnings(),
        &[
            ReadWarning::UnknownKeyword {
                path: "/properties/a".to_string(),
                name: "maxLenght".to_string(),
                suggestions: vec!["maxLength"],
            },
            ReadWarning::UnknownKeyword {
                path: String::new(),
                name: "$ref".to_string(),
                suggestions: vec![],
            },
        ]
    );
    assert!(Validator::validate_str(&schema, r#"{"a": "long"}"#).is_valid());
}

#[test]
fn warnings_accumulate_until_taken() {
    let mut reader = SchemaReader::new();
    reader.read_str(r#"{"foo": 1}"#).unwrap();
    reader.read_str(r#"{"bar": 1}"#).unwrap();
    assert_eq!(reader.take_warnings().len(), 2);
    assert!(reader.warnings().is_empty());
}

#[test]
fn strict_reader_rejects_unknown_keywords() {
    let options = ReaderOptions::builder().strict(true).build();
    let error = SchemaReader::with_options(options)
        .read_str(r#"{"items": {"tpye": "string"}}"#)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "#/items: unknown keyword 'tpye', did you mean: type?"
    );
}

// =========================================================================
// Files
// =========================================================================

#[test]
fn schema_files_are_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("person.json");
    fs::write(&path, r#"{"required": ["name"]}"#).unwrap();

    let schema = SchemaReader::new().read_file(&path).unwrap();
    assert!(!Validator::validate_str(&schema, "{}").is_valid());
}

#[test]
fn missing_files_report_io_errors() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing.json");
    let error = SchemaReader::new().read_file(&path).unwrap_err();
    assert!(matches!(error, LoadError::Io { path: ref p, .. } if p == &path));
}

#[test]
fn broken_files_report_the_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, r#"{"minimum": null}"#).unwrap();

    let error = SchemaReader::new().read_file(&path).unwrap_err();
    let LoadError::Schema { source, .. } = error else {
        panic!("expected a schema error, got {error:?}");
    };
    assert!(
        matches!(source, SchemaError::InvalidKeyword { ref keyword, .. } if keyword == "minimum")
    );
}

// =========================================================================
// Building in code
// =========================================================================

#[test]
fn built_schemas_validate_like_read_ones() {
    let schema = SchemaBuilder::new()
        .with_type([InstanceType::Object])
        .with_property(
            "age",
            Arc::new(SchemaBuilder::new().with_minimum(0.0).build()),
        )
        .with_additional_properties(Schema::always_false())
        .build();

    assert!(Validator::validate_str(&schema, r#"{"age": 3}"#).is_valid());
    let report = Validator::validate_str(&schema, r#"{"age": -1, "name": "x"}"#);
    assert_eq!(report.problems.len(), 2);
}

#[test]
fn keyword_table_covers_every_kind() {
    for kind in KeywordKind::all() {
        assert_eq!(KeywordKind::from_name(kind.name()), Some(kind));
    }
    assert_eq!(KeywordKind::from_name("minimum"), Some(KeywordKind::Minimum));
    assert_eq!(KeywordKind::Minimum.applies_to(), &[InstanceType::Number, InstanceType::Integer]);
}
