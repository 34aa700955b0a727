//! Integration tests for evaluating instances against schemas.

use std::sync::Arc;
use std::thread;

use jsv::{
    Event, Location, MessageKey, ParamValue, Problem, Schema, SchemaReader, ValidationReport,
    Validator,
};

fn schema(text: &str) -> Arc<Schema> {
    SchemaReader::new().read_str(text).unwrap()
}

fn validate(schema_text: &str, instance: &str) -> ValidationReport {
    Validator::validate_str(&schema(schema_text), instance)
}

fn keys(problems: &[Problem]) -> Vec<&'static str> {
    problems.iter().map(|p| p.key().as_str()).collect()
}

// =========================================================================
// Boolean and empty schemas
// =========================================================================

#[test]
fn true_and_empty_schemas_accept_everything() {
    for instance in ["null", "1", r#""x""#, "[1, [2]]", r#"{"a": {"b": []}}"#] {
        for schema_text in ["true", "{}"] {
            let report = validate(schema_text, instance);
            assert_eq!(report.outcome, Some(true), "{schema_text} vs {instance}");
            assert!(report.problems.is_empty());
        }
    }
}

#[test]
fn false_schema_rejects_with_one_problem() {
    let report = validate("false", r#"{"a": [1, 2, 3]}"#);
    assert_eq!(report.outcome, Some(false));
    assert_eq!(keys(&report.problems), vec!["instance.problem.false"]);
    assert_eq!(report.problems[0].pointer(), "");
}

#[test]
fn not_true_reports_the_negated_schema() {
    let report = validate(r#"{"not": {}}"#, "3");
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].key(), MessageKey::Not);
    assert_eq!(
        report.problems[0].param("schema").and_then(ParamValue::as_string),
        Some("{}")
    );
}

#[test]
fn not_false_accepts() {
    let report = validate(r#"{"not": false}"#, r#"{"a": 1}"#);
    assert_eq!(report.outcome, Some(true));
    assert!(report.problems.is_empty());
}

// =========================================================================
// Vacuous keywords
// =========================================================================

#[test]
fn keywords_for_other_types_do_not_apply() {
    let report = validate(r#"{"minimum": 10, "maxLength": 1, "required": ["a"]}"#, "[1]");
    assert_eq!(report.outcome, Some(true));
    assert!(report.problems.is_empty());
}

#[test]
fn negating_an_inapplicable_schema_fails() {
    let report = validate(r#"{"not": {"minimum": 10}}"#, r#""text""#);
    assert_eq!(report.outcome, Some(false));
    assert_eq!(keys(&report.problems), vec!["instance.problem.not"]);
}

#[test]
fn min_zero_and_empty_required_always_hold() {
    let schema_text = r#"{"minItems": 0, "minProperties": 0, "minLength": 0, "required": []}"#;
    for instance in ["[]", "{}", r#""""#] {
        assert!(validate(schema_text, instance).is_valid(), "{instance}");
    }
}

// =========================================================================
// Logical combinators
// =========================================================================

#[test]
fn all_of_gathers_every_problem() {
    let report = validate(
        r#"{"allOf": [{"type": "string"}, {"minimum": 10}, {"multipleOf": 2}]}"#,
        "3",
    );
    assert_eq!(report.outcome, Some(false));
    assert_eq!(
        keys(&report.problems),
        vec![
            "instance.problem.type",
            "instance.problem.minimum",
            "instance.problem.multipleOf",
        ]
    );
}

#[test]
fn any_of_discards_problems_when_one_branch_passes() {
    let report = validate(r#"{"anyOf": [{"type": "string"}, {"minimum": 2}]}"#, "5");
    assert_eq!(report.outcome, Some(true));
    assert!(report.problems.is_empty());
}

#[test]
fn any_of_reports_failed_branches_together() {
    let report = validate(r#"{"anyOf": [{"type": "string"}, {"minimum": 10}]}"#, "5");
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);

    let problem = &report.problems[0];
    assert_eq!(problem.key(), MessageKey::AnyOf);
    assert_eq!(problem.branches().len(), 2);
    assert_eq!(keys(&problem.branches()[0]), vec!["instance.problem.type"]);
    assert_eq!(keys(&problem.branches()[1]), vec!["instance.problem.minimum"]);
}

#[test]
fn one_of_with_two_valid_branches_reports_the_count() {
    let report = validate(
        r#"{"oneOf": [{"type": "integer"}, {"type": "string"}, {"minimum": 0}]}"#,
        "5",
    );
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].key(), MessageKey::OneOfOver);
    assert_eq!(
        report.problems[0].param("valid").and_then(ParamValue::as_integer),
        Some(2)
    );
}

#[test]
fn one_of_with_exactly_one_valid_branch_passes() {
    let report = validate(r#"{"oneOf": [{"type": "integer"}, {"minimum": 0}]}"#, "-1");
    assert_eq!(report.outcome, Some(true));
    assert!(report.problems.is_empty());
}

#[test]
fn negated_one_of_fails_on_exactly_one_valid_branch() {
    let report = validate(r#"{"not": {"oneOf": [{"type": "integer"}, {"minimum": 0}]}}"#, "-1");
    assert_eq!(report.outcome, Some(false));
    assert_eq!(keys(&report.problems), vec!["instance.problem.not.oneOf"]);

    let report = validate(r#"{"not": {"oneOf": [{"type": "integer"}, {"minimum": 0}]}}"#, "1");
    assert_eq!(report.outcome, Some(true));
}

// =========================================================================
// Property dispatch
// =========================================================================

#[test]
fn false_default_reports_one_redundant_property() {
    let report = validate(
        r#"{"properties": {"a": true}, "additionalProperties": false}"#,
        r#"{"a": 1, "b": 2}"#,
    );
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);

    let problem = &report.problems[0];
    assert_eq!(problem.key(), MessageKey::RedundantProperty);
    assert_eq!(problem.pointer(), "/b");
    assert_eq!(problem.param("name").and_then(ParamValue::as_string), Some("b"));
    assert_eq!(
        problem.param("schema").and_then(ParamValue::as_string),
        Some("false")
    );
}

#[test]
fn pattern_property_problem_points_at_the_member() {
    let report = validate(
        r#"{"patternProperties": {"^x-": {"type": "string"}}}"#,
        r#"{"x-note": 5}"#,
    );
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].key(), MessageKey::Type);
    assert_eq!(report.problems[0].pointer(), "/x-note");
}

#[test]
fn exact_and_pattern_matches_all_apply() {
    let schema_text = r#"{
        "properties": {"size": {"type": "integer"}},
        "patternProperties": {"^s": {"minimum": 0}, "e$": {"maximum": 10}}
    }"#;
    assert!(validate(schema_text, r#"{"size": 5}"#).is_valid());

    let report = validate(schema_text, r#"{"size": 12.5}"#);
    assert_eq!(
        keys(&report.problems),
        vec!["instance.problem.type", "instance.problem.maximum"]
    );
}

#[test]
fn false_candidate_replaces_the_other_matches() {
    let report = validate(
        r#"{"properties": {"id": {"type": "string"}}, "patternProperties": {"^i": false}}"#,
        r#"{"id": 1}"#,
    );
    assert_eq!(keys(&report.problems), vec!["instance.problem.redundant.property"]);
}

#[test]
fn nested_members_report_full_pointers() {
    let report = validate(
        r#"{"properties": {"a/b": {"properties": {"c~d": {"type": "null"}}}}}"#,
        r#"{"a/b": {"c~d": true}}"#,
    );
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].pointer(), "/a~1b/c~0d");
}

#[test]
fn negated_properties_stub_records_the_true_schema() {
    let report = validate(r#"{"not": {"properties": {"a": true}}}"#, r#"{"a": 1}"#);
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);

    let problem = &report.problems[0];
    assert_eq!(problem.key(), MessageKey::RedundantProperty);
    assert_eq!(problem.param("name").and_then(ParamValue::as_string), Some("a"));
    assert_eq!(
        problem.param("schema").and_then(ParamValue::as_string),
        Some("true")
    );
}

#[test]
fn negated_properties_on_an_empty_object_fails() {
    let report = validate(r#"{"not": {"properties": {"a": {"type": "string"}}}}"#, "{}");
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].key(), MessageKey::Not);
    assert_eq!(
        report.problems[0].param("keyword").and_then(ParamValue::as_string),
        Some("properties")
    );
}

#[test]
#[should_panic(expected = "previous member has no value")]
fn member_name_without_a_value_panics() {
    let schema = schema(r#"{"properties": {"a": {"type": "string"}}}"#);
    let mut validator = Validator::new(&schema);
    validator.feed(&Event::StartObject, Location::default());
    validator.feed(&Event::Key("a".into()), Location::default());
    validator.feed(&Event::Key("b".into()), Location::default());
}

// =========================================================================
// Item dispatch
// =========================================================================

#[test]
fn items_apply_to_every_element() {
    let report = validate(r#"{"items": {"type": "integer"}}"#, r#"[1, "x", 3, null]"#);
    assert_eq!(report.outcome, Some(false));
    let pointers: Vec<&str> = report.problems.iter().map(Problem::pointer).collect();
    assert_eq!(pointers, vec!["/1", "/3"]);
}

#[test]
fn tuple_items_fall_back_to_additional_items() {
    let schema_text =
        r#"{"items": [{"type": "string"}, {"type": "integer"}], "additionalItems": false}"#;
    assert!(validate(schema_text, r#"["a", 1]"#).is_valid());

    let report = validate(schema_text, r#"["a", 1, true]"#);
    assert_eq!(report.outcome, Some(false));
    assert_eq!(report.problems.len(), 1);
    assert_eq!(report.problems[0].key(), MessageKey::RedundantItem);
    assert_eq!(
        report.problems[0].param("index").and_then(ParamValue::as_integer),
        Some(2)
    );
    assert_eq!(report.problems[0].pointer(), "/2");
}

#[test]
fn additional_items_without_a_tuple_is_ignored() {
    assert!(validate(r#"{"additionalItems": false}"#, "[1, 2]").is_valid());
}

// =========================================================================
// Assertion keywords
// =========================================================================

#[test]
fn numeric_bounds() {
    let schema_text = r#"{"exclusiveMinimum": 0, "maximum": 10, "multipleOf": 0.5}"#;
    assert!(validate(schema_text, "1.5").is_valid());
    assert!(validate(schema_text, "10").is_valid());
    assert_eq!(
        keys(&validate(schema_text, "0").problems),
        vec!["instance.problem.exclusiveMinimum"]
    );
    assert_eq!(
        keys(&validate(schema_text, "10.2").problems),
        vec!["instance.problem.maximum", "instance.problem.multipleOf"]
    );
}

#[test]
fn multiple_of_is_exact_for_tiny_and_huge_numbers() {
    for (schema_text, instance) in [
        (r#"{"multipleOf": 1}"#, "0.0000000001"),
        (r#"{"multipleOf": 3}"#, "100000000000000000001"),
    ] {
        let report = validate(schema_text, instance);
        assert_eq!(report.outcome, Some(false), "{schema_text} vs {instance}");
        assert_eq!(keys(&report.problems), vec!["instance.problem.multipleOf"]);
    }
    assert!(validate(r#"{"multipleOf": 3}"#, "100000000000000000002").is_valid());
    assert!(validate(r#"{"multipleOf": 0.01}"#, "19.99").is_valid());
}

#[test]
fn negated_bounds_report_their_duals() {
    let report = validate(r#"{"not": {"maximum": 10}}"#, "3");
    assert_eq!(keys(&report.problems), vec!["instance.problem.exclusiveMinimum"]);
    assert_eq!(
        report.problems[0].param("limit").and_then(ParamValue::as_integer),
        Some(10)
    );
}

#[test]
fn integer_type_accepts_integral_numbers() {
    assert!(validate(r#"{"type": "integer"}"#, "4.0").is_valid());
    assert!(validate(r#"{"type": "number"}"#, "4").is_valid());
    assert!(!validate(r#"{"type": "integer"}"#, "4.5").is_valid());
}

#[test]
fn type_problem_lists_the_expected_types() {
    let report = validate(r#"{"type": ["string", "null"]}"#, "true");
    let problem = &report.problems[0];
    assert_eq!(
        problem.param("actual").and_then(ParamValue::as_string),
        Some("boolean")
    );
    let expected: Vec<&str> = problem
        .param("expected")
        .and_then(ParamValue::as_list)
        .unwrap()
        .iter()
        .filter_map(ParamValue::as_string)
        .collect();
    assert_eq!(expected, vec!["string", "null"]);
}

#[test]
fn string_keywords_count_characters() {
    let schema_text = r#"{"minLength": 2, "maxLength": 3, "pattern": "^h"}"#;
    assert!(validate(schema_text, r#""héé""#).is_valid());
    assert_eq!(
        keys(&validate(schema_text, r#""hello""#).problems),
        vec!["instance.problem.maxLength"]
    );
    assert_eq!(
        keys(&validate(schema_text, r#""x""#).problems),
        vec!["instance.problem.minLength", "instance.problem.pattern"]
    );
}

#[test]
fn required_reports_each_missing_member() {
    let report = validate(r#"{"required": ["a", "b", "c"]}"#, r#"{"b": {"a": 1}}"#);
    let missing: Vec<&str> = report
        .problems
        .iter()
        .filter_map(|p| p.param("required").and_then(ParamValue::as_string))
        .collect();
    assert_eq!(missing, vec!["a", "c"]);
}

#[test]
fn container_sizes() {
    let schema_text = r#"{"minProperties": 1, "maxItems": 2}"#;
    assert_eq!(
        keys(&validate(schema_text, "{}").problems),
        vec!["instance.problem.minProperties"]
    );
    assert_eq!(
        keys(&validate(schema_text, "[[1, 2, 3], 2, 3]").problems),
        vec!["instance.problem.maxItems"]
    );
}

#[test]
fn const_and_enum_compare_whole_values() {
    let const_schema = r#"{"const": {"a": [1, 2.0]}}"#;
    assert!(validate(const_schema, r#"{"a": [1.0, 2]}"#).is_valid());
    assert_eq!(
        keys(&validate(const_schema, r#"{"a": [1, 3]}"#).problems),
        vec!["instance.problem.const"]
    );

    let enum_schema = r#"{"enum": ["red", [1, 2], null]}"#;
    assert!(validate(enum_schema, "[1, 2]").is_valid());
    assert!(validate(enum_schema, "null").is_valid());
    assert_eq!(
        keys(&validate(enum_schema, r#""blue""#).problems),
        vec!["instance.problem.enum"]
    );
}

// =========================================================================
// Negation is the complement of evaluation
// =========================================================================

#[test]
fn negated_schemas_decide_the_opposite() {
    let cases: &[(&str, &[&str])] = &[
        (r#"{"type": "string"}"#, &[r#""a""#, "1", "{}"]),
        (r#"{"minimum": 3}"#, &["2", "3", r#""x""#]),
        (r#"{"required": ["a"]}"#, &[r#"{"a": 1}"#, "{}", "[]"]),
        (
            r#"{"properties": {"a": {"type": "integer"}}}"#,
            &[r#"{"a": 1}"#, r#"{"a": "x"}"#, "{}"],
        ),
        (
            r#"{"anyOf": [{"type": "string"}, {"minimum": 10}]}"#,
            &[r#""x""#, "12", "5"],
        ),
        (
            r#"{"oneOf": [{"type": "integer"}, {"minimum": 0}]}"#,
            &["5", "-1", r#""x""#, "0.5"],
        ),
        (r#"{"allOf": [true, {"maxLength": 2}]}"#, &[r#""abc""#, r#""ab""#]),
        (r#"{"items": {"type": "integer"}}"#, &["[1, 2]", r#"[1, "x"]"#, "[]"]),
        (r#"{"enum": [1, "a", [1, 2]]}"#, &["[1, 2]", "[1, 3]", "1.0"]),
        (r#"{"multipleOf": 0.5}"#, &["1.5", "1.2"]),
        (r#"{"maxProperties": 1}"#, &[r#"{"a": 1}"#, r#"{"a": 1, "b": 2}"#]),
        ("true", &["1", "[]"]),
        ("false", &["1", "{}"]),
        ("{}", &["null"]),
    ];
    for (schema_text, instances) in cases {
        let negated_text = format!(r#"{{"not": {schema_text}}}"#);
        for instance in *instances {
            let positive = validate(schema_text, instance);
            let negated = validate(&negated_text, instance);
            assert!(positive.outcome.is_some(), "{schema_text} vs {instance}");
            assert_eq!(
                positive.outcome.map(|valid| !valid),
                negated.outcome,
                "{schema_text} vs {instance}"
            );
            assert_eq!(
                positive.problems.is_empty(),
                positive.is_valid(),
                "{schema_text} vs {instance}"
            );
            assert_eq!(
                negated.problems.is_empty(),
                negated.is_valid(),
                "not {schema_text} vs {instance}"
            );
        }
    }
}

// =========================================================================
// Repeated runs
// =========================================================================

const SHARED_SCHEMA: &str = r#"{
    "type": "object",
    "required": ["id", "tags"],
    "properties": {
        "id": {"type": "integer", "minimum": 1},
        "tags": {"items": {"type": "string", "maxLength": 4}}
    },
    "patternProperties": {"^x-": {"type": "string"}},
    "additionalProperties": false
}"#;

const SHARED_INSTANCE: &str = r#"{"id": 0, "tags": ["a", "toolong", 3], "x-n": 1, "extra": null}"#;

#[test]
fn sequential_runs_are_identical() {
    let schema = schema(SHARED_SCHEMA);
    let first = Validator::validate_str(&schema, SHARED_INSTANCE);
    let second = Validator::validate_str(&schema, SHARED_INSTANCE);
    assert_eq!(first.outcome, Some(false));
    assert_eq!(first.problems.len(), 5);
    assert_eq!(first, second);
}

#[test]
fn concurrent_runs_share_one_schema() {
    let schema = schema(SHARED_SCHEMA);
    let expected = Validator::validate_str(&schema, SHARED_INSTANCE);

    let reports: Vec<ValidationReport> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let schema = Arc::clone(&schema);
                scope.spawn(move || Validator::validate_str(&schema, SHARED_INSTANCE))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for report in reports {
        assert_eq!(report, expected);
    }
}
