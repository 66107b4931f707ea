//! Schema inference tests

use super::*;
use crate::error::Error;
use crate::record::Record;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_case::test_case;

fn record(value: serde_json::Value) -> Record {
    Record::from_json(value).unwrap()
}

fn fold(records: &[Record], policy: ConflictPolicy) -> SchemaAccumulator {
    let mut accumulator = SchemaAccumulator::with_policy(policy);
    accumulator.observe_all(records).unwrap();
    accumulator
}

// ============================================================================
// Schema descriptor
// ============================================================================

#[test]
fn test_empty_input_yields_empty_schema() {
    let schema = infer_schema(std::iter::empty(), ConflictPolicy::Overwrite).unwrap();
    assert!(schema.is_empty());

    let accumulator = SchemaAccumulator::new();
    assert!(accumulator.descriptor().is_empty());
    assert!(accumulator.descriptor().field_types().is_empty());
    assert!(accumulator.descriptor().optional_fields().is_empty());
}

#[test]
fn test_first_record_fields_are_required() {
    let accumulator = fold(
        &[record(json!({"id": "1", "score": 98.5, "ranked": true, "programs": [], "meta": {}}))],
        ConflictPolicy::Overwrite,
    );
    let schema = accumulator.finalize();

    assert!(schema.optional_keys.is_empty());
    assert_eq!(schema.type_of("id"), Some("string"));
    assert_eq!(schema.type_of("score"), Some("number"));
    assert_eq!(schema.type_of("ranked"), Some("boolean"));
    assert_eq!(schema.type_of("programs"), Some("Array"));
    assert_eq!(schema.type_of("meta"), Some("Object"));
}

#[test]
fn test_identical_key_sets_skip_reconciliation() {
    let r1 = record(json!({"a": "x", "b": 1}));
    let r2 = record(json!({"a": "y", "b": 2}));

    let after_r1 = observe(SchemaDescriptor::new(), &r1, ConflictPolicy::Overwrite).unwrap();
    let after_r2 = observe(after_r1.clone(), &r2, ConflictPolicy::Overwrite).unwrap();

    assert_eq!(after_r1.field_types(), after_r2.field_types());
    assert_eq!(after_r1.optional_fields(), after_r2.optional_fields());
    assert_eq!(after_r1.signature(), after_r2.signature());
}

#[test]
fn test_missing_field_becomes_optional() {
    let schema = fold(
        &[record(json!({"id": "1", "name": "X"})), record(json!({"id": "2"}))],
        ConflictPolicy::Overwrite,
    )
    .finalize();

    assert_eq!(schema.type_of("name"), Some("Optional<string>"));
    assert!(schema.is_optional("name"));
    assert_eq!(schema.type_of("id"), Some("string"));
    assert!(!schema.is_optional("id"));
}

#[test]
fn test_late_field_becomes_optional() {
    let schema = fold(
        &[record(json!({"id": "1"})), record(json!({"id": "2", "score": "90"}))],
        ConflictPolicy::Overwrite,
    )
    .finalize();

    assert_eq!(schema.type_of("score"), Some("Optional<string>"));
    assert!(schema.is_optional("score"));
    assert_eq!(schema.type_of("id"), Some("string"));
}

#[test]
fn test_optional_field_is_not_marked_twice() {
    let accumulator = fold(
        &[
            record(json!({"id": "1", "fee": "1"})),
            record(json!({"id": "2"})),
            record(json!({"id": "3", "extra": true})),
            record(json!({"id": "4"})),
        ],
        ConflictPolicy::Overwrite,
    );
    let schema = accumulator.finalize();

    assert_eq!(schema.optional_keys, vec!["extra", "fee"]);
    assert_eq!(schema.type_of("fee"), Some("Optional<string>"));
    assert_eq!(schema.type_of("extra"), Some("Optional<boolean>"));
}

#[test]
fn test_empty_first_record_makes_later_fields_optional() {
    let schema = fold(
        &[record(json!({})), record(json!({"a": 1}))],
        ConflictPolicy::Overwrite,
    )
    .finalize();

    assert_eq!(schema.type_of("a"), Some("Optional<number>"));
    assert!(schema.is_optional("a"));
}

#[test_case(ConflictPolicy::Overwrite, "number" ; "overwrite keeps latest type")]
#[test_case(ConflictPolicy::WidenToUnion, "string|number" ; "widen keeps both types")]
fn test_type_change_for_known_field(policy: ConflictPolicy, expected: &str) {
    let schema = fold(
        &[
            record(json!({"tuition": "10000"})),
            record(json!({"tuition": 10000})),
        ],
        policy,
    )
    .finalize();

    assert_eq!(schema.type_of("tuition"), Some(expected));
    assert!(!schema.is_optional("tuition"));
}

#[test]
fn test_type_change_errors_under_strict_policy() {
    let mut accumulator = SchemaAccumulator::with_policy(ConflictPolicy::Error);
    accumulator
        .observe(&record(json!({"tuition": "10000"})))
        .unwrap();

    let err = accumulator
        .observe(&record(json!({"tuition": 10000})))
        .unwrap_err();
    match err {
        Error::TypeConflict {
            field,
            existing,
            observed,
        } => {
            assert_eq!(field, "tuition");
            assert_eq!(existing, "string");
            assert_eq!(observed, "number");
        }
        other => panic!("expected type conflict, got {other:?}"),
    }

    // The failed record left no trace
    assert_eq!(accumulator.records_observed(), 1);
    assert_eq!(
        accumulator.descriptor().field_type("tuition").unwrap().to_string(),
        "string"
    );
}

#[test]
fn test_type_change_on_optional_field_keeps_optional() {
    let schema = fold(
        &[
            record(json!({"id": "1", "fee": "x"})),
            record(json!({"id": "2"})),
            record(json!({"id": "3", "fee": 5})),
        ],
        ConflictPolicy::Overwrite,
    )
    .finalize();

    assert_eq!(schema.type_of("fee"), Some("Optional<number>"));
}

#[test]
fn test_null_does_not_conflict() {
    // Null after a concrete type keeps the concrete type
    let schema = fold(
        &[record(json!({"fee": "x"})), record(json!({"fee": null}))],
        ConflictPolicy::Error,
    )
    .finalize();
    assert_eq!(schema.type_of("fee"), Some("string"));

    // A concrete type after null replaces the placeholder tag
    let schema = fold(
        &[record(json!({"fee": null})), record(json!({"fee": "x"}))],
        ConflictPolicy::Error,
    )
    .finalize();
    assert_eq!(schema.type_of("fee"), Some("string"));

    let schema = fold(
        &[record(json!({"fee": null})), record(json!({"fee": 3})), record(json!({"fee": "x"}))],
        ConflictPolicy::WidenToUnion,
    )
    .finalize();
    assert_eq!(schema.type_of("fee"), Some("number|string"));
}

#[test]
fn test_null_only_field_is_tagged_object() {
    let accumulator = fold(
        &[record(json!({"id": "1", "note": null})), record(json!({"id": "2", "note": null}))],
        ConflictPolicy::Error,
    );
    assert!(accumulator.descriptor().field_type("note").unwrap().is_null_only());

    let schema = accumulator.finalize();
    assert_eq!(schema.type_of("note"), Some("Object"));
    assert!(schema.data_type.values().all(|tag| !tag.contains("null")));
}

#[test]
fn test_null_as_new_field_is_optional_object() {
    let schema = fold(
        &[record(json!({"id": "1"})), record(json!({"id": "2", "note": null}))],
        ConflictPolicy::Overwrite,
    )
    .finalize();
    assert_eq!(schema.type_of("note"), Some("Optional<Object>"));
}

#[test]
fn test_type_change_on_identical_key_set_is_still_applied() {
    // The fingerprint only short-circuits optionality; types are checked on
    // every record, so an identical key set can still change a type.
    let r1 = record(json!({"a": "x", "b": 1}));
    let r2 = record(json!({"a": 5, "b": 2}));

    let after_r1 = observe(SchemaDescriptor::new(), &r1, ConflictPolicy::Overwrite).unwrap();
    let after_r2 = observe(after_r1.clone(), &r2, ConflictPolicy::Overwrite).unwrap();

    assert_eq!(after_r1.signature(), after_r2.signature());
    assert_eq!(after_r1.optional_fields(), after_r2.optional_fields());
    assert_eq!(after_r2.field_type("a").unwrap().to_string(), "number");
    assert_eq!(after_r2.field_type("b").unwrap().to_string(), "number");
}

#[test]
fn test_same_first_occurrence_order_is_order_independent() {
    let a = record(json!({"id": "1", "name": "A"}));
    let b = record(json!({"id": "2"}));
    let c = record(json!({"id": "3", "name": "C", "fee": "9"}));

    let first = fold(&[a.clone(), b.clone(), c.clone()], ConflictPolicy::Overwrite).finalize();
    let second = fold(&[a, c, b], ConflictPolicy::Overwrite).finalize();

    assert_eq!(first, second);
    assert_eq!(first.optional_keys, vec!["fee", "name"]);
}

#[test]
fn test_reobserving_same_record_is_noop() {
    let r = record(json!({"id": "1", "programs": [{"name": "x"}]}));

    let once = observe(SchemaDescriptor::new(), &r, ConflictPolicy::Error).unwrap();
    let twice = observe(once.clone(), &r, ConflictPolicy::Error).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn test_finalize_strips_signature() {
    let accumulator = fold(
        &[record(json!({"id": "1", "name": "X"})), record(json!({"id": "2"}))],
        ConflictPolicy::Overwrite,
    );
    assert!(accumulator.descriptor().signature().is_some());

    let value = serde_json::to_value(accumulator.finalize()).unwrap();
    assert_eq!(
        value,
        json!({
            "optionalKeys": ["name"],
            "dataType": {
                "id": "string",
                "name": "Optional<string>"
            }
        })
    );
}

#[test]
fn test_field_type_display() {
    let mut field = FieldType::new(TypeTag::String);
    assert_eq!(field.to_string(), "string");

    field.widen(TypeTag::Number);
    field.widen(TypeTag::String);
    assert_eq!(field.to_string(), "string|number");

    field.make_optional();
    assert_eq!(field.to_string(), "Optional<string|number>");

    field.replace(TypeTag::Array);
    assert_eq!(field.to_string(), "Optional<Array>");
    assert!(field.is_optional());
}

#[test_case("\"overwrite\"", ConflictPolicy::Overwrite)]
#[test_case("\"error\"", ConflictPolicy::Error)]
#[test_case("\"widen-to-union\"", ConflictPolicy::WidenToUnion)]
fn test_conflict_policy_names(raw: &str, expected: ConflictPolicy) {
    let policy: ConflictPolicy = serde_json::from_str(raw).unwrap();
    assert_eq!(policy, expected);
}

// ============================================================================
// Type schema
// ============================================================================

#[test]
fn test_type_schema_nested_programs() {
    let records = [
        record(json!({
            "id": "a",
            "score": "90",
            "programs": [
                {"name": "Engineering", "courses": [{"name": "CS", "degrees": ["BSc", "MSc"]}]}
            ]
        })),
        record(json!({"id": "b", "score": "80", "tuitionFee": "10,000 USD"})),
    ];

    let schema = TypeSchemaBuilder::new("University")
        .with_records(&records)
        .build();

    assert_eq!(schema.title, "University");
    assert_eq!(schema.required, vec!["id", "score"]);
    assert!(!schema.is_required("tuitionFee"));

    let tuition = schema.property("tuitionFee").unwrap();
    assert_eq!(
        tuition.json_type,
        Some(TypeKeyword::Multiple(vec![JsonType::String, JsonType::Null]))
    );

    let programs = schema.property("programs").unwrap();
    assert!(programs.json_type.as_ref().unwrap().is_nullable());
    let program = programs.items.as_ref().unwrap();
    assert_eq!(program.required, vec!["courses", "name"]);

    let courses = &program.properties.as_ref().unwrap()["courses"];
    let course = courses.items.as_ref().unwrap();
    let degrees = &course.properties.as_ref().unwrap()["degrees"];
    assert_eq!(
        degrees.items.as_ref().unwrap().json_type,
        Some(TypeKeyword::Single(JsonType::String))
    );
}

#[test]
fn test_type_schema_widens_scalars() {
    let records = [
        record(json!({"n": 1, "v": "x", "only_null": null, "empty": []})),
        record(json!({"n": 1.5, "v": 2, "only_null": null, "empty": []})),
    ];
    let schema = TypeSchemaBuilder::new("T").with_records(&records).build();

    let primary = |name: &str| {
        schema
            .property(name)
            .and_then(|p| p.json_type.as_ref())
            .and_then(TypeKeyword::primary_type)
    };
    assert_eq!(primary("n"), Some(JsonType::Number));
    assert_eq!(primary("v"), Some(JsonType::String));
    assert_eq!(primary("only_null"), Some(JsonType::Null));
    assert!(schema.property("empty").unwrap().items.is_none());
    assert!(!schema.is_required("only_null"));
}

#[test]
fn test_type_schema_serializes_draft_07() {
    let records = [record(json!({"id": "a"}))];
    let builder = TypeSchemaBuilder::new("University").with_records(&records);
    assert_eq!(builder.record_count(), 1);

    let value = serde_json::to_value(builder.build()).unwrap();
    assert_eq!(
        value,
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "University",
            "type": "object",
            "properties": {"id": {"type": "string"}},
            "required": ["id"],
            "additionalProperties": true
        })
    );
}
