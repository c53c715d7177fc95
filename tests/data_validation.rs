//! DataValidator behavior against schemas that passed schema validation.

use std::collections::{BTreeMap, BTreeSet};

use mcp_schema_validator::schema::{
    check_at, validate_data, ArraySchema, ObjectSchema, Schema, SchemaError, StringSchema,
    ValidationResult, ValueKind, MAX_DEPTH,
};
use serde_json::{json, Value};

fn schema(document: Value) -> Schema {
    Schema::from_json(&document).expect("fixture schema must be valid")
}

fn reason(outcome: ValidationResult) -> String {
    assert!(!outcome.valid, "expected an invalid result");
    outcome.reason.expect("invalid results carry a reason")
}

fn code_schema() -> Schema {
    schema(json!({
        "type": "object",
        "required": ["code"],
        "properties": { "code": { "type": "number" } }
    }))
}

/// Typed object schema wrapping a string leaf `levels` times.
fn nested_schema(levels: usize) -> Schema {
    let mut node = Schema::String(StringSchema::default());
    for _ in 0..levels {
        node = Schema::Object(ObjectSchema {
            properties: BTreeMap::from([("child".to_string(), node)]),
            required: BTreeSet::from(["child".to_string()]),
        });
    }
    node
}

fn nested_value(levels: usize) -> Value {
    let mut value = json!("leaf");
    for _ in 0..levels {
        value = json!({ "child": value });
    }
    value
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

#[test]
fn object_with_required_property_is_valid() {
    assert_eq!(code_schema().check(&json!({ "code": 1 })), ValidationResult::valid());
}

#[test]
fn unexpected_key_is_rejected() {
    assert_eq!(
        reason(code_schema().check(&json!({ "code": 1, "foo": "bar" }))),
        r#"unexpected key "foo""#
    );
}

#[test]
fn missing_required_properties_are_named() {
    let schema = schema(json!({
        "type": "object",
        "required": ["code", "name"],
        "properties": {
            "code": { "type": "number" },
            "name": { "type": "string" },
            "note": { "type": "string" }
        }
    }));

    assert_eq!(
        reason(schema.check(&json!({ "note": "hi" }))),
        r#"missing required properties: "code", "name""#
    );
}

#[test]
fn optional_properties_may_be_absent() {
    let schema = schema(json!({
        "type": "object",
        "properties": { "a": { "type": "boolean" }, "b": { "type": "number" } }
    }));

    assert!(schema.check(&json!({})).is_valid());
    assert!(schema.check(&json!({ "b": 2.5 })).is_valid());
}

#[test]
fn property_failures_are_wrapped_with_the_key() {
    assert_eq!(
        reason(code_schema().check(&json!({ "code": "one" }))),
        r#"property "code": expected number, found string"#
    );
}

#[test]
fn non_object_value_is_rejected() {
    assert_eq!(
        reason(code_schema().check(&json!([1]))),
        "expected object, found array"
    );
    assert_eq!(
        reason(code_schema().check(&Value::Null)),
        "expected object, found null"
    );
}

#[test]
fn three_level_nested_object_validates() {
    let schema = schema(json!({
        "type": "object",
        "required": ["customer"],
        "properties": {
            "customer": {
                "type": "object",
                "required": ["address"],
                "properties": {
                    "address": {
                        "type": "object",
                        "required": ["city"],
                        "properties": {
                            "city": { "type": "string", "minLength": 1 },
                            "zip": { "type": "string" }
                        }
                    }
                }
            }
        }
    }));

    let value = json!({ "customer": { "address": { "city": "Oslo", "zip": "0150" } } });
    assert!(schema.check(&value).is_valid());

    let value = json!({ "customer": { "address": { "city": "" } } });
    assert_eq!(
        reason(schema.check(&value)),
        r#"property "customer": property "address": property "city": minLength violated: 0 < 1"#
    );
}

// ---------------------------------------------------------------------------
// Arrays
// ---------------------------------------------------------------------------

#[test]
fn array_above_max_items_is_rejected() {
    let schema = schema(json!({
        "type": "array",
        "items": { "type": "string" },
        "maxItems": 1
    }));

    assert_eq!(reason(schema.check(&json!(["a", "b"]))), "maxItems violated: 2 > 1");
    assert!(schema.check(&json!(["a"])).is_valid());
}

#[test]
fn array_below_min_items_is_rejected() {
    let schema = schema(json!({
        "type": "array",
        "items": { "type": "number" },
        "minItems": 2
    }));

    assert_eq!(reason(schema.check(&json!([1]))), "minItems violated: 1 < 2");
}

#[test]
fn first_bad_element_is_reported_by_index() {
    let schema = schema(json!({ "type": "array", "items": { "type": "string" } }));

    assert_eq!(
        reason(schema.check(&json!(["a", 2, true]))),
        "item 1: expected string, found number"
    );
}

#[test]
fn non_array_value_is_rejected() {
    let schema = schema(json!({ "type": "array", "items": { "type": "string" } }));

    assert_eq!(reason(schema.check(&json!("a"))), "expected array, found string");
}

#[test]
fn array_elements_restart_the_depth_counter() {
    let schema = Schema::Array(ArraySchema {
        items: Box::new(nested_schema(1)),
        min_items: None,
        max_items: None,
    });

    let value = json!([{ "child": "x" }, { "child": "y" }]);
    assert!(check_at(&value, &schema, MAX_DEPTH).is_valid());
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

#[test]
fn string_below_min_length_is_rejected() {
    let schema = schema(json!({ "type": "string", "minLength": 3 }));

    assert_eq!(reason(schema.check(&json!("a"))), "minLength violated: 1 < 3");
}

#[test]
fn string_above_max_length_is_rejected() {
    let schema = schema(json!({ "type": "string", "maxLength": 3 }));

    assert_eq!(reason(schema.check(&json!("abcde"))), "maxLength violated: 5 > 3");
}

#[test]
fn string_length_counts_characters() {
    let schema = schema(json!({ "type": "string", "minLength": 3, "maxLength": 3 }));

    assert!(schema.check(&json!("åäö")).is_valid());
}

#[test]
fn leaf_kinds_are_enforced() {
    let number = schema(json!({ "type": "number" }));
    let boolean = schema(json!({ "type": "boolean" }));

    assert!(number.check(&json!(42)).is_valid());
    assert!(number.check(&json!(-0.5)).is_valid());
    assert_eq!(reason(number.check(&json!("42"))), "expected number, found string");

    assert!(boolean.check(&json!(true)).is_valid());
    assert_eq!(reason(boolean.check(&json!(0))), "expected boolean, found number");
    assert_eq!(reason(boolean.check(&Value::Null)), "expected boolean, found null");
}

#[test]
fn value_kind_distinguishes_arrays_from_objects() {
    assert_eq!(ValueKind::of(&json!([])), ValueKind::Array);
    assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
}

// ---------------------------------------------------------------------------
// Nesting limit
// ---------------------------------------------------------------------------

#[test]
fn twenty_levels_of_data_are_accepted() {
    let schema = nested_schema(MAX_DEPTH);

    assert!(schema.check(&nested_value(MAX_DEPTH)).is_valid());
}

#[test]
fn twenty_one_levels_of_data_are_rejected() {
    let schema = nested_schema(MAX_DEPTH + 1);
    let message = reason(schema.check(&nested_value(MAX_DEPTH + 1)));

    assert!(message.starts_with(r#"property "child": "#), "{message}");
    assert!(message.ends_with("maximum data depth of 20 exceeded"), "{message}");
}

#[test]
fn depth_limit_applies_before_any_check() {
    let leaf = Schema::String(StringSchema::default());

    assert_eq!(
        reason(check_at(&json!(7), &leaf, MAX_DEPTH + 1)),
        "maximum data depth of 20 exceeded"
    );
}

// ---------------------------------------------------------------------------
// Untyped entry point
// ---------------------------------------------------------------------------

#[test]
fn untyped_entry_point_validates_data() {
    let schema = json!({ "type": "string", "minLength": 3 });

    let outcome = validate_data(&json!("a"), &schema).unwrap();
    assert_eq!(outcome, ValidationResult::invalid("minLength violated: 1 < 3"));
}

#[test]
fn invalid_schema_is_a_precondition_error_not_a_data_result() {
    let err = validate_data(&json!([1]), &json!({ "type": "array" })).unwrap_err();
    assert!(
        matches!(&err, SchemaError::Invalid(reason) if reason == "array schema missing items"),
        "{err:?}"
    );

    let err = validate_data(&json!(1), &json!({ "type": "integer" })).unwrap_err();
    assert!(matches!(err, SchemaError::Invalid(_)), "{err:?}");
}
