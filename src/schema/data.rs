use std::collections::BTreeSet;

use serde_json::Value;

use super::{
    quoted_list, ArraySchema, ObjectSchema, Schema, SchemaError, SchemaKind, StringSchema,
    ValidationResult, ValueKind, MAX_DEPTH,
};

/// Check `value` against an untyped schema document.
///
/// The schema is validated and decoded first. A schema that would fail
/// [`super::validate_schema`] is returned as [`SchemaError::Invalid`], never
/// as an invalid data result.
pub fn validate_data(value: &Value, schema: &Value) -> Result<ValidationResult, SchemaError> {
    let schema = Schema::from_json(schema)?;
    Ok(schema.check(value))
}

/// Check `value` against `schema`, where `schema` sits `depth` levels below the root.
///
/// There is no pass-through for unrecognized schema types here: [`Schema`] is
/// closed, and untyped documents with an unknown `type` are refused by
/// [`validate_data`] as [`SchemaError::Invalid`] before any data is checked.
pub fn check_at(value: &Value, schema: &Schema, depth: usize) -> ValidationResult {
    if depth > MAX_DEPTH {
        tracing::debug!(depth, "data nesting limit reached");
        return ValidationResult::invalid(format!("maximum data depth of {MAX_DEPTH} exceeded"));
    }

    match schema {
        Schema::Object(object) => check_object(value, object, depth),
        Schema::Array(array) => check_array(value, array),
        Schema::String(string) => check_string(value, string),
        Schema::Number(_) => expect_kind(value, SchemaKind::Number),
        Schema::Boolean(_) => expect_kind(value, SchemaKind::Boolean),
    }
}

fn expect_kind(value: &Value, expected: SchemaKind) -> ValidationResult {
    let found = ValueKind::of(value);
    if found.matches(expected) {
        ValidationResult::valid()
    } else {
        ValidationResult::invalid(format!("expected {expected}, found {found}"))
    }
}

fn check_object(value: &Value, schema: &ObjectSchema, depth: usize) -> ValidationResult {
    let Value::Object(entries) = value else {
        return expect_kind(value, SchemaKind::Object);
    };

    let mut missing: BTreeSet<&str> = schema.required.iter().map(String::as_str).collect();

    for (key, item) in entries {
        let Some(property) = schema.properties.get(key) else {
            return ValidationResult::invalid(format!("unexpected key {key:?}"));
        };

        let outcome = check_at(item, property, depth + 1);
        if !outcome.is_valid() {
            return outcome.within(format!("property {key:?}"));
        }

        let found = ValueKind::of(item);
        if !found.matches(property.kind()) {
            return ValidationResult::invalid(format!(
                "property {key:?}: type mismatch, schema declares {} but value is {found}",
                property.kind()
            ));
        }

        missing.remove(key.as_str());
    }

    if !missing.is_empty() {
        return ValidationResult::invalid(format!(
            "missing required properties: {}",
            quoted_list(missing)
        ));
    }

    ValidationResult::valid()
}

fn check_array(value: &Value, schema: &ArraySchema) -> ValidationResult {
    let Value::Array(elements) = value else {
        return expect_kind(value, SchemaKind::Array);
    };

    let count = elements.len() as u64;
    if let Some(min) = schema.min_items {
        if count < min {
            return ValidationResult::invalid(format!("minItems violated: {count} < {min}"));
        }
    }
    if let Some(max) = schema.max_items {
        if count > max {
            return ValidationResult::invalid(format!("maxItems violated: {count} > {max}"));
        }
    }

    // Each element is an independent value; depth restarts at the item schema.
    for (index, element) in elements.iter().enumerate() {
        let outcome = check_at(element, &schema.items, 0);
        if !outcome.is_valid() {
            return outcome.within(format!("item {index}"));
        }
    }

    ValidationResult::valid()
}

fn check_string(value: &Value, schema: &StringSchema) -> ValidationResult {
    let Value::String(text) = value else {
        return expect_kind(value, SchemaKind::String);
    };

    let length = text.chars().count() as u64;
    if let Some(min) = schema.min_length {
        if length < min {
            return ValidationResult::invalid(format!("minLength violated: {length} < {min}"));
        }
    }
    if let Some(max) = schema.max_length {
        if length > max {
            return ValidationResult::invalid(format!("maxLength violated: {length} > {max}"));
        }
    }

    ValidationResult::valid()
}
