use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::{allowed_keys, quoted_list, SchemaKind, ValidationResult, MAX_DEPTH};

/// Check that `node` is a well-formed schema document of the supported dialect.
pub fn validate_schema(node: &Value) -> ValidationResult {
    validate_schema_at(node, 0)
}

/// Same as [`validate_schema`], for a node found `depth` levels below the root.
pub fn validate_schema_at(node: &Value, depth: usize) -> ValidationResult {
    if depth > MAX_DEPTH {
        tracing::debug!(depth, "schema nesting limit reached");
        return ValidationResult::invalid(format!("maximum schema depth of {MAX_DEPTH} exceeded"));
    }

    let Some(node) = node.as_object() else {
        return ValidationResult::invalid("schema node must be an object");
    };

    let Some(tag) = node.get("type") else {
        return ValidationResult::invalid("missing type");
    };

    match tag.as_str().and_then(SchemaKind::parse) {
        Some(SchemaKind::Object) => validate_object(node, depth),
        Some(SchemaKind::Array) => validate_array(node, depth),
        Some(kind) => validate_leaf(node, kind),
        None => ValidationResult::invalid(format!("unknown type: {tag}")),
    }
}

fn validate_object(node: &Map<String, Value>, depth: usize) -> ValidationResult {
    let properties = match node.get("properties").and_then(Value::as_object) {
        Some(properties) if !properties.is_empty() => properties,
        _ => return ValidationResult::invalid("object schema requires a non-empty properties map"),
    };

    let required = match required_names(node) {
        Ok(required) => required,
        Err(reason) => return ValidationResult::invalid(reason),
    };

    // More names than properties can never all be declared.
    if required.len() > properties.len() {
        return ValidationResult::invalid(format!(
            "unsatisfiable requirement: {} required properties but only {} declared",
            required.len(),
            properties.len()
        ));
    }

    let mut unmatched = required;
    for (name, property) in properties {
        let outcome = validate_schema_at(property, depth + 1);
        if !outcome.is_valid() {
            return outcome.within(format!("property {name:?}"));
        }
        unmatched.remove(name.as_str());
    }

    if !unmatched.is_empty() {
        return ValidationResult::invalid(format!(
            "required properties not declared: {}",
            quoted_list(unmatched)
        ));
    }

    ValidationResult::valid()
}

fn required_names(node: &Map<String, Value>) -> Result<BTreeSet<&str>, String> {
    const MALFORMED: &str = "required must be an array of property names";

    match node.get("required") {
        None => Ok(BTreeSet::new()),
        Some(Value::Array(names)) => names
            .iter()
            .map(|name| name.as_str().ok_or_else(|| MALFORMED.to_string()))
            .collect(),
        Some(_) => Err(MALFORMED.to_string()),
    }
}

fn validate_array(node: &Map<String, Value>, depth: usize) -> ValidationResult {
    let Some(items) = node.get("items") else {
        return ValidationResult::invalid("array schema missing items");
    };

    if let Err(reason) = check_bounds(node, "minItems", "maxItems") {
        return ValidationResult::invalid(reason);
    }

    validate_schema_at(items, depth + 1).within("items")
}

fn validate_leaf(node: &Map<String, Value>, kind: SchemaKind) -> ValidationResult {
    let allowed = allowed_keys(kind).unwrap_or_default();

    if let Some(key) = node.keys().find(|key| !allowed.contains(&key.as_str())) {
        return ValidationResult::invalid(format!(
            "key {key:?} is not allowed on {kind} schema (allowed: {})",
            allowed.join(", ")
        ));
    }

    if kind == SchemaKind::String {
        if let Err(reason) = check_bounds(node, "minLength", "maxLength") {
            return ValidationResult::invalid(reason);
        }
    }

    ValidationResult::valid()
}

/// Both bounds, when present, must be non-negative integers.
fn check_bounds(node: &Map<String, Value>, min_key: &str, max_key: &str) -> Result<(), String> {
    count_field(node, min_key)?;
    count_field(node, max_key)?;
    Ok(())
}

fn count_field(node: &Map<String, Value>, key: &str) -> Result<Option<u64>, String> {
    match node.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("{key} must be a non-negative integer, found {value}")),
    }
}
