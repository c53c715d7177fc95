//! Schema data model for the restricted JSON Schema dialect.
//!
//! The dialect knows five node types: `string`, `number`, `boolean`,
//! `array` and `object`. Untyped documents (parsed JSON) go through
//! [`validate_schema`] before they are decoded into the closed [`Schema`]
//! sum type; data values are then checked with [`Schema::check`].

mod data;
mod meta;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use data::{check_at, validate_data};
pub use meta::{validate_schema, validate_schema_at};

/// Deepest nesting level accepted by both validators. The root is level 0.
pub const MAX_DEPTH: usize = 20;

const STRING_KEYS: &[&str] = &["type", "default", "minLength", "maxLength"];
const BOOLEAN_KEYS: &[&str] = &["type", "default"];
const NUMBER_KEYS: &[&str] = &["type", "default"];

/// Keys permitted on a leaf schema node. Container types have no fixed key set.
pub fn allowed_keys(kind: SchemaKind) -> Option<&'static [&'static str]> {
    match kind {
        SchemaKind::String => Some(STRING_KEYS),
        SchemaKind::Boolean => Some(BOOLEAN_KEYS),
        SchemaKind::Number => Some(NUMBER_KEYS),
        SchemaKind::Array | SchemaKind::Object => None,
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid schema: {0}")]
    Invalid(String),
    #[error("schema decode error: {0}")]
    Decode(String),
}

/// Outcome of either validator.
///
/// `reason` carries the first violation found, prefixed by the property
/// names and array indices leading to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub reason: Option<String>,
}

impl ValidationResult {
    pub fn valid() -> Self {
        Self { valid: true, reason: None }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self { valid: false, reason: Some(reason.into()) }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Prefix the reason of an invalid result with `context`.
    pub fn within(self, context: impl fmt::Display) -> Self {
        if self.valid {
            return self;
        }
        let inner = self.reason.unwrap_or_default();
        Self::invalid(format!("{context}: {inner}"))
    }

    pub fn into_result(self) -> Result<(), String> {
        if self.valid {
            Ok(())
        } else {
            Err(self.reason.unwrap_or_default())
        }
    }
}

/// Type tag of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl SchemaKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "string" => Some(Self::String),
            "number" => Some(Self::Number),
            "boolean" => Some(Self::Boolean),
            "array" => Some(Self::Array),
            "object" => Some(Self::Object),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dynamic kind of a data value, computed once per value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    pub fn matches(&self, kind: SchemaKind) -> bool {
        matches!(
            (self, kind),
            (Self::Bool, SchemaKind::Boolean)
                | (Self::Number, SchemaKind::Number)
                | (Self::String, SchemaKind::String)
                | (Self::Array, SchemaKind::Array)
                | (Self::Object, SchemaKind::Object)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schema node that passed [`validate_schema`], or was built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Schema {
    String(StringSchema),
    Number(NumberSchema),
    Boolean(BooleanSchema),
    Array(ArraySchema),
    Object(ObjectSchema),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StringSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BooleanSchema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArraySchema {
    pub items: Box<Schema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_items: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectSchema {
    pub properties: BTreeMap<String, Schema>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub required: BTreeSet<String>,
}

impl Schema {
    /// Validate an untyped schema document and decode it.
    ///
    /// Documents rejected by [`validate_schema`] never reach the decoder.
    pub fn from_json(document: &Value) -> Result<Self, SchemaError> {
        validate_schema(document).into_result().map_err(SchemaError::Invalid)?;
        Self::deserialize(document).map_err(|e| SchemaError::Decode(e.to_string()))
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::String(_) => SchemaKind::String,
            Self::Number(_) => SchemaKind::Number,
            Self::Boolean(_) => SchemaKind::Boolean,
            Self::Array(_) => SchemaKind::Array,
            Self::Object(_) => SchemaKind::Object,
        }
    }

    /// Check a data value against this schema.
    pub fn check(&self, value: &Value) -> ValidationResult {
        check_at(value, self, 0)
    }

    /// Canonical compact JSON form: sorted keys, no whitespace.
    pub fn to_canonical_json(&self) -> String {
        let value = serde_json::to_value(self).expect("Schema must serialize to JSON Value");
        value.to_string()
    }
}

/// Parse a schema and an instance from JSON text and run both validators.
///
/// A schema that fails validation is an error; an instance that does not
/// conform is an `Ok` result with `valid == false`.
pub fn validate_json(schema_str: &str, instance_str: &str) -> Result<ValidationResult, SchemaError> {
    let schema_json: Value = serde_json::from_str(schema_str)?;
    let instance_json: Value = serde_json::from_str(instance_str)?;

    let schema = Schema::from_json(&schema_json)?;
    Ok(schema.check(&instance_json))
}

fn quoted_list<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    names
        .into_iter()
        .map(|name| format!("{name:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}
