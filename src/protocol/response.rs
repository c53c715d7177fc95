use serde::Serialize;
use serde_json::{json, Value};

use crate::schema::{SchemaError, ValidationResult};

use super::request::RpcId;

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self { jsonrpc: "2.0", id, result: None, error: Some(error) }
    }
}

/// Protocol-level failures. Validation outcomes never travel here.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcError {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;

    pub fn parse_error() -> Self {
        Self { code: Self::PARSE_ERROR, message: "Parse error".into() }
    }

    pub fn invalid_request(detail: impl Into<String>) -> Self {
        Self { code: Self::INVALID_REQUEST, message: detail.into() }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self { code: Self::METHOD_NOT_FOUND, message: format!("Method not found: {method}") }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: Self::INVALID_PARAMS, message: detail.into() }
    }
}

/// Why a tool call could not produce a validation outcome.
///
/// A schema or value that merely fails validation is *not* a tool error;
/// it is a successful call carrying `valid: false`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ToolError {
    #[error("Schema is not registered: {0}")]
    SchemaMissing(String),
    /// The schema itself failed validation; carries the rejecting outcome.
    #[error("Schema is invalid: {}", rejection_reason(.0))]
    SchemaInvalid(ValidationResult),
    #[error("Invalid arguments for {tool}: {detail}")]
    InvalidArguments { tool: String, detail: String },
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Internal error")]
    Internal,
}

fn rejection_reason(outcome: &ValidationResult) -> &str {
    outcome.reason.as_deref().unwrap_or_default()
}

impl ToolError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::SchemaMissing(_) => "schema_missing",
            Self::SchemaInvalid(_) => "schema_invalid",
            Self::InvalidArguments { .. } => "invalid_arguments",
            Self::UnknownTool(_) => "unknown_tool",
            Self::Internal => "internal_error",
        }
    }

    /// `{"error": {"code", "message", "validation"?}}`
    pub fn body(&self) -> Value {
        let mut error = json!({
            "code": self.code(),
            "message": self.to_string(),
        });
        if let Self::SchemaInvalid(outcome) = self {
            error["validation"] = json!(outcome);
        }
        json!({ "error": error })
    }
}

impl From<SchemaError> for ToolError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::Invalid(reason) => Self::SchemaInvalid(ValidationResult::invalid(reason)),
            other => {
                tracing::error!(error = %other, "accepted schema failed to decode");
                Self::Internal
            }
        }
    }
}

/// MCP `tools/call` result.
///
/// The JSON payload is sent both as a text block, for clients that only read
/// `content`, and as `structuredContent`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "structuredContent")]
    pub structured_content: Value,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: &'static str,
    pub text: String,
}

impl ToolResult {
    fn from_value(payload: Value, is_error: bool) -> Self {
        Self {
            content: vec![ToolResultContent {
                content_type: "text",
                text: payload.to_string(),
            }],
            structured_content: payload,
            is_error,
        }
    }

    /// Successful result carrying `payload`, typically a [`ValidationResult`].
    pub fn structured<T: Serialize>(payload: &T) -> Result<Self, ToolError> {
        let value = serde_json::to_value(payload).map_err(|e| {
            tracing::error!(error = %e, "tool payload serialization failed");
            ToolError::Internal
        })?;
        Ok(Self::from_value(value, false))
    }
}

impl From<ToolError> for ToolResult {
    fn from(err: ToolError) -> Self {
        Self::from_value(err.body(), true)
    }
}
