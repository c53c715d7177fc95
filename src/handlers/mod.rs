pub mod health;
pub mod list_schemas;
pub mod validate_data;
pub mod validate_schema;

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ServerConfig;
use crate::protocol::{
    InitializeParams, JsonRpcError, JsonRpcRequest, JsonRpcResponse, ToolCallParams, ToolError,
    ToolResult, ValidateDataParams, ValidateSchemaParams,
};
use crate::registry::SchemaRegistry;

/// Dispatch a JSON-RPC request to the appropriate handler.
///
/// Returns `None` for notifications (no response required).
pub async fn dispatch(
    req: &JsonRpcRequest,
    config: &ServerConfig,
    registry: &Arc<SchemaRegistry>,
) -> Option<JsonRpcResponse> {
    match req.method.as_str() {
        "initialize" => {
            if let Some(params) = req
                .params
                .as_ref()
                .and_then(|v| serde_json::from_value::<InitializeParams>(v.clone()).ok())
            {
                let client = params.client_info.as_ref();
                tracing::info!(
                    protocol_version = params.protocol_version.as_deref().unwrap_or("unknown"),
                    client = client.and_then(|c| c.name.as_deref()).unwrap_or("unknown"),
                    client_version = client.and_then(|c| c.version.as_deref()).unwrap_or("unknown"),
                    "initialize"
                );
            }

            let result = serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "mcp-schema-validator",
                    "version": env!("CARGO_PKG_VERSION")
                }
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "notifications/initialized" => None,

        "ping" => Some(JsonRpcResponse::success(req.id.clone(), serde_json::json!({}))),

        "tools/list" => {
            let result = serde_json::json!({
                "tools": [
                    {
                        "name": "schema.validate",
                        "description": "Check that a schema document is well formed in the supported dialect",
                        "inputSchema": {
                            "type": "object",
                            "required": ["schema"],
                            "properties": {
                                "schema": {
                                    "type": "object",
                                    "description": "Candidate schema document"
                                }
                            }
                        }
                    },
                    {
                        "name": "data.validate",
                        "description": "Check a JSON value against a registered or inline schema",
                        "inputSchema": {
                            "type": "object",
                            "required": ["schema", "value"],
                            "properties": {
                                "schema": {
                                    "type": ["string", "object"],
                                    "description": "Registered schema name (file stem under SCHEMA_ROOT) or an inline schema document"
                                },
                                "value": {
                                    "description": "Data value to validate"
                                }
                            }
                        }
                    },
                    {
                        "name": "schemas.list",
                        "description": "List schemas preloaded from the server's schema root",
                        "inputSchema": {
                            "type": "object",
                            "properties": {}
                        }
                    }
                ]
            });
            Some(JsonRpcResponse::success(req.id.clone(), result))
        }

        "tools/call" => {
            let params: ToolCallParams = match &req.params {
                Some(v) => match serde_json::from_value(v.clone()) {
                    Ok(p) => p,
                    Err(e) => {
                        return Some(JsonRpcResponse::error(
                            req.id.clone(),
                            JsonRpcError::invalid_params(format!(
                                "Invalid tools/call params: {e}"
                            )),
                        ));
                    }
                },
                None => {
                    return Some(JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::invalid_params("Missing params for tools/call"),
                    ));
                }
            };

            let tool_result = dispatch_tool_call(&params, config, registry).await;
            let result_json = serde_json::to_value(&tool_result).expect("ToolResult must serialize to JSON Value");
            Some(JsonRpcResponse::success(req.id.clone(), result_json))
        }

        _ => {
            tracing::debug!(method = %req.method, "method not found");
            Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::method_not_found(&req.method),
            ))
        }
    }
}

async fn dispatch_tool_call(
    params: &ToolCallParams,
    config: &ServerConfig,
    registry: &Arc<SchemaRegistry>,
) -> ToolResult {
    match params.name.as_str() {
        "schema.validate" => match parse_arguments::<ValidateSchemaParams>(params) {
            Ok(args) => validate_schema::handle(args, config).await,
            Err(err) => err.into(),
        },

        "data.validate" => match parse_arguments::<ValidateDataParams>(params) {
            Ok(args) => validate_data::handle(args, config, registry).await,
            Err(err) => err.into(),
        },

        "schemas.list" => list_schemas::handle(registry).await,

        "health" => health::handle().await,

        other => ToolError::UnknownTool(other.to_string()).into(),
    }
}

fn parse_arguments<T: DeserializeOwned>(params: &ToolCallParams) -> Result<T, ToolError> {
    let invalid = |detail: String| ToolError::InvalidArguments {
        tool: params.name.clone(),
        detail,
    };

    let arguments = params
        .arguments
        .as_ref()
        .ok_or_else(|| invalid("missing arguments".to_string()))?;

    serde_json::from_value(arguments.clone()).map_err(|e| invalid(e.to_string()))
}

/// Run a validation on a blocking thread, bounded by the tool timeout.
///
/// `work` yields the payload of a successful call (a [`crate::schema::ValidationResult`]
/// for both validators) or the reason no outcome could be produced.
pub(crate) async fn run_blocking<F, T>(timeout: Duration, work: F) -> ToolResult
where
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let task = tokio::task::spawn_blocking(work);

    let outcome = match tokio::time::timeout(timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_err)) => {
            tracing::error!(error = %join_err, "validation task failed");
            Err(ToolError::Internal)
        }
        Err(_) => {
            tracing::error!(timeout_secs = timeout.as_secs(), "validation timed out");
            Err(ToolError::Internal)
        }
    };

    outcome
        .and_then(|payload| ToolResult::structured(&payload))
        .unwrap_or_else(ToolResult::from)
}
