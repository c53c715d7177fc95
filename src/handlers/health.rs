use serde_json::json;

use crate::protocol::ToolResult;

/// Liveness check.
pub async fn handle() -> ToolResult {
    ToolResult::structured(&json!({ "status": "ok" })).unwrap_or_else(ToolResult::from)
}
