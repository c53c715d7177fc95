use serde::Serialize;

use crate::protocol::ToolResult;
use crate::registry::{RejectedSchema, SchemaRegistry, SchemaSummary};

#[derive(Debug, Serialize)]
struct ListSchemasResponse {
    schemas: Vec<SchemaSummary>,
    rejected: Vec<RejectedSchema>,
}

/// Handle a `schemas.list` tool call.
///
/// Reports the schemas preloaded from the configured schema root and the
/// files that were refused at load time. Both lists are sorted by name
/// (UTF-8 byte order) for determinism.
pub async fn handle(registry: &SchemaRegistry) -> ToolResult {
    let payload = ListSchemasResponse {
        schemas: registry.entries(),
        rejected: registry.rejected(),
    };

    ToolResult::structured(&payload).unwrap_or_else(ToolResult::from)
}
