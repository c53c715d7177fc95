use std::sync::Arc;

use crate::config::ServerConfig;
use crate::protocol::{SchemaRef, ToolError, ToolResult, ValidateDataParams};
use crate::registry::SchemaRegistry;
use crate::schema::Schema;

use super::run_blocking;

/// Handle a `data.validate` tool call.
///
/// The schema is looked up in the registry by name, or validated and
/// decoded when supplied inline. A schema that cannot be used is a tool
/// error (`schema_missing` / `schema_invalid`, the latter carrying the
/// schema's own validation outcome), kept distinct from a `valid: false`
/// data result.
pub async fn handle(
    params: ValidateDataParams,
    config: &ServerConfig,
    registry: &Arc<SchemaRegistry>,
) -> ToolResult {
    let registry = Arc::clone(registry);

    run_blocking(config.tool_timeout, move || {
        let schema = resolve_schema(params.schema, &registry)?;
        let outcome = schema.check(&params.value);
        tracing::debug!(valid = outcome.valid, "data.validate");
        Ok(outcome)
    })
    .await
}

fn resolve_schema(
    reference: SchemaRef,
    registry: &SchemaRegistry,
) -> Result<Arc<Schema>, ToolError> {
    match reference {
        SchemaRef::Named(name) => registry
            .get(&name)
            .map(|registered| Arc::clone(&registered.schema))
            .ok_or(ToolError::SchemaMissing(name)),
        SchemaRef::Inline(document) => Schema::from_json(&document)
            .map(Arc::new)
            .map_err(ToolError::from),
    }
}
