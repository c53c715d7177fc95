use crate::config::ServerConfig;
use crate::protocol::{ToolResult, ValidateSchemaParams};
use crate::schema::validate_schema;

use super::run_blocking;

/// Handle a `schema.validate` tool call.
///
/// A malformed schema is a successful call whose payload has
/// `valid: false`; only server failures are tool errors.
pub async fn handle(params: ValidateSchemaParams, config: &ServerConfig) -> ToolResult {
    run_blocking(config.tool_timeout, move || {
        let outcome = validate_schema(&params.schema);
        tracing::debug!(valid = outcome.valid, "schema.validate");
        Ok(outcome)
    })
    .await
}
