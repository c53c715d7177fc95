//! Validator for a restricted JSON Schema dialect.
//!
//! [`schema::validate_schema`] checks that a schema document is well formed;
//! [`schema::Schema::check`] and [`schema::validate_data`] check data values
//! against an accepted schema. The same operations are exposed as
//! `schema.validate` and `data.validate` MCP tools over JSON-RPC 2.0 stdio.

pub mod config;
pub mod handlers;
pub mod protocol;
pub mod registry;
pub mod server;

pub mod schema;
