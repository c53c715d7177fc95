use std::sync::Arc;

use mcp_schema_validator::config::ServerConfig;
use mcp_schema_validator::registry::SchemaRegistry;
use mcp_schema_validator::server::McpServer;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-schema-validator: configuration error: {e}");
            std::process::exit(1);
        }
    };

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let registry = match &config.schema_root {
        Some(root) => match SchemaRegistry::load(root) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!(error = %e, "cannot load schemas");
                std::process::exit(1);
            }
        },
        None => SchemaRegistry::empty(),
    };

    let mut server = McpServer::new(config, Arc::new(registry));
    if let Err(e) = server.run().await {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}
