use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::config::ServerConfig;
use crate::handlers;
use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use crate::registry::SchemaRegistry;

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cannot encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// MCP server speaking newline-delimited JSON-RPC 2.0.
///
/// Holds the preloaded schemas for the lifetime of the session; every
/// `data.validate` call against a registered name reuses the schema that
/// was validated once at load time.
pub struct McpServer {
    config: ServerConfig,
    registry: Arc<SchemaRegistry>,
    initialized: bool,
}

impl McpServer {
    pub fn new(config: ServerConfig, registry: Arc<SchemaRegistry>) -> Self {
        Self {
            config,
            registry,
            initialized: false,
        }
    }

    /// Serve on stdin/stdout until stdin closes.
    pub async fn run(&mut self) -> Result<(), ServerError> {
        tracing::info!(schemas = self.registry.len(), "serving on stdio");
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
    }

    /// Serve one session over any line-oriented transport.
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = Vec::new();

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                tracing::info!("input closed, shutting down");
                return Ok(());
            }

            if let Some(response) = self.handle_line(&line).await {
                let mut out = serde_json::to_vec(&response)?;
                out.push(b'\n');
                writer.write_all(&out).await?;
                writer.flush().await?;
            }
        }
    }

    /// Decode one raw message and produce its response, if any.
    ///
    /// Framing problems answer with a parse error and no id; notifications
    /// and blank lines produce nothing.
    pub async fn handle_line(&mut self, line: &[u8]) -> Option<JsonRpcResponse> {
        if line.len() > MAX_MESSAGE_BYTES {
            tracing::warn!(bytes = line.len(), limit = MAX_MESSAGE_BYTES, "message too large");
            return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
        }

        let text = match std::str::from_utf8(line) {
            Ok(text) => text.trim(),
            Err(e) => {
                tracing::warn!(error = %e, "message is not valid UTF-8");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };
        if text.is_empty() {
            return None;
        }

        let req: JsonRpcRequest = match serde_json::from_str(text) {
            Ok(req) => req,
            Err(e) => {
                tracing::warn!(error = %e, "malformed request");
                return Some(JsonRpcResponse::error(None, JsonRpcError::parse_error()));
            }
        };

        if req.jsonrpc != "2.0" {
            tracing::warn!(version = %req.jsonrpc, "unsupported jsonrpc version");
            return Some(JsonRpcResponse::error(
                req.id,
                JsonRpcError::invalid_request("Invalid Request"),
            ));
        }

        // Only `initialize` is accepted before the handshake; notifications are dropped.
        if !self.initialized && req.method != "initialize" {
            return req.id.map(|id| {
                JsonRpcResponse::error(
                    Some(id),
                    JsonRpcError::invalid_request("Server not initialized"),
                )
            });
        }

        let response = handlers::dispatch(&req, &self.config, &self.registry).await;
        if req.method == "initialize" {
            self.initialized = true;
        }
        response
    }
}
