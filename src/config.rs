use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for tool operations (30 seconds).
const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Default tracing filter when `SCHEMA_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub schema_root: Option<PathBuf>,
    pub tool_timeout: Duration,
    pub log_filter: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            schema_root: None,
            tool_timeout: Duration::from_secs(DEFAULT_TOOL_TIMEOUT_SECS),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `SCHEMA_ROOT` (optional) — directory of `*.json` schemas to preload
    /// - `SCHEMA_TOOL_TIMEOUT_SECS` (optional, default 30) — max seconds per tool call
    /// - `SCHEMA_LOG` (optional, default `info`) — tracing filter directive
    pub fn from_env() -> Result<Self, String> {
        let schema_root = std::env::var("SCHEMA_ROOT").ok().map(PathBuf::from);

        let tool_timeout_secs = match std::env::var("SCHEMA_TOOL_TIMEOUT_SECS") {
            Ok(val) => match val.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err("SCHEMA_TOOL_TIMEOUT_SECS must be a positive integer".to_string()),
            },
            Err(_) => DEFAULT_TOOL_TIMEOUT_SECS,
        };

        let log_filter = std::env::var("SCHEMA_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            schema_root,
            tool_timeout: Duration::from_secs(tool_timeout_secs),
            log_filter,
        })
    }
}
