use serde::{Deserialize, Serialize};

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (default: "info")
    /// Options: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append-only file receiving the delimited step lines (default: "resolver_log.txt")
    #[serde(default = "default_trace_log")]
    pub trace_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            trace_log: default_trace_log(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_trace_log() -> String {
    "resolver_log.txt".to_string()
}
