use serde::{Deserialize, Serialize};

/// Batch lookup client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// One domain per line; blank lines are ignored
    #[serde(default = "default_queries_file")]
    pub queries_file: String,

    /// CSV receiving one `label,total,success,fail,avg_ms` line per run
    #[serde(default = "default_summary_csv")]
    pub summary_csv: String,

    #[serde(default = "default_label")]
    pub label: String,

    /// Pause between consecutive lookups in milliseconds (default: 300)
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            queries_file: default_queries_file(),
            summary_csv: default_summary_csv(),
            label: default_label(),
            pause_ms: default_pause_ms(),
        }
    }
}

fn default_queries_file() -> String {
    "queries.txt".to_string()
}

fn default_summary_csv() -> String {
    "lookup_summary.csv".to_string()
}

fn default_label() -> String {
    "H2".to_string()
}

fn default_pause_ms() -> u64 {
    300
}
