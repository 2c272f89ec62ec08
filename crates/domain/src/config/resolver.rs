use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

use super::ConfigError;

/// Iterative resolution settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Bootstrap servers, tried in the listed order
    #[serde(default = "default_root_servers")]
    pub root_servers: Vec<String>,

    /// Destination port for every probe (default: 53)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-probe timeout in milliseconds (default: 2000)
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Maximum nesting of nameserver-hostname lookups (default: 4)
    #[serde(default = "default_max_glue_depth")]
    pub max_glue_depth: usize,

    /// Maximum delegation levels walked for one query (default: 16)
    #[serde(default = "default_max_referrals")]
    pub max_referrals: usize,
}

impl ResolverConfig {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn root_addresses(&self) -> Result<Vec<IpAddr>, ConfigError> {
        self.root_servers
            .iter()
            .map(|s| {
                s.trim()
                    .parse::<IpAddr>()
                    .map_err(|_| ConfigError::InvalidRootServer(s.clone()))
            })
            .collect()
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_servers: default_root_servers(),
            port: default_port(),
            probe_timeout_ms: default_probe_timeout_ms(),
            max_glue_depth: default_max_glue_depth(),
            max_referrals: default_max_referrals(),
        }
    }
}

fn default_root_servers() -> Vec<String> {
    vec![
        "198.41.0.4".to_string(),
        "199.9.14.201".to_string(),
        "192.33.4.12".to_string(),
    ]
}

fn default_port() -> u16 {
    53
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_max_glue_depth() -> usize {
    4
}

fn default_max_referrals() -> usize {
    16
}
