use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use super::{ConfigError, LoggingConfig, LookupConfig, ResolverConfig, ServerConfig};

const DEFAULT_CONFIG_FILE: &str = "iterdns.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub resolver: ResolverConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub lookup: LookupConfig,
}

/// Values given on the command line take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind_address: Option<String>,
    pub dns_port: Option<u16>,
    pub trace_log: Option<String>,
    pub log_level: Option<String>,
    pub probe_timeout_ms: Option<u64>,
}

impl Config {
    /// Loads `path`, or `iterdns.toml` in the working directory when present,
    /// or the built-in defaults.
    pub fn load(path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };

        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(trace_log) = overrides.trace_log {
            self.logging.trace_log = trace_log;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(timeout) = overrides.probe_timeout_ms {
            self.resolver.probe_timeout_ms = timeout;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolver.root_servers.is_empty() {
            return Err(ConfigError::Validation(
                "resolver.root_servers must list at least one server".to_string(),
            ));
        }
        self.resolver.root_addresses()?;

        if self.resolver.probe_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "resolver.probe_timeout_ms must be greater than zero".to_string(),
            ));
        }

        if self.resolver.max_referrals == 0 {
            return Err(ConfigError::Validation(
                "resolver.max_referrals must be greater than zero".to_string(),
            ));
        }

        let listen = self.server.listen_address();
        listen
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddress(listen.clone()))?;

        Ok(())
    }
}
