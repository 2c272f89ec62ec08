use iterdns_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(
    config_path: Option<&str>,
    cli_overrides: CliOverrides,
) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;

    info!(
        config_file = config_path.unwrap_or("default"),
        roots = config.resolver.root_servers.len(),
        probe_timeout_ms = config.resolver.probe_timeout_ms,
        listen = %config.server.listen_address(),
        trace_log = %config.logging.trace_log,
        "Configuration loaded"
    );

    Ok(config)
}
