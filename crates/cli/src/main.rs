//! # iterdns
//!
//! Iterative DNS resolver: a UDP service and a batch lookup client, both
//! walking the delegation chain from the root servers.

mod bootstrap;
mod di;
mod lookup;
mod server;

use clap::{Parser, Subcommand};
use iterdns_domain::{CliOverrides, RecordType};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "iterdns")]
#[command(version = "0.1.0")]
#[command(about = "Iterative DNS resolver with step-by-step resolution traces")]
struct Cli {
    /// Path to configuration file (defaults to ./iterdns.toml when present)
    #[arg(short = 'c', long, global = true)]
    config: Option<String>,

    /// Bind address for the DNS service
    #[arg(short = 'b', long, global = true)]
    bind: Option<String>,

    /// DNS service port
    #[arg(short = 'd', long, global = true)]
    dns_port: Option<u16>,

    /// Trace log file
    #[arg(short = 't', long, global = true)]
    trace_log: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, global = true)]
    log_level: Option<String>,

    /// Per-probe timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Answer UDP queries by iterative resolution
    Serve,

    /// Resolve a batch of domains and append a CSV summary
    Lookup {
        /// Domains to resolve; read from the queries file when omitted
        domains: Vec<String>,

        /// Record type to query
        #[arg(short = 'r', long, default_value = "A")]
        record_type: RecordType,

        /// File with one domain per line
        #[arg(short = 'q', long)]
        queries_file: Option<PathBuf>,

        /// Summary CSV file
        #[arg(short = 's', long)]
        summary_csv: Option<PathBuf>,

        /// Label written in the first CSV column
        #[arg(long)]
        label: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        bind_address: cli.bind,
        dns_port: cli.dns_port,
        trace_log: cli.trace_log,
        log_level: cli.log_level,
        probe_timeout_ms: cli.timeout_ms,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config);

    match cli.command {
        Command::Serve => {
            let services = di::Services::new(&config, true)?;
            if let Err(e) = services.trace_file.write_run_header().await {
                warn!(error = %e, "Could not write trace log header");
            }

            info!("Starting iterative resolver on {}", config.server.listen_address());
            server::start_dns_server(config.server.listen_address(), services.resolve_domain)
                .await?;
        }
        Command::Lookup {
            domains,
            record_type,
            queries_file,
            summary_csv,
            label,
        } => {
            let domains = if domains.is_empty() {
                let path = queries_file.unwrap_or_else(|| PathBuf::from(&config.lookup.queries_file));
                lookup::read_queries(&path)?
            } else {
                domains
            };

            let services = di::Services::new(&config, false)?;
            let label = label.unwrap_or_else(|| config.lookup.label.clone());

            let summary = lookup::run_lookup(
                &domains,
                record_type,
                &label,
                Duration::from_millis(config.lookup.pause_ms),
                &services.resolve_domain,
            )
            .await;

            let csv = summary_csv.unwrap_or_else(|| PathBuf::from(&config.lookup.summary_csv));
            lookup::append_summary(&csv, &summary).await?;
            info!("Detailed log saved to {}", services.trace_file.path().display());
        }
    }

    Ok(())
}
