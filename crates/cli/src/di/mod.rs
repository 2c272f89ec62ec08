use iterdns_application::use_cases::ResolveDomainUseCase;
use iterdns_domain::Config;
use iterdns_infrastructure::dns::{ConsoleTraceSink, FileTraceSink, IterativeResolver, UdpProbe};
use std::sync::Arc;
use tracing::info;

/// Everything a subcommand needs, wired from the configuration.
pub struct Services {
    pub trace_file: Arc<FileTraceSink>,
    pub resolve_domain: Arc<ResolveDomainUseCase>,
}

impl Services {
    pub fn new(config: &Config, console_trace: bool) -> anyhow::Result<Self> {
        let probe = Arc::new(UdpProbe::new(config.resolver.port));
        let resolver = Arc::new(IterativeResolver::from_config(&config.resolver, probe)?);
        let trace_file = Arc::new(FileTraceSink::new(&config.logging.trace_log));

        let mut resolve_domain = ResolveDomainUseCase::new(resolver.clone())
            .with_sink(trace_file.clone());
        if console_trace {
            resolve_domain = resolve_domain.with_sink(Arc::new(ConsoleTraceSink));
        }

        info!(
            roots = ?resolver.root_servers(),
            port = config.resolver.port,
            trace_log = %trace_file.path().display(),
            "Resolver services ready"
        );

        Ok(Self {
            trace_file,
            resolve_domain: Arc::new(resolve_domain),
        })
    }
}
