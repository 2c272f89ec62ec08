pub mod dns_resolver;
pub mod server_probe;
pub mod trace_sink;

pub use dns_resolver::DnsResolver;
pub use server_probe::{ProbeReply, ServerProbe};
pub use trace_sink::{CacheStatus, TraceSink};
