use super::RecordType;
use std::fmt;
use std::sync::Arc;

/// DNS query (domain + record type).
/// Uses `Arc<str>` so nested glue lookups and cache keys clone cheaply.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DnsQuery {
    pub domain: Arc<str>,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new(domain: impl Into<Arc<str>>, record_type: RecordType) -> Self {
        Self {
            domain: domain.into(),
            record_type,
        }
    }

    /// Generic address query used when resolving a nameserver hostname.
    pub fn address_of(hostname: impl Into<Arc<str>>) -> Self {
        Self::new(hostname, RecordType::A)
    }

    /// Domain as written in trace logs: no trailing root dot.
    pub fn display_domain(&self) -> &str {
        let trimmed = self.domain.trim_end_matches('.');
        if trimmed.is_empty() {
            "."
        } else {
            trimmed
        }
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_domain(), self.record_type)
    }
}
