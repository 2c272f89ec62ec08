use super::core::IterativeResolver;
use super::recorder::TraceRecorder;
use hickory_proto::rr::Name;
use iterdns_domain::{DnsQuery, DomainError, ResolutionOutcome, ResolutionTrace};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Nameserver hostnames being resolved on the current chain of nested
/// lookups, outermost first.
///
/// A hostname that is already on the chain would recurse into itself; the
/// chain length bounds how deep nested lookups may go.
#[derive(Debug, Clone, Default)]
pub struct GlueChain {
    hostnames: Vec<String>,
}

impl GlueChain {
    fn normalize(hostname: &str) -> String {
        hostname.trim_end_matches('.').to_ascii_lowercase()
    }

    pub fn depth(&self) -> usize {
        self.hostnames.len()
    }

    pub fn contains(&self, hostname: &str) -> bool {
        let wanted = Self::normalize(hostname);
        self.hostnames.iter().any(|h| *h == wanted)
    }

    pub fn descend(&self, hostname: &str) -> GlueChain {
        let mut hostnames = self.hostnames.clone();
        hostnames.push(Self::normalize(hostname));
        GlueChain { hostnames }
    }
}

/// Result of resolving one nameserver hostname, with whatever steps the
/// nested walk performed.
struct GlueLookup {
    addresses: Result<Vec<IpAddr>, DomainError>,
    trace: Option<ResolutionTrace>,
}

impl IterativeResolver {
    /// Resolves each hostname in turn and merges every address found.
    /// Hostnames that fail are skipped; nested steps are spliced into
    /// `recorder` as they complete.
    pub(super) async fn resolve_nameservers(
        &self,
        nameservers: &[Name],
        chain: &GlueChain,
        recorder: &mut TraceRecorder,
    ) -> Vec<IpAddr> {
        let mut resolved: Vec<IpAddr> = Vec::new();

        for nameserver in nameservers {
            let hostname = nameserver.to_utf8();
            let lookup = self.resolve_hostname_to_address(&hostname, chain).await;

            if let Some(trace) = lookup.trace {
                recorder.splice(trace);
            }

            match lookup.addresses {
                Ok(addresses) => {
                    debug!(hostname = %hostname, addresses = addresses.len(), "Nameserver resolved");
                    for ip in addresses {
                        if !resolved.contains(&ip) {
                            resolved.push(ip);
                        }
                    }
                }
                Err(e) => warn!(error = %e, "Skipping nameserver"),
            }
        }

        resolved
    }

    async fn resolve_hostname_to_address(&self, hostname: &str, chain: &GlueChain) -> GlueLookup {
        let failed = |reason: String| GlueLookup {
            addresses: Err(DomainError::GlueResolutionFailed {
                hostname: hostname.to_string(),
                reason,
            }),
            trace: None,
        };

        if chain.contains(hostname) {
            return failed("delegation cycle".to_string());
        }
        if chain.depth() >= self.max_glue_depth {
            return failed(format!("nesting deeper than {}", self.max_glue_depth));
        }

        let query = DnsQuery::address_of(hostname);
        let nested = chain.descend(hostname);

        match self.walk(&query, &nested).await {
            Ok(result) => {
                let addresses = result.addresses().to_vec();
                let addresses = if addresses.is_empty() {
                    Err(DomainError::GlueResolutionFailed {
                        hostname: hostname.to_string(),
                        reason: match &result.outcome {
                            ResolutionOutcome::Failure(reason) => reason.to_string(),
                            ResolutionOutcome::Answer(_) => "answer carried no addresses".to_string(),
                        },
                    })
                } else {
                    Ok(addresses)
                };
                GlueLookup {
                    addresses,
                    trace: Some(result.trace),
                }
            }
            Err(e) => failed(e.to_string()),
        }
    }
}
