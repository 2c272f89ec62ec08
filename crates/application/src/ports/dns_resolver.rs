use async_trait::async_trait;
use iterdns_domain::{DnsQuery, DomainError, ResolutionResult};

/// Entry point of a resolution engine.
///
/// Resolution failures (no responsive server, dead-end referral) are not
/// errors: they come back as a `ResolutionResult` whose outcome is a failure,
/// with the partial trace attached. `Err` is reserved for queries that can't
/// be encoded at all.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError>;
}
