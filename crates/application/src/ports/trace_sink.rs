use async_trait::async_trait;
use iterdns_domain::{DomainError, ResolutionResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from the answer cache without touching the network.
    Hit,
    /// Resolved over the network and written to the cache.
    Stored,
    /// Resolved over the network; nothing was cached.
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "Cache HIT",
            CacheStatus::Stored => "Cache Stored",
            CacheStatus::Miss => "Cache MISS",
        }
    }
}

/// Consumer of finished resolutions (log files, consoles, collectors).
#[async_trait]
pub trait TraceSink: Send + Sync {
    async fn record(
        &self,
        result: &ResolutionResult,
        cache_status: CacheStatus,
    ) -> Result<(), DomainError>;
}
