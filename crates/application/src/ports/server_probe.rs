use async_trait::async_trait;
use bytes::Bytes;
use iterdns_domain::DomainError;
use std::net::IpAddr;
use std::time::Duration;

/// Raw reply to a single probe.
#[derive(Debug, Clone)]
pub struct ProbeReply {
    pub bytes: Bytes,
    pub rtt: Duration,
}

/// Sends one query to one server and waits at most `timeout` for the reply.
///
/// Implementations never retry; a timeout is reported as
/// `DomainError::ProbeTimeout` and the caller moves on to its next candidate.
#[async_trait]
pub trait ServerProbe: Send + Sync {
    async fn probe(
        &self,
        server: IpAddr,
        query: &[u8],
        timeout: Duration,
    ) -> Result<ProbeReply, DomainError>;
}
