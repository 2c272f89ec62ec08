use std::net::IpAddr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed DNS message: {0}")]
    MalformedResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Probe to {server} timed out")]
    ProbeTimeout { server: IpAddr },

    #[error("Could not resolve nameserver {hostname}: {reason}")]
    GlueResolutionFailed { hostname: String, reason: String },

    #[error("Trace sink error: {0}")]
    TraceSink(String),
}
