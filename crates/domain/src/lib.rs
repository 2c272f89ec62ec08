//! iterdns Domain Layer
pub mod config;
pub mod dns_query;
pub mod dns_record;
pub mod errors;
pub mod trace;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_query::DnsQuery;
pub use dns_record::RecordType;
pub use errors::DomainError;
pub use trace::{
    FailureReason, ProbeStatus, ResolutionOutcome, ResolutionResult, ResolutionTrace, Stage,
    StepRecord, StepServer,
};
