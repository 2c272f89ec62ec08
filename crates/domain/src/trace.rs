//! Resolution trace model.
//!
//! A [`ResolutionTrace`] is the ordered, flattened list of every probe a
//! top-level resolution performed, including the probes issued while
//! resolving glue-less nameserver hostnames. Step indices are 1-based and
//! continue across nested resolutions, so the trace reads in the order the
//! probes actually happened.

use crate::DnsQuery;
use bytes::Bytes;
use chrono::{DateTime, Local};
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;
use std::time::Duration;

/// Position of a step in the delegation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Root,
    Tld,
    Authoritative,
    Cache,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Root => "Root",
            Stage::Tld => "TLD",
            Stage::Authoritative => "Authoritative",
            Stage::Cache => "Cache",
        }
    }

    /// Stage of a step that produced no usable response, from its delegation level alone.
    pub fn for_level(level: usize) -> Self {
        match level {
            0 | 1 => Stage::Root,
            2 => Stage::Tld,
            _ => Stage::Authoritative,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a step was answered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepServer {
    Address(IpAddr),
    Cache,
}

impl fmt::Display for StepServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepServer::Address(ip) => write!(f, "{}", ip),
            StepServer::Cache => f.write_str("CACHE"),
        }
    }
}

impl From<IpAddr> for StepServer {
    fn from(ip: IpAddr) -> Self {
        StepServer::Address(ip)
    }
}

/// What happened to the probe behind a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeStatus {
    Responded,
    TimedOut,
    Malformed,
    Unreachable,
}

#[derive(Debug, Clone)]
pub struct StepRecord {
    pub step_index: usize,
    pub server: StepServer,
    pub stage: Stage,
    /// `None` when the server never produced a usable reply.
    pub rtt: Option<Duration>,
    pub response_summary: Vec<String>,
    pub status: ProbeStatus,
    pub timestamp: DateTime<Local>,
}

impl StepRecord {
    pub fn responded(
        server: IpAddr,
        stage: Stage,
        rtt: Duration,
        response_summary: Vec<String>,
    ) -> Self {
        Self {
            step_index: 0,
            server: StepServer::Address(server),
            stage,
            rtt: Some(rtt),
            response_summary,
            status: ProbeStatus::Responded,
            timestamp: Local::now(),
        }
    }

    pub fn failed(server: IpAddr, stage: Stage, status: ProbeStatus, detail: String) -> Self {
        Self {
            step_index: 0,
            server: StepServer::Address(server),
            stage,
            rtt: None,
            response_summary: vec![detail],
            status,
            timestamp: Local::now(),
        }
    }

    pub fn cache_hit(addresses: &[IpAddr]) -> Self {
        Self {
            step_index: 0,
            server: StepServer::Cache,
            stage: Stage::Cache,
            rtt: Some(Duration::ZERO),
            response_summary: addresses.iter().map(|ip| ip.to_string()).collect(),
            status: ProbeStatus::Responded,
            timestamp: Local::now(),
        }
    }

    pub fn rtt_ms(&self) -> Option<f64> {
        self.rtt.map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Field-wise equality that ignores the wall-clock timestamp.
    pub fn same_step(&self, other: &StepRecord) -> bool {
        self.step_index == other.step_index
            && self.server == other.server
            && self.stage == other.stage
            && self.rtt == other.rtt
            && self.response_summary == other.response_summary
            && self.status == other.status
    }
}

/// Ordered, finalized record of one top-level resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolutionTrace {
    records: Vec<StepRecord>,
    elapsed: Duration,
}

impl ResolutionTrace {
    /// Builds a finalized trace. Records must already carry consecutive indices from 1.
    pub fn new(records: Vec<StepRecord>, elapsed: Duration) -> Self {
        debug_assert!(records
            .iter()
            .enumerate()
            .all(|(i, r)| r.step_index == i + 1));
        Self { records, elapsed }
    }

    pub fn records(&self) -> &[StepRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StepRecord> {
        self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StepRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn stages(&self) -> Vec<Stage> {
        self.records.iter().map(|r| r.stage).collect()
    }

    /// Distinct servers in first-visit order.
    pub fn servers_visited(&self) -> Vec<StepServer> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| seen.insert(r.server))
            .map(|r| r.server)
            .collect()
    }

    /// Sum of all measured round trips; timeouts contribute nothing.
    pub fn total_rtt(&self) -> Duration {
        self.records.iter().filter_map(|r| r.rtt).sum()
    }

    /// Compares two traces field by field, ignoring timestamps.
    pub fn same_steps(&self, other: &ResolutionTrace) -> bool {
        self.records.len() == other.records.len()
            && self
                .records
                .iter()
                .zip(other.records.iter())
                .all(|(a, b)| a.same_step(b))
    }
}

impl<'a> IntoIterator for &'a ResolutionTrace {
    type Item = &'a StepRecord;
    type IntoIter = std::slice::Iter<'a, StepRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    #[error("no candidate server responded")]
    CandidatesExhausted,

    #[error("referral left no reachable next-hop servers")]
    NoCandidatesRemaining,

    #[error("referral limit reached")]
    ReferralLimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Addresses from the answer section. May be empty when the query type
    /// carries no addresses; the answer message still holds the records.
    Answer(Vec<IpAddr>),
    Failure(FailureReason),
}

impl ResolutionOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, ResolutionOutcome::Answer(_))
    }

    pub fn addresses(&self) -> &[IpAddr] {
        match self {
            ResolutionOutcome::Answer(addrs) => addrs,
            ResolutionOutcome::Failure(_) => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolutionResult {
    pub query: DnsQuery,
    pub outcome: ResolutionOutcome,
    /// Wire bytes of the authoritative answer, relayed verbatim to requesters.
    pub answer_message: Option<Bytes>,
    pub trace: ResolutionTrace,
    pub from_cache: bool,
}

impl ResolutionResult {
    pub fn elapsed(&self) -> Duration {
        self.trace.elapsed()
    }

    pub fn is_answer(&self) -> bool {
        self.outcome.is_answer()
    }

    pub fn addresses(&self) -> &[IpAddr] {
        self.outcome.addresses()
    }

    /// An answer that yielded at least one address; the only kind worth
    /// caching or counting as a successful lookup.
    pub fn has_addresses(&self) -> bool {
        !self.addresses().is_empty()
    }
}
