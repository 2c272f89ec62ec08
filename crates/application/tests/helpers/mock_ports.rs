use async_trait::async_trait;
use bytes::Bytes;
use iterdns_application::ports::{CacheStatus, DnsResolver, TraceSink};
use iterdns_domain::{
    DnsQuery, DomainError, FailureReason, ResolutionOutcome, ResolutionResult, ResolutionTrace,
    Stage, StepRecord,
};
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Resolver returning a canned outcome and counting invocations.
pub struct StubResolver {
    answer: Option<Vec<IpAddr>>,
    calls: AtomicUsize,
}

impl StubResolver {
    pub fn answering(addresses: &[&str]) -> Self {
        Self {
            answer: Some(addresses.iter().map(|a| a.parse().unwrap()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsResolver for StubResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let server: IpAddr = "198.41.0.4".parse().unwrap();
        let (outcome, message, mut step) = match &self.answer {
            Some(addrs) => (
                ResolutionOutcome::Answer(addrs.clone()),
                Some(Bytes::from_static(b"\x12\x34answer")),
                StepRecord::responded(
                    server,
                    Stage::Root,
                    Duration::from_millis(3),
                    addrs.iter().map(|a| a.to_string()).collect(),
                ),
            ),
            None => (
                ResolutionOutcome::Failure(FailureReason::CandidatesExhausted),
                None,
                StepRecord::failed(
                    server,
                    Stage::Root,
                    iterdns_domain::ProbeStatus::TimedOut,
                    "Timeout".to_string(),
                ),
            ),
        };
        step.step_index = 1;

        Ok(ResolutionResult {
            query: query.clone(),
            outcome,
            answer_message: message,
            trace: ResolutionTrace::new(vec![step], Duration::from_millis(3)),
            from_cache: false,
        })
    }
}

/// Sink remembering what it was handed.
#[derive(Default)]
pub struct RecordingSink {
    pub recorded: Mutex<Vec<(String, CacheStatus, usize)>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn broken() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn entries(&self) -> Vec<(String, CacheStatus, usize)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl TraceSink for RecordingSink {
    async fn record(
        &self,
        result: &ResolutionResult,
        cache_status: CacheStatus,
    ) -> Result<(), DomainError> {
        if self.fail {
            return Err(DomainError::TraceSink("disk full".to_string()));
        }
        self.recorded.lock().unwrap().push((
            result.query.display_domain().to_string(),
            cache_status,
            result.trace.len(),
        ));
        Ok(())
    }
}
