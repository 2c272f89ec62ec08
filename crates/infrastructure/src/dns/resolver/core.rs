use super::classifier::{classify_stage, summarize};
use super::glue::GlueChain;
use super::recorder::TraceRecorder;
use crate::dns::forwarding::{DnsResponse, MessageBuilder, ResponseParser};
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use iterdns_application::ports::{DnsResolver, ServerProbe};
use iterdns_domain::config::ResolverConfig;
use iterdns_domain::{
    ConfigError, DnsQuery, DomainError, FailureReason, ProbeStatus, ResolutionOutcome,
    ResolutionResult, Stage, StepRecord,
};
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Iterative resolver.
///
/// Holds only immutable settings; every call to [`IterativeResolver::resolve`]
/// owns its own candidate set and trace, so one instance can serve many
/// concurrent lookups.
pub struct IterativeResolver {
    probe: Arc<dyn ServerProbe>,
    root_servers: Arc<[IpAddr]>,
    probe_timeout: Duration,
    pub(super) max_glue_depth: usize,
    max_referrals: usize,
}

impl IterativeResolver {
    pub fn new(probe: Arc<dyn ServerProbe>, root_servers: Vec<IpAddr>) -> Self {
        let defaults = ResolverConfig::default();
        Self {
            probe,
            root_servers: root_servers.into(),
            probe_timeout: defaults.probe_timeout(),
            max_glue_depth: defaults.max_glue_depth,
            max_referrals: defaults.max_referrals,
        }
    }

    pub fn from_config(
        config: &ResolverConfig,
        probe: Arc<dyn ServerProbe>,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(probe, config.root_addresses()?)
            .with_probe_timeout(config.probe_timeout())
            .with_max_glue_depth(config.max_glue_depth)
            .with_max_referrals(config.max_referrals))
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn with_max_glue_depth(mut self, depth: usize) -> Self {
        self.max_glue_depth = depth;
        self
    }

    pub fn with_max_referrals(mut self, levels: usize) -> Self {
        self.max_referrals = levels.max(1);
        self
    }

    pub fn root_servers(&self) -> &[IpAddr] {
        &self.root_servers
    }

    /// Resolves `query` starting from the root servers.
    pub async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        let result = self.walk(query, &GlueChain::default()).await?;

        info!(
            query = %query,
            steps = result.trace.len(),
            answered = result.is_answer(),
            elapsed_ms = result.elapsed().as_secs_f64() * 1000.0,
            "Iterative resolution finished"
        );

        Ok(result)
    }

    /// One complete delegation walk. Boxed because glue resolution re-enters it.
    pub(super) fn walk<'a>(
        &'a self,
        query: &'a DnsQuery,
        chain: &'a GlueChain,
    ) -> BoxFuture<'a, Result<ResolutionResult, DomainError>> {
        async move {
            let query_bytes = MessageBuilder::build_query(&query.domain, &query.record_type)?;

            let mut recorder = TraceRecorder::new();
            let mut candidates: Vec<IpAddr> = self.root_servers.to_vec();
            let mut answer_message = None;
            let mut level = 0;

            let outcome = loop {
                level += 1;
                if level > self.max_referrals {
                    warn!(query = %query, levels = self.max_referrals, "Referral limit reached");
                    break ResolutionOutcome::Failure(FailureReason::ReferralLimitReached);
                }

                let Some((server, response, rtt)) = self
                    .probe_level(&candidates, &query_bytes, level, &mut recorder)
                    .await
                else {
                    debug!(query = %query, level, "No candidate responded");
                    break ResolutionOutcome::Failure(FailureReason::CandidatesExhausted);
                };

                let stage = classify_stage(level, &response);
                recorder.record(StepRecord::responded(
                    server,
                    stage,
                    rtt,
                    summarize(&response),
                ));

                debug!(
                    query = %query,
                    server = %server,
                    stage = %stage,
                    rcode = ResponseParser::rcode_to_status(response.rcode()),
                    answers = response.answers().len(),
                    "Step recorded"
                );

                if response.has_answers() {
                    answer_message = Some(response.raw_bytes.clone());
                    break ResolutionOutcome::Answer(response.answer_addresses());
                }

                let next = self
                    .next_candidates(&response, chain, &mut recorder)
                    .await;
                if next.is_empty() {
                    debug!(query = %query, level, "Referral left no next-hop servers");
                    break ResolutionOutcome::Failure(FailureReason::NoCandidatesRemaining);
                }
                candidates = next;
            };

            Ok(ResolutionResult {
                query: query.clone(),
                outcome,
                answer_message,
                trace: recorder.finish(),
                from_cache: false,
            })
        }
        .boxed()
    }

    /// Tries `candidates` in order and returns the first one that produced a
    /// parseable reply. Every failed candidate leaves one step without RTT.
    async fn probe_level(
        &self,
        candidates: &[IpAddr],
        query_bytes: &[u8],
        level: usize,
        recorder: &mut TraceRecorder,
    ) -> Option<(IpAddr, DnsResponse, Duration)> {
        for &server in candidates {
            let failure = match self
                .probe
                .probe(server, query_bytes, self.probe_timeout)
                .await
            {
                Ok(reply) => match ResponseParser::parse_bytes(reply.bytes) {
                    Ok(response) => return Some((server, response, reply.rtt)),
                    Err(e) => e,
                },
                Err(e) => e,
            };

            let (status, detail) = match &failure {
                DomainError::ProbeTimeout { .. } => {
                    (ProbeStatus::TimedOut, "FAIL (timeout)".to_string())
                }
                DomainError::MalformedResponse(msg) => (
                    ProbeStatus::Malformed,
                    format!("FAIL (malformed response: {})", msg),
                ),
                other => (ProbeStatus::Unreachable, format!("FAIL ({})", other)),
            };

            warn!(server = %server, level, error = %failure, "Candidate failed, trying next");
            recorder.record(StepRecord::failed(
                server,
                Stage::for_level(level),
                status,
                detail,
            ));
        }

        None
    }

    /// Glue addresses when the referral carries them, otherwise the addresses
    /// of the referral's nameserver hostnames.
    async fn next_candidates(
        &self,
        response: &DnsResponse,
        chain: &GlueChain,
        recorder: &mut TraceRecorder,
    ) -> Vec<IpAddr> {
        let glue = response.glue_addresses();
        if !glue.is_empty() {
            return glue.into_vec();
        }

        let nameservers = response.referral_nameservers();
        if nameservers.is_empty() {
            return Vec::new();
        }

        debug!(
            nameservers = nameservers.len(),
            "Referral without glue, resolving nameserver hostnames"
        );
        self.resolve_nameservers(&nameservers, chain, recorder).await
    }
}

#[async_trait]
impl DnsResolver for IterativeResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<ResolutionResult, DomainError> {
        IterativeResolver::resolve(self, query).await
    }
}
