use crate::ports::{CacheStatus, DnsResolver, TraceSink};
use crate::services::AnswerCache;
use iterdns_domain::{
    DnsQuery, DomainError, ResolutionOutcome, ResolutionResult, ResolutionTrace, StepRecord,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LookupOutcome {
    pub result: ResolutionResult,
    pub cache_status: CacheStatus,
}

/// Resolves one query: answer cache first (when one is supplied), then the
/// resolver, then every registered trace sink.
pub struct ResolveDomainUseCase {
    resolver: Arc<dyn DnsResolver>,
    sinks: Vec<Arc<dyn TraceSink>>,
}

impl ResolveDomainUseCase {
    pub fn new(resolver: Arc<dyn DnsResolver>) -> Self {
        Self {
            resolver,
            sinks: Vec::new(),
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub async fn execute(
        &self,
        query: &DnsQuery,
        cache: Option<&AnswerCache>,
    ) -> Result<LookupOutcome, DomainError> {
        if let Some(hit) = cache.and_then(|c| c.get(query)) {
            let mut step = StepRecord::cache_hit(&hit.addresses);
            step.step_index = 1;

            let result = ResolutionResult {
                query: query.clone(),
                outcome: ResolutionOutcome::Answer(hit.addresses.to_vec()),
                answer_message: hit.message,
                trace: ResolutionTrace::new(vec![step], Duration::ZERO),
                from_cache: true,
            };
            return Ok(self.finish(result, CacheStatus::Hit).await);
        }

        let result = self.resolver.resolve(query).await?;

        let cache_status = match (cache, &result.outcome) {
            (Some(cache), ResolutionOutcome::Answer(addresses)) if !addresses.is_empty() => {
                cache.insert(query, addresses, result.answer_message.clone());
                CacheStatus::Stored
            }
            _ => CacheStatus::Miss,
        };

        Ok(self.finish(result, cache_status).await)
    }

    async fn finish(&self, result: ResolutionResult, cache_status: CacheStatus) -> LookupOutcome {
        debug!(
            query = %result.query,
            steps = result.trace.len(),
            answered = result.is_answer(),
            cache = cache_status.as_str(),
            "Lookup finished"
        );

        // Sinks are best-effort.
        for sink in &self.sinks {
            if let Err(e) = sink.record(&result, cache_status).await {
                warn!(error = %e, query = %result.query, "Failed to record resolution trace");
            }
        }

        LookupOutcome {
            result,
            cache_status,
        }
    }
}
