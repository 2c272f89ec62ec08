use anyhow::Context;
use iterdns_application::services::AnswerCache;
use iterdns_application::use_cases::ResolveDomainUseCase;
use iterdns_domain::{DnsQuery, RecordType};
use std::path::Path;
use std::time::Duration;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// Tally of one batch run, written as one CSV line.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSummary {
    pub label: String,
    pub total: usize,
    pub success: usize,
    pub fail: usize,
    total_latency_ms: f64,
}

impl LookupSummary {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            total: 0,
            success: 0,
            fail: 0,
            total_latency_ms: 0.0,
        }
    }

    pub fn record_success(&mut self, latency: Duration) {
        self.total += 1;
        self.success += 1;
        self.total_latency_ms += latency.as_secs_f64() * 1000.0;
    }

    pub fn record_failure(&mut self) {
        self.total += 1;
        self.fail += 1;
    }

    /// Mean latency of successful lookups only.
    pub fn average_ms(&self) -> f64 {
        if self.success == 0 {
            0.0
        } else {
            self.total_latency_ms / self.success as f64
        }
    }

    pub fn csv_line(&self) -> String {
        format!(
            "{},{},{},{},{:.2}",
            self.label,
            self.total,
            self.success,
            self.fail,
            self.average_ms()
        )
    }
}

/// Non-empty trimmed lines of a queries file.
pub fn read_queries(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Query file not found: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Resolves `domains` one after another, pausing between lookups.
///
/// The cache lives for the whole batch, so repeated names are answered
/// without touching the network.
pub async fn run_lookup(
    domains: &[String],
    record_type: RecordType,
    label: &str,
    pause: Duration,
    use_case: &ResolveDomainUseCase,
) -> LookupSummary {
    let cache = AnswerCache::new();
    let mut summary = LookupSummary::new(label);
    let total = domains.len();

    info!("Running {} DNS queries", total);

    for (i, domain) in domains.iter().enumerate() {
        let query = DnsQuery::new(domain.as_str(), record_type);

        match use_case.execute(&query, Some(&cache)).await {
            Ok(outcome) if outcome.result.has_addresses() => {
                let latency = outcome.result.elapsed();
                let addresses: Vec<String> = outcome
                    .result
                    .addresses()
                    .iter()
                    .map(|ip| ip.to_string())
                    .collect();
                info!(
                    "[{}/{}] {} -> {} ({:.1} ms, {})",
                    i + 1,
                    total,
                    domain,
                    addresses.join(", "),
                    latency.as_secs_f64() * 1000.0,
                    outcome.cache_status.as_str()
                );
                summary.record_success(latency);
            }
            Ok(_) => {
                info!("[{}/{}] {} -> FAIL", i + 1, total, domain);
                summary.record_failure();
            }
            Err(e) => {
                warn!(domain = %domain, error = %e, "Lookup error");
                summary.record_failure();
            }
        }

        if i + 1 < total && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    info!(
        hits = cache.hits(),
        misses = cache.misses(),
        cached = cache.len(),
        "Answer cache statistics"
    );

    summary
}

pub async fn append_summary(path: &Path, summary: &LookupSummary) -> anyhow::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;

    file.write_all(format!("{}\n", summary.csv_line()).as_bytes())
        .await?;
    file.flush().await?;

    info!("Results saved to {}", path.display());
    Ok(())
}
