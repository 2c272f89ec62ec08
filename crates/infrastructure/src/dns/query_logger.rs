use async_trait::async_trait;
use chrono::{DateTime, Local};
use iterdns_application::ports::{CacheStatus, TraceSink};
use iterdns_domain::{DomainError, ResolutionResult, Stage, StepRecord};
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Resolution mode tag written in every step line.
pub const MODE_TAG: &str = "Iterative";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders traces in the delimited log schema consumed by offline analysis:
///
/// ```text
/// <timestamp> | <domain> | Iterative | <server> | Step: <stage> | Response: <summary> | RTT: <ms or -> ms | <cache-status>
/// ```
///
/// followed by one `TOTAL` line per top-level query.
pub struct TraceLineFormatter;

impl TraceLineFormatter {
    pub fn timestamp(at: &DateTime<Local>) -> String {
        at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Field separators inside free text would shift every later column.
    fn sanitize(text: &str) -> String {
        text.replace('|', "/").replace(['\n', '\r'], " ")
    }

    fn summary(step: &StepRecord) -> String {
        Self::sanitize(&step.response_summary.join("; "))
    }

    fn rtt(step: &StepRecord) -> String {
        match step.rtt_ms() {
            Some(ms) => format!("{:.2}", ms),
            None => "-".to_string(),
        }
    }

    pub fn step_line(domain: &str, step: &StepRecord, cache_status: CacheStatus) -> String {
        let ts = Self::timestamp(&step.timestamp);

        if step.stage == Stage::Cache {
            return format!(
                "{} | {} | {} | {} | Step: {} | Response: {} | RTT: 0 ms | Total: 0 ms | {}",
                ts,
                domain,
                MODE_TAG,
                step.server,
                step.stage,
                Self::summary(step),
                CacheStatus::Hit.as_str()
            );
        }

        // Network steps were all taken because the cache had nothing.
        let status = match cache_status {
            CacheStatus::Hit => CacheStatus::Hit,
            CacheStatus::Stored | CacheStatus::Miss => CacheStatus::Miss,
        };

        format!(
            "{} | {} | {} | {} | Step: {} | Response: {} | RTT: {} ms | {}",
            ts,
            domain,
            MODE_TAG,
            step.server,
            step.stage,
            Self::summary(step),
            Self::rtt(step),
            status.as_str()
        )
    }

    /// Closing line of a query; cache hits carry their total inline instead.
    pub fn total_line(
        result: &ResolutionResult,
        cache_status: CacheStatus,
        at: &DateTime<Local>,
    ) -> Option<String> {
        let suffix = match cache_status {
            CacheStatus::Hit => return None,
            _ if !result.has_addresses() => "No Response",
            CacheStatus::Stored => CacheStatus::Stored.as_str(),
            CacheStatus::Miss => "Answered",
        };

        Some(format!(
            "{} | {} | TOTAL | TotalTime: {:.2} ms | {}",
            Self::timestamp(at),
            result.query.display_domain(),
            result.elapsed().as_secs_f64() * 1000.0,
            suffix
        ))
    }

    pub fn lines(result: &ResolutionResult, cache_status: CacheStatus) -> Vec<String> {
        let domain = result.query.display_domain();
        let mut lines: Vec<String> = result
            .trace
            .iter()
            .map(|step| Self::step_line(domain, step, cache_status))
            .collect();

        if let Some(total) = Self::total_line(result, cache_status, &Local::now()) {
            lines.push(total);
        }
        lines
    }

    pub fn run_header(at: &DateTime<Local>) -> String {
        format!("===== New Run at {} =====", Self::timestamp(at))
    }
}

/// Appends trace lines to a log file.
///
/// Writes are serialized so lines of concurrent lookups never interleave.
pub struct FileTraceSink {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileTraceSink {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marks the start of a new run in the log.
    pub async fn write_run_header(&self) -> Result<(), DomainError> {
        let header = format!("\n{}\n", TraceLineFormatter::run_header(&Local::now()));
        self.append(&header).await
    }

    async fn append(&self, text: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| {
                DomainError::TraceSink(format!("Failed to open {}: {}", self.path.display(), e))
            })?;

        file.write_all(text.as_bytes()).await.map_err(|e| {
            DomainError::TraceSink(format!("Failed to write {}: {}", self.path.display(), e))
        })?;
        file.flush()
            .await
            .map_err(|e| DomainError::TraceSink(format!("Failed to flush: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl TraceSink for FileTraceSink {
    async fn record(
        &self,
        result: &ResolutionResult,
        cache_status: CacheStatus,
    ) -> Result<(), DomainError> {
        let lines = TraceLineFormatter::lines(result, cache_status);
        let mut text = lines.join("\n");
        text.push('\n');

        self.append(&text).await?;

        debug!(
            path = %self.path.display(),
            lines = lines.len(),
            "Trace written"
        );
        Ok(())
    }
}

/// Human-readable step breakdown emitted through `tracing`.
#[derive(Debug, Default)]
pub struct ConsoleTraceSink;

#[async_trait]
impl TraceSink for ConsoleTraceSink {
    async fn record(
        &self,
        result: &ResolutionResult,
        cache_status: CacheStatus,
    ) -> Result<(), DomainError> {
        info!("Query for {} ({})", result.query, cache_status.as_str());

        for step in &result.trace {
            let rtt = step
                .rtt_ms()
                .map(|ms| format!("{:.2}", ms))
                .unwrap_or_else(|| "-".to_string());
            info!(
                "  Step {} | Server: {} | Stage: {} | RTT: {} ms",
                step.step_index, step.server, step.stage, rtt
            );
            for line in &step.response_summary {
                info!("      {}", line);
            }
        }

        info!(
            "  Total resolution time: {:.2} ms",
            result.elapsed().as_secs_f64() * 1000.0
        );
        if !result.is_answer() {
            info!("  Resolution failed.");
        }

        Ok(())
    }
}
