use bytes::Bytes;
use dashmap::DashMap;
use iterdns_domain::{DnsQuery, RecordType};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CachedAnswer {
    pub addresses: Arc<[IpAddr]>,
    pub message: Option<Bytes>,
}

/// Caller-owned answer cache.
///
/// Entries never expire; the cache lives exactly as long as whoever
/// constructed it and is handed to each lookup explicitly.
#[derive(Debug, Default)]
pub struct AnswerCache {
    entries: DashMap<(String, RecordType), CachedAnswer>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AnswerCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(query: &DnsQuery) -> (String, RecordType) {
        (
            query.display_domain().to_ascii_lowercase(),
            query.record_type,
        )
    }

    pub fn get(&self, query: &DnsQuery) -> Option<CachedAnswer> {
        match self.entries.get(&Self::key(query)) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %query.domain, record_type = %query.record_type, "Cache HIT");
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!(domain = %query.domain, record_type = %query.record_type, "Cache MISS");
                None
            }
        }
    }

    pub fn insert(&self, query: &DnsQuery, addresses: &[IpAddr], message: Option<Bytes>) {
        self.entries.insert(
            Self::key(query),
            CachedAnswer {
                addresses: Arc::from(addresses),
                message,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}
