//! The authoritative in-memory membership store.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

/// One registered service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRecord {
    /// Registration identifier, unique within the registry. Doubles as the
    /// hostname in the rendered zone.
    pub key: String,
    /// Address the registrant was seen from; the probe and A-record target.
    pub address: IpAddr,
    /// Health/service port of the registrant.
    pub port: u16,
    /// Consecutive failed probes. Reset on success or re-registration.
    pub consecutive_failures: u32,
}

/// Concurrency-safe key→record store.
///
/// Cheap to clone; all clones share the same map. Every operation takes the
/// single internal lock, so registrations, snapshots, and the reconciler's
/// apply-and-prune pass never observe a torn state. The lock is never held
/// across I/O: probing works on a [`snapshot`](Registry::snapshot) and
/// feeds verdicts back through
/// [`apply_probe_results`](Registry::apply_probe_results).
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<RwLock<HashMap<String, ServiceRecord>>>,
    error_threshold: u32,
}

impl Registry {
    /// Create an empty registry evicting records at `error_threshold`
    /// consecutive probe failures.
    pub fn new(error_threshold: u32) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            error_threshold,
        }
    }

    /// Insert or replace the record for `key`, resetting its failure count.
    pub fn upsert(&self, key: &str, address: IpAddr, port: u16) {
        let record = ServiceRecord {
            key: key.to_string(),
            address,
            port,
            consecutive_failures: 0,
        };
        let mut inner = self.inner.write();
        let replaced = inner.insert(key.to_string(), record).is_some();
        debug!(key, %address, port, replaced, "registered service");
    }

    /// A consistent point-in-time copy of all records, sorted by key.
    pub fn snapshot(&self) -> Vec<ServiceRecord> {
        let inner = self.inner.read();
        let mut records: Vec<ServiceRecord> = inner.values().cloned().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    /// Apply one probing pass atomically: reset the counter for keys that
    /// succeeded, increment for keys that failed, then evict every record
    /// whose counter reached the threshold. Verdicts for keys no longer
    /// present (removed or evicted concurrently) are ignored.
    ///
    /// This is the only eviction path. Returns the evicted keys, sorted.
    pub fn apply_probe_results(&self, results: &HashMap<String, bool>) -> Vec<String> {
        let mut inner = self.inner.write();

        for (key, healthy) in results {
            if let Some(record) = inner.get_mut(key) {
                if *healthy {
                    record.consecutive_failures = 0;
                } else {
                    record.consecutive_failures += 1;
                }
            }
        }

        let threshold = self.error_threshold;
        let mut evicted: Vec<String> = inner
            .iter()
            .filter(|(_, record)| record.consecutive_failures >= threshold)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &evicted {
            inner.remove(key);
        }
        evicted.sort();
        evicted
    }

    /// Number of currently registered services.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// True when no services are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// The configured eviction threshold.
    pub fn error_threshold(&self) -> u32 {
        self.error_threshold
    }
}
