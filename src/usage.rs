//! Usage statistics for facade operations.
//!
//! Recording is opt-in: attach a recorder with
//! [`Jsdoc2Md::with_usage`](crate::facade::Jsdoc2Md::with_usage). Each public
//! facade call records its operation name once, even when it is implemented
//! on top of another operation.

use dashmap::DashMap;
use std::collections::BTreeMap;

/// Receives one event per facade call.
pub trait UsageRecorder: Send + Sync {
    fn record(&self, operation: &'static str);
}

/// In-memory call counter, safe to share between tasks.
#[derive(Debug, Default)]
pub struct UsageStats {
    counts: DashMap<&'static str, u64>,
}

impl UsageStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recorded calls to `operation`.
    #[must_use]
    pub fn count(&self, operation: &str) -> u64 {
        self.counts.get(operation).map_or(0, |count| *count)
    }

    /// Calls across every operation.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|entry| *entry.value()).sum()
    }

    /// Sorted copy of every counter.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<&'static str, u64> {
        self.counts.iter().map(|entry| (*entry.key(), *entry.value())).collect()
    }
}

impl UsageRecorder for UsageStats {
    fn record(&self, operation: &'static str) {
        *self.counts.entry(operation).or_insert(0) += 1;
    }
}
