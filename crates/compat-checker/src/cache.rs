//! Process-local result cache.

use compat_core_types::{CheckOutcome, Imei};
use dashmap::DashMap;

/// Concurrent map from identifier to a previously computed outcome.
///
/// Deliberately unbounded with no eviction or expiry: one automation
/// run is expensive and its definitive outcome does not change within
/// a process lifetime. Concurrent checks for the same identifier may
/// both write; the later write wins, which is accepted since cacheable
/// outcomes are idempotent. Callers needing bounding wrap this at
/// their own boundary.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<Imei, CheckOutcome>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, imei: &Imei) -> Option<CheckOutcome> {
        self.entries.get(imei).map(|entry| entry.value().clone())
    }

    pub fn put(&self, imei: Imei, outcome: CheckOutcome) {
        self.entries.insert(imei, outcome);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
