use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use ospfx_core::NodeId;

use crate::ecmp::EcmpResult;
use crate::enumerate::EnumerationLimits;
use crate::graph::Fingerprint;

/// Identity of a memoized query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: NodeId,
    pub destination: NodeId,
    /// Fingerprint of the topology snapshot the result was computed on.
    pub fingerprint: Fingerprint,
    /// Results computed under different limits are not interchangeable: a
    /// tighter step budget may fail where a looser one succeeded.
    pub limits: EnumerationLimits,
}

/// Hit and miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// A bounded, concurrent cache of [`EcmpResult`]s keyed by
/// `(source, destination, topology fingerprint, enumeration limits)`.
///
/// Because keys carry the snapshot fingerprint, an edited topology can never
/// read a stale result. [`RouteCache::invalidate`] releases the memory held
/// for a snapshot that is no longer in use.
#[derive(Debug)]
pub struct RouteCache {
    entries: DashMap<CacheKey, EcmpResult>,
    capacity: usize,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl RouteCache {
    /// Create a cache holding at most `capacity` results.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity: capacity.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fetch a cached result, counting the hit or miss.
    pub fn get(&self, key: &CacheKey) -> Option<EcmpResult> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a result, evicting an arbitrary entry when full.
    pub fn insert(&self, key: CacheKey, result: EcmpResult) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                // The iterator guard must be released before removing.
                let victim = self.entries.iter().next().map(|e| e.key().clone());
                match victim {
                    Some(victim) => {
                        self.entries.remove(&victim);
                    }
                    None => break,
                }
            }
        }
        self.entries.insert(key, result);
    }

    /// Drop every result computed on the given snapshot. Returns the number
    /// of entries removed.
    pub fn invalidate(&self, fingerprint: &Fingerprint) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.fingerprint != *fingerprint);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            tracing::debug!(removed, fingerprint = %fingerprint, "route cache invalidated");
        }
        removed
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
