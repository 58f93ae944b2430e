//! In-memory memoization cache with lazy TTL expiration.

use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::ReentrantMutex;
use serde::Serialize;
use tracing::{debug, trace};

use memocache_core::{Clock, SystemClock};

use crate::config::CacheConfig;

/// Stored result with its absolute expiration.
struct CacheEntry<V> {
    value: V,
    /// `None` when `written_at + ttl` is past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    fn new(value: V, written_at: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: written_at.checked_add(ttl),
        }
    }

    fn is_fresh(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }
}

/// Memoizing cache keyed by `K`, storing computed `V`s with a per-entry TTL.
///
/// # Locking
///
/// A single mutex guards the whole map, and it is held across the
/// caller's computation on a miss. That makes check-then-compute-then-write
/// atomic: concurrent callers on a cold key see exactly one computation.
/// The cost is throughput. While one computation runs, every other thread
/// blocks, including hits on unrelated keys.
///
/// The mutex is reentrant. A computation may call back into the same cache
/// from its own thread (recursive memoization), since the map itself is not
/// borrowed while the computation runs.
///
/// # Expiration
///
/// Entries are checked against the clock on access only. Stale entries stay
/// in the map until the same key is requested again (and recomputed) or
/// until [`invalidate`](TtlCache::invalidate) / [`clear`](TtlCache::clear).
pub struct TtlCache<K, V, C = SystemClock> {
    entries: ReentrantMutex<RefCell<HashMap<K, CacheEntry<V>>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    clock: C,
    config: CacheConfig,
}

impl<K, V> TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Creates an empty cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Creates an empty cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Creates an empty cache reading time from `clock`.
    pub fn with_clock(config: CacheConfig, clock: C) -> Self {
        Self {
            entries: ReentrantMutex::new(RefCell::new(HashMap::with_capacity(
                config.initial_capacity,
            ))),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            clock,
            config,
        }
    }

    /// Returns the fresh value for `key`, or runs `compute` and stores its
    /// result for `ttl`.
    ///
    /// `compute` runs at most once per call, and only on a miss. A `ttl` of
    /// zero stores an entry that is already stale on the next access.
    pub fn get_or_compute<F>(&self, key: K, compute: F, ttl: Duration) -> V
    where
        F: FnOnce(&K) -> V,
    {
        match self.try_get_or_compute(key, |k| Ok::<V, Infallible>(compute(k)), ttl) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_compute`](Self::get_or_compute), using the configured
    /// default TTL.
    pub fn get_or_compute_default<F>(&self, key: K, compute: F) -> V
    where
        F: FnOnce(&K) -> V,
    {
        self.get_or_compute(key, compute, self.config.default_ttl())
    }

    /// Fallible form of [`get_or_compute`](Self::get_or_compute).
    ///
    /// An error from `compute` is returned as-is and nothing is stored, so a
    /// previous stale entry for `key` stays untouched and the next call
    /// retries. The lock is released on error and on panic.
    pub fn try_get_or_compute<F, E>(&self, key: K, compute: F, ttl: Duration) -> Result<V, E>
    where
        F: FnOnce(&K) -> Result<V, E>,
    {
        let guard = self.entries.lock();

        {
            let entries = guard.borrow();
            if let Some(entry) = entries.get(&key) {
                if entry.is_fresh(self.clock.now()) {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!("cache hit");
                    return Ok(entry.value.clone());
                }
            }

            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(
                ttl = ?ttl,
                stale = entries.contains_key(&key),
                "cache miss, computing"
            );
        }

        // Map borrow released, lock still held: nested calls from `compute`
        // on this thread re-enter.
        let value = match compute(&key) {
            Ok(value) => value,
            Err(err) => {
                debug!("computation failed, nothing stored");
                return Err(err);
            }
        };

        let written_at = self.clock.now();
        guard
            .borrow_mut()
            .insert(key, CacheEntry::new(value.clone(), written_at, ttl));
        Ok(value)
    }

    /// Removes the entry for `key`. Returns true if one was stored.
    pub fn invalidate<Q>(&self, key: &Q) -> bool
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().borrow_mut().remove(key).is_some()
    }

    /// Removes every entry. Hit and miss counters are kept.
    pub fn clear(&self) {
        self.entries.lock().borrow_mut().clear();
    }

    /// Returns the number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.lock().borrow().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().borrow().is_empty()
    }

    /// Returns the configuration this cache was built with.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let guard = self.entries.lock();
        let entries = guard.borrow();
        let now = self.clock.now();
        let total = entries.len();
        let fresh = entries.values().filter(|e| e.is_fresh(now)).count();

        CacheStats {
            total_entries: total,
            fresh_entries: fresh,
            stale_entries: total - fresh,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

impl<K, V> Default for TtlCache<K, V, SystemClock>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Stored entries (fresh and stale)
    pub total_entries: usize,
    /// Entries that would be returned without recomputing
    pub fresh_entries: usize,
    /// Entries waiting to be recomputed on next access
    pub stale_entries: usize,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that ran the computation
    pub misses: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache, 0.0 when none were made.
    pub fn hit_rate(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64
        }
    }
}
