//! Thread-safe memoization cache with per-entry TTL.
//!
//! [`TtlCache::get_or_compute`] returns a stored result while it is fresh and
//! otherwise runs the caller's computation, stores the result with an
//! expiration instant, and returns it. Staleness is only discovered on access.

mod cache;
mod clock;
mod config;

pub use cache::{CacheStats, TtlCache};
pub use clock::MockClock;
pub use config::CacheConfig;
pub use memocache_core::{CacheError, Clock, SystemClock};
