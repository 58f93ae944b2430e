//! Default values and limits for memocache.

// ═══════════════════════════════════════════════════════════════════════════════
// EXPIRATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Default time-to-live in milliseconds, used when a caller does not pass one.
pub const DEFAULT_TTL_MS: u64 = 5_000;

// ═══════════════════════════════════════════════════════════════════════════════
// CAPACITY
// ═══════════════════════════════════════════════════════════════════════════════

/// Number of slots preallocated for the key map by default.
///
/// This is a capacity hint only; the cache is never bounded.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Largest preallocation a configuration may request.
pub const MAX_INITIAL_CAPACITY: usize = 1 << 20;
