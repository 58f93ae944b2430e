//! # Memocache Core
//!
//! Foundational pieces shared by the memocache crates:
//!
//! - **Errors**: the ambient error type for configuration and I/O
//! - **Constants**: default TTL and capacity limits
//! - **Traits**: the [`Clock`] time source the cache reads "now" from
//!
//! ## Example
//!
//! ```rust
//! use memocache_core::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let earlier = clock.now();
//! assert!(clock.now() >= earlier);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{CacheError, Result};
pub use traits::*;
