//! Error types for memocache.
//!
//! Retrieval never produces these: a failing computation hands its own error
//! straight back to the caller. `CacheError` covers the ambient concerns
//! around the cache, such as loading and validating configuration.

use thiserror::Error;

/// Result type alias using `CacheError`.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Error type for configuration and I/O around the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration value out of range or inconsistent.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CacheError {
    /// Returns true if this error came from reading or parsing input.
    pub fn is_input_error(&self) -> bool {
        matches!(self, CacheError::JsonError(_) | CacheError::IoError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::ConfigError("initial_capacity too large".into());
        assert_eq!(
            err.to_string(),
            "Configuration error: initial_capacity too large"
        );
    }

    #[test]
    fn test_error_classification() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(CacheError::from(io).is_input_error());
        assert!(!CacheError::ConfigError("bad".into()).is_input_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("invalid");
        let cache_result: Result<serde_json::Value> = json_result.map_err(CacheError::from);
        assert!(matches!(cache_result, Err(CacheError::JsonError(_))));
    }
}
