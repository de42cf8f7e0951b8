//! Error types for the cache engine
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine.
///
/// Absent keys are not errors: read operations return `Option`/counts
/// instead. The only fallible mutation is an insert into a bounded store
/// that has no eviction policy.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The store is bounded without LRU eviction and an insert would
    /// exceed the configured maximum key count. Carries the attempted
    /// key for diagnostics.
    #[error("Cache full: cannot insert key '{key}'")]
    CacheFull {
        /// The key whose insertion was rejected
        key: String,
    },
}

// == Result Type Alias ==
/// Convenience Result type for the cache engine.
pub type Result<T> = std::result::Result<T, CacheError>;
