//! # PromptHive
//!
//! A versioned, deduplicating store for captured prompt snippets.
//!
//! PromptHive keeps user-selected text snippets ("prompts") with full edit
//! history. Near-identical captures are suppressed with a fuzzy-duplicate
//! check, and every committed mutation archives the prior state so no
//! version is ever lost or reused.
//!
//! ## Architecture
//!
//! - **Similarity engine**: Levenshtein-ratio comparison for fuzzy duplicates
//! - **Fingerprinting**: normalized SHA-256 content tokens for in-flight dedup
//! - **Version ledger**: append-only history, strictly increasing versions
//! - **Save coordinator**: the sole writer path; serializes concurrent save
//!   attempts and commits edit + archive as one atomic store operation
//! - **Pluggable stores**: in-memory and filesystem backends behind the
//!   [`PromptStore`] trait
//!
//! ## Example
//!
//! ```rust,ignore
//! use prompthive::{SaveCoordinator, CreateRequest, MemoryStore, SaveOutcome};
//! use std::sync::Arc;
//!
//! let coordinator = SaveCoordinator::new(Arc::new(MemoryStore::new()));
//! let outcome = coordinator.create(CreateRequest {
//!     text: "Explain quantum entanglement in simple terms".to_string(),
//!     ..Default::default()
//! })?;
//! if let SaveOutcome::Created(prompt) = outcome {
//!     println!("saved {} at version {}", prompt.id, prompt.version);
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;

// Re-exports for convenience
pub use models::{Category, HistoryEntry, Prompt, PromptId, StoreStats};
pub use services::{
    CreateRequest, DedupConfig, EditRequest, SaveCoordinator, SaveOutcome, VersionLedger,
    fingerprint, is_duplicate, levenshtein, similarity,
};
pub use storage::{FilesystemStore, MemoryStore, PromptStore};

/// Error type for prompt store operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait implementations.
///
/// Duplicate detection is deliberately *not* represented here: a duplicate
/// submission is information for the caller, not a failure, and is reported
/// through [`services::SaveOutcome`] instead.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    ///
    /// Raised when:
    /// - Prompt text is empty after trimming
    /// - A record ID is not usable as a storage key
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced prompt or history entry does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A history entry for this `(prompt, version)` pair already exists.
    ///
    /// The ledger is append-only; double-archival of the same version would
    /// mean a retried or racing operation. This should not occur in correct
    /// operation and aborts the save that triggered it.
    #[error("history entry for prompt '{prompt_id}' version {version} already archived")]
    AlreadyArchived {
        /// The prompt whose history was double-archived.
        prompt_id: String,
        /// The version the colliding entry carried.
        version: u32,
    },

    /// The underlying store failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - Serialization of a record fails
    /// - A backend's transactional pair cannot be applied
    #[error("persistence operation '{operation}' failed: {cause}")]
    PersistenceFailed {
        /// The store operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Builds a [`Error::PersistenceFailed`] from an operation name and cause.
    pub fn persistence(operation: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        Self::PersistenceFailed {
            operation: operation.into(),
            cause: cause.to_string(),
        }
    }
}

/// Result type alias for prompt store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Returns the current Unix timestamp in seconds.
///
/// Centralized to avoid duplicate implementations across the codebase.
/// Falls back to 0 if the system clock is before the Unix epoch.
///
/// # Examples
///
/// ```rust
/// use prompthive::current_timestamp;
///
/// let ts = current_timestamp();
/// assert!(ts > 0);
/// ```
#[must_use]
pub fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Returns the current Unix timestamp in milliseconds.
///
/// History entry identifiers embed this for disambiguation; everything else
/// uses second granularity via [`current_timestamp`].
#[must_use]
pub fn current_timestamp_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("text cannot be empty".to_string());
        assert_eq!(err.to_string(), "invalid input: text cannot be empty");

        let err = Error::NotFound("prompt 'abc'".to_string());
        assert_eq!(err.to_string(), "not found: prompt 'abc'");

        let err = Error::AlreadyArchived {
            prompt_id: "abc".to_string(),
            version: 3,
        };
        assert_eq!(
            err.to_string(),
            "history entry for prompt 'abc' version 3 already archived"
        );

        let err = Error::persistence("put", "disk full");
        assert_eq!(
            err.to_string(),
            "persistence operation 'put' failed: disk full"
        );
    }

    #[test]
    fn test_timestamps_monotonic_enough() {
        let secs = current_timestamp();
        let millis = current_timestamp_millis();
        assert!(millis / 1000 >= secs);
    }
}
