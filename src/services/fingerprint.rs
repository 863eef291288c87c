//! Content fingerprinting for in-flight duplicate suppression.
//!
//! Fingerprints are deterministic tokens over (normalized text, context key).
//! They guard only the same-process race window between repeated submissions
//! of the same content; they are never used as storage keys, so collisions
//! are tolerable and cryptographic strength is incidental.

use sha2::{Digest, Sha256};

/// Computes a fingerprint token for content plus its origin context.
///
/// Same `(text, context_key)` always yields the same token within and across
/// processes. The context key keeps identical text captured from different
/// origins from suppressing each other.
///
/// # Example
///
/// ```rust
/// use prompthive::fingerprint;
///
/// let a = fingerprint("Explain monads", "https://example.com");
/// let b = fingerprint("  explain   monads ", "https://example.com");
/// assert_eq!(a, b);
/// assert_ne!(a, fingerprint("Explain monads", "https://other.org"));
/// ```
#[must_use]
pub fn fingerprint(text: &str, context_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(normalize(text).as_bytes());
    hasher.update([0u8]);
    hasher.update(context_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Normalizes content for consistent fingerprinting.
///
/// Trims, lowercases, and collapses runs of whitespace to single spaces, so
/// captures differing only in formatting map to the same token.
#[must_use]
pub fn normalize(content: &str) -> String {
    content
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
