//! Logging initialization.
//!
//! The library itself only emits `tracing` events; embedding applications
//! decide how to subscribe. This helper wires up a sensible default
//! subscriber for binaries and tests that want one.

use tracing_subscriber::EnvFilter;

/// Initializes a formatted `tracing` subscriber.
///
/// The filter is taken from `PROMPTHIVE_LOG` (falling back to `info`).
/// Safe to call more than once; later calls are no-ops.
pub fn init_logging() {
    let filter = EnvFilter::try_from_env("PROMPTHIVE_LOG")
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
