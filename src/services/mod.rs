//! Services for prompt capture, deduplication, and versioning.

mod config;
mod fingerprint;
mod ledger;
mod save;
mod search;
mod similarity;

pub use config::DedupConfig;
pub use fingerprint::{fingerprint, normalize};
pub use ledger::VersionLedger;
pub use save::{CreateRequest, EditRequest, SaveCoordinator, SaveOutcome};
pub use search::search;
pub use similarity::{
    DUPLICATE_THRESHOLD, is_duplicate, is_duplicate_with_threshold, levenshtein, similarity,
};
