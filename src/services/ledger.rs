//! Version ledger: append-only history of prior prompt states.

use crate::Result;
use crate::models::{HistoryEntry, Prompt, PromptId};
use crate::storage::PromptStore;
use std::sync::Arc;

/// Manages the append-only history of a prompt's prior states.
///
/// One entry is written per committed mutation, carrying the pre-mutation
/// version. Entries are immutable; for a given prompt the ledger forms a
/// strictly increasing, gap-free version sequence from 1 up to the live
/// record's version minus one. The store's `(prompt_id, version)` uniqueness
/// check defends that invariant against double-archival from retried
/// operations.
pub struct VersionLedger<S: PromptStore> {
    store: Arc<S>,
}

impl<S: PromptStore> VersionLedger<S> {
    /// Creates a ledger over the given store.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Archives the given live record as a history entry.
    ///
    /// Standalone write; the save coordinator instead pairs the archive with
    /// the updated record via the store's transactional commit, and only uses
    /// this path when no live-record write accompanies the archive.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyArchived`] if this version was already
    /// archived.
    pub fn archive(&self, snapshot: &Prompt) -> Result<HistoryEntry> {
        let entry = HistoryEntry::snapshot_of(snapshot);
        self.store.put_history(&entry)?;
        tracing::debug!(
            prompt_id = %entry.prompt_id,
            version = entry.version,
            "Archived prompt state"
        );
        Ok(entry)
    }

    /// Lists history entries for a prompt, descending by version.
    ///
    /// Recomputed fresh on each call; nothing is cached.
    pub fn list(&self, prompt_id: &PromptId) -> Result<Vec<HistoryEntry>> {
        let mut entries = self.store.list_history(prompt_id)?;
        entries.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(entries)
    }

    /// Finds the archived entry for a specific version, if present.
    pub fn find(&self, prompt_id: &PromptId, version: u32) -> Result<Option<HistoryEntry>> {
        Ok(self
            .store
            .list_history(prompt_id)?
            .into_iter()
            .find(|e| e.version == version))
    }

    /// Computes the next version number for a live record.
    #[must_use]
    pub const fn next_version(current: &Prompt) -> u32 {
        current.version + 1
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::models::Category;
    use crate::storage::MemoryStore;

    fn prompt(version: u32) -> Prompt {
        Prompt {
            id: PromptId::new("p1"),
            title: format!("title v{version}"),
            text: format!("text v{version}"),
            tags: vec![],
            category: Category::General,
            uses: 0,
            version,
            created_at: 100,
            updated_at: 100,
            source: None,
        }
    }

    #[test]
    fn test_archive_then_list_descending() {
        let store = Arc::new(MemoryStore::new());
        let ledger = VersionLedger::new(store);

        ledger.archive(&prompt(1)).unwrap();
        ledger.archive(&prompt(2)).unwrap();
        ledger.archive(&prompt(3)).unwrap();

        let versions: Vec<u32> = ledger
            .list(&PromptId::new("p1"))
            .unwrap()
            .iter()
            .map(|e| e.version)
            .collect();
        assert_eq!(versions, vec![3, 2, 1]);
    }

    #[test]
    fn test_double_archive_fails() {
        let store = Arc::new(MemoryStore::new());
        let ledger = VersionLedger::new(store);

        ledger.archive(&prompt(1)).unwrap();
        let err = ledger.archive(&prompt(1)).unwrap_err();
        assert!(matches!(err, Error::AlreadyArchived { version: 1, .. }));
    }

    #[test]
    fn test_find_specific_version() {
        let store = Arc::new(MemoryStore::new());
        let ledger = VersionLedger::new(store);

        ledger.archive(&prompt(1)).unwrap();
        ledger.archive(&prompt(2)).unwrap();

        let found = ledger.find(&PromptId::new("p1"), 1).unwrap().unwrap();
        assert_eq!(found.text, "text v1");
        assert!(ledger.find(&PromptId::new("p1"), 9).unwrap().is_none());
    }

    #[test]
    fn test_next_version() {
        assert_eq!(VersionLedger::<MemoryStore>::next_version(&prompt(1)), 2);
        assert_eq!(VersionLedger::<MemoryStore>::next_version(&prompt(7)), 8);
    }
}
