//! Prompt store trait.

use crate::Result;
use crate::models::{HistoryEntry, Prompt, PromptId};

/// Transactional key-value persistence for prompts and their history.
///
/// Backends guarantee per-key atomicity: `put` is an atomic
/// replace-or-insert, and [`PromptStore::commit_versioned`] applies a live
/// record update together with its history archive as one unit. They make no
/// cross-key ordering promises beyond that, which is why the coordinator's
/// duplicate-check-then-commit window remains a documented race across
/// independent processes.
pub trait PromptStore: Send + Sync {
    /// Retrieves a prompt by ID.
    fn get(&self, id: &PromptId) -> Result<Option<Prompt>>;

    /// Stores a prompt, replacing any existing record with the same ID.
    fn put(&self, prompt: &Prompt) -> Result<()>;

    /// Deletes a prompt by ID. Returns `false` if it did not exist.
    ///
    /// History entries are not touched; retention is a policy decision made
    /// above the storage layer.
    fn delete(&self, id: &PromptId) -> Result<bool>;

    /// Lists all live prompts, in unspecified order.
    fn list(&self) -> Result<Vec<Prompt>>;

    /// Appends a history entry.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyArchived`] if an entry for the same
    /// `(prompt_id, version)` pair already exists. The ledger is append-only
    /// and a collision means a retried or racing archival.
    fn put_history(&self, entry: &HistoryEntry) -> Result<()>;

    /// Lists history entries for a prompt, in unspecified order.
    ///
    /// Callers that need version ordering sort; the ledger service always
    /// returns descending by version.
    fn list_history(&self, prompt_id: &PromptId) -> Result<Vec<HistoryEntry>>;

    /// Applies a live-record update and its pre-mutation archive atomically.
    ///
    /// Either both writes take effect or neither does; no reader may observe
    /// the history written without the updated record or vice versa.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AlreadyArchived`] under the same conditions
    /// as [`PromptStore::put_history`], with nothing applied.
    fn commit_versioned(&self, prompt: &Prompt, archived: &HistoryEntry) -> Result<()>;

    /// Checks whether a prompt exists.
    fn exists(&self, id: &PromptId) -> Result<bool> {
        Ok(self.get(id)?.is_some())
    }

    /// Returns the total count of live prompts.
    fn count(&self) -> Result<usize> {
        Ok(self.list()?.len())
    }
}
