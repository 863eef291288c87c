//! In-memory prompt store.
//!
//! Reference backend used in tests and as the baseline for transactional
//! semantics: every operation runs under one lock, so the paired
//! history-plus-record commit is trivially atomic.

use crate::models::{HistoryEntry, Prompt, PromptId};
use crate::storage::traits::PromptStore;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    prompts: HashMap<PromptId, Prompt>,
    history: Vec<HistoryEntry>,
}

impl Inner {
    fn has_archive(&self, prompt_id: &PromptId, version: u32) -> bool {
        self.history
            .iter()
            .any(|e| &e.prompt_id == prompt_id && e.version == version)
    }
}

/// In-memory prompt store backed by a single `RwLock`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PromptStore for MemoryStore {
    fn get(&self, id: &PromptId) -> Result<Option<Prompt>> {
        Ok(self.read().prompts.get(id).cloned())
    }

    fn put(&self, prompt: &Prompt) -> Result<()> {
        self.write()
            .prompts
            .insert(prompt.id.clone(), prompt.clone());
        Ok(())
    }

    fn delete(&self, id: &PromptId) -> Result<bool> {
        Ok(self.write().prompts.remove(id).is_some())
    }

    fn list(&self) -> Result<Vec<Prompt>> {
        Ok(self.read().prompts.values().cloned().collect())
    }

    fn put_history(&self, entry: &HistoryEntry) -> Result<()> {
        let mut inner = self.write();
        if inner.has_archive(&entry.prompt_id, entry.version) {
            return Err(Error::AlreadyArchived {
                prompt_id: entry.prompt_id.to_string(),
                version: entry.version,
            });
        }
        inner.history.push(entry.clone());
        Ok(())
    }

    fn list_history(&self, prompt_id: &PromptId) -> Result<Vec<HistoryEntry>> {
        Ok(self
            .read()
            .history
            .iter()
            .filter(|e| &e.prompt_id == prompt_id)
            .cloned()
            .collect())
    }

    fn commit_versioned(&self, prompt: &Prompt, archived: &HistoryEntry) -> Result<()> {
        let mut inner = self.write();
        if inner.has_archive(&archived.prompt_id, archived.version) {
            return Err(Error::AlreadyArchived {
                prompt_id: archived.prompt_id.to_string(),
                version: archived.version,
            });
        }
        inner.history.push(archived.clone());
        inner.prompts.insert(prompt.id.clone(), prompt.clone());
        Ok(())
    }
}
