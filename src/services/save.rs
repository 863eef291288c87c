//! Save coordinator: the sole writer path into the prompt store.
//!
//! Serializes concurrent save attempts per content fingerprint, runs the
//! fuzzy-duplicate scan for new captures, and commits edits and restores
//! together with their history archive as one atomic store operation.
//!
//! # Concurrency
//!
//! The in-flight fingerprint set is process-local and advisory: it suppresses
//! repeated submissions of the same content from this process's surfaces, but
//! provides no cross-process mutual exclusion. Between the duplicate scan and
//! the commit another process could persist a conflicting record; that gap is
//! an accepted limitation, not a guarantee, and cross-process version safety
//! rests entirely on the store's per-key transactional atomicity.

use crate::models::{Category, HistoryEntry, Prompt, PromptId, StoreStats};
use crate::services::config::DedupConfig;
use crate::services::fingerprint::fingerprint;
use crate::services::ledger::VersionLedger;
use crate::services::similarity::is_duplicate_with_threshold;
use crate::storage::PromptStore;
use crate::{Error, Result, current_timestamp};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Maximum length of a derived title before truncation.
const MAX_TITLE_LEN: usize = 50;

/// A new capture submitted to the coordinator.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    /// Display title. Derived from `source` when absent.
    pub title: Option<String>,
    /// The snippet text. Must be non-empty after trimming.
    pub text: String,
    /// Tags in display order.
    pub tags: Vec<String>,
    /// Origin identifier (e.g. page URL); doubles as the fingerprint
    /// context key.
    pub source: Option<String>,
}

/// Replacement content for an existing prompt.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// New title.
    pub title: String,
    /// New text. Must be non-empty after trimming.
    pub text: String,
    /// New tags.
    pub tags: Vec<String>,
}

/// Outcome of a create submission.
///
/// Duplicate detection is information, not an error: callers surface the
/// existing record (`DuplicateContent`) or treat the submission as already
/// handled (`DuplicateInFlight`).
#[derive(Debug, Clone)]
pub enum SaveOutcome {
    /// A new prompt was committed.
    Created(Prompt),
    /// A sufficiently similar prompt already exists; nothing was written.
    DuplicateContent(Prompt),
    /// The same content is already mid-commit in this process; nothing was
    /// written.
    DuplicateInFlight,
}

/// Removes the registered fingerprint on every exit path, success or failure,
/// so a failed save never permanently blocks retries of the same content.
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<String>>,
    token: String,
}

impl<'a> InFlightGuard<'a> {
    /// Registers `token`, or returns `None` if it is already in flight.
    fn acquire(set: &'a Mutex<HashSet<String>>, token: String) -> Option<Self> {
        let mut in_flight = set.lock().unwrap_or_else(PoisonError::into_inner);
        if !in_flight.insert(token.clone()) {
            return None;
        }
        drop(in_flight);
        Some(Self { set, token })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.token);
    }
}

/// Coordinates all writes against the prompt store.
///
/// Owns its in-flight set explicitly; there is no ambient global state, and
/// a second coordinator instance shares no suppression guarantees with this
/// one. Readers may go to the store directly, but every mutation flows
/// through here.
pub struct SaveCoordinator<S: PromptStore> {
    store: Arc<S>,
    ledger: VersionLedger<S>,
    config: DedupConfig,
    in_flight: Mutex<HashSet<String>>,
}

impl<S: PromptStore> SaveCoordinator<S> {
    /// Creates a coordinator with the default duplicate-detection config.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, DedupConfig::default())
    }

    /// Creates a coordinator with an explicit config.
    #[must_use]
    pub fn with_config(store: Arc<S>, config: DedupConfig) -> Self {
        let ledger = VersionLedger::new(Arc::clone(&store));
        Self {
            store,
            ledger,
            config,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    /// Submits a new capture.
    ///
    /// Fingerprints the content, suppresses same-content submissions already
    /// mid-commit, scans persisted prompts for fuzzy duplicates, and commits
    /// a fresh version-1 record if clear.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the text is empty after trimming
    /// - [`Error::PersistenceFailed`] if the store rejects the write
    pub fn create(&self, request: CreateRequest) -> Result<SaveOutcome> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("prompt text cannot be empty".to_string()));
        }

        let context_key = request.source.as_deref().unwrap_or_default();
        let fp = fingerprint(text, context_key);

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, fp.clone()) else {
            tracing::debug!(fingerprint = %fp, "Save already in progress, ignoring");
            return Ok(SaveOutcome::DuplicateInFlight);
        };

        if let Some(existing) = self.find_duplicate(text)? {
            tracing::info!(
                existing_id = %existing.id,
                "Similar prompt already exists, not creating"
            );
            return Ok(SaveOutcome::DuplicateContent(existing));
        }

        let now = current_timestamp();
        let prompt = Prompt {
            id: PromptId::generate(),
            title: request
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| derive_title(request.source.as_deref())),
            text: text.to_string(),
            tags: Prompt::normalized_tags(request.tags),
            category: Category::detect(text),
            uses: 0,
            version: 1,
            created_at: now,
            updated_at: now,
            source: request.source,
        };

        self.store.put(&prompt)?;
        tracing::info!(prompt_id = %prompt.id, category = %prompt.category, "Prompt created");
        Ok(SaveOutcome::Created(prompt))
    }

    /// Replaces a prompt's content, archiving the prior state.
    ///
    /// The archive write and the updated-record write are applied as one
    /// atomic unit; the live record's version increases by exactly one.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidInput`] if the new text is empty after trimming
    /// - [`Error::NotFound`] if no prompt has this ID
    /// - [`Error::AlreadyArchived`] if this version was already archived
    /// - [`Error::PersistenceFailed`] if the store rejects the pair
    pub fn edit(&self, id: &PromptId, request: EditRequest) -> Result<Prompt> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("prompt text cannot be empty".to_string()));
        }

        let current = self.load(id)?;

        // Scope the fingerprint to this prompt so a concurrent create of the
        // same text is not suppressed by an edit.
        let fp = fingerprint(text, id.as_str());
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, fp) else {
            // Same edit already mid-commit: treat as handled (no-op success).
            tracing::debug!(prompt_id = %id, "Identical edit already in progress");
            return Ok(current);
        };

        let archived = HistoryEntry::snapshot_of(&current);
        let updated = Prompt {
            title: request.title,
            text: text.to_string(),
            tags: Prompt::normalized_tags(request.tags),
            category: Category::detect(text),
            version: VersionLedger::<S>::next_version(&current),
            updated_at: current_timestamp(),
            ..current
        };

        self.store.commit_versioned(&updated, &archived)?;
        tracing::info!(prompt_id = %id, version = updated.version, "Prompt edited");
        Ok(updated)
    }

    /// Restores a prompt to the content of an archived version.
    ///
    /// The currently-live state is archived first, then the restored content
    /// is committed as a brand-new version. Version numbers only ever grow;
    /// restoring never reuses the old one.
    ///
    /// # Errors
    ///
    /// - [`Error::NotFound`] if the prompt or the history version is absent
    /// - [`Error::AlreadyArchived`] / [`Error::PersistenceFailed`] as for
    ///   [`SaveCoordinator::edit`]
    pub fn restore(&self, id: &PromptId, history_version: u32) -> Result<Prompt> {
        let current = self.load(id)?;
        let entry = self
            .ledger
            .find(id, history_version)?
            .ok_or_else(|| Error::NotFound(format!("history version {history_version} of prompt '{id}'")))?;

        let archived = HistoryEntry::snapshot_of(&current);
        let restored = Prompt {
            title: entry.title,
            text: entry.text.clone(),
            tags: entry.tags,
            category: Category::detect(&entry.text),
            version: VersionLedger::<S>::next_version(&current),
            updated_at: current_timestamp(),
            ..current
        };

        self.store.commit_versioned(&restored, &archived)?;
        tracing::info!(
            prompt_id = %id,
            from_version = history_version,
            new_version = restored.version,
            "Prompt restored from history"
        );
        Ok(restored)
    }

    /// Records one use of a prompt.
    ///
    /// Increments `uses` and refreshes `updated_at`. Content is unchanged, so
    /// no version bump and no history entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no prompt has this ID.
    pub fn record_use(&self, id: &PromptId) -> Result<Prompt> {
        let mut prompt = self.load(id)?;
        prompt.uses += 1;
        prompt.updated_at = current_timestamp();
        self.store.put(&prompt)?;
        Ok(prompt)
    }

    /// Deletes a prompt.
    ///
    /// History entries are retained for audit; [`SaveCoordinator::history`]
    /// keeps working after deletion.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no prompt has this ID.
    pub fn delete(&self, id: &PromptId) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(Error::NotFound(format!("prompt '{id}'")));
        }
        tracing::info!(prompt_id = %id, "Prompt deleted");
        Ok(())
    }

    /// Lists a prompt's history, descending by version.
    pub fn history(&self, id: &PromptId) -> Result<Vec<HistoryEntry>> {
        self.ledger.list(id)
    }

    /// Retrieves a prompt by ID.
    pub fn get(&self, id: &PromptId) -> Result<Option<Prompt>> {
        self.store.get(id)
    }

    /// Lists all live prompts.
    pub fn list(&self) -> Result<Vec<Prompt>> {
        self.store.list()
    }

    /// Searches live prompts by case-insensitive substring.
    pub fn search(&self, query: &str) -> Result<Vec<Prompt>> {
        let prompts = self.store.list()?;
        Ok(super::search::search(&prompts, query)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Computes aggregate statistics over the live prompt set.
    pub fn stats(&self) -> Result<StoreStats> {
        let prompts = self.store.list()?;
        Ok(StoreStats::compute(&prompts, current_timestamp()))
    }

    fn load(&self, id: &PromptId) -> Result<Prompt> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::NotFound(format!("prompt '{id}'")))
    }

    /// Scans persisted prompts for a fuzzy duplicate of `text`.
    ///
    /// Boolean detection, not best-match: the first hit in iteration order
    /// wins. The length pre-filter skips candidates whose length ratio
    /// already caps similarity below the threshold, bounding how often the
    /// quadratic distance runs.
    fn find_duplicate(&self, text: &str) -> Result<Option<Prompt>> {
        if !self.config.enabled {
            tracing::debug!("Duplicate scan disabled, skipping");
            return Ok(None);
        }

        let text_len = text.chars().count();
        let mut scanned = 0usize;
        for candidate in self.store.list()? {
            if self.config.length_prefilter && !lengths_comparable(text_len, &candidate.text, self.config.threshold)
            {
                continue;
            }
            scanned += 1;
            if is_duplicate_with_threshold(&candidate.text, text, self.config.threshold) {
                return Ok(Some(candidate));
            }
        }
        tracing::debug!(candidates = scanned, "No duplicate found");
        Ok(None)
    }
}

/// True when the length ratio leaves the similarity threshold reachable.
///
/// Distance is at least the length difference, so similarity never exceeds
/// `shorter / longer`; candidates below the threshold on that bound alone
/// cannot match and are skipped without running the DP.
#[allow(clippy::cast_precision_loss)]
fn lengths_comparable(text_len: usize, candidate: &str, threshold: f64) -> bool {
    let candidate_len = candidate.chars().count();
    let (shorter, longer) = if text_len < candidate_len {
        (text_len, candidate_len)
    } else {
        (candidate_len, text_len)
    };
    if longer == 0 {
        return true;
    }
    shorter as f64 / longer as f64 > threshold
}

/// Derives a display title from the capture origin.
fn derive_title(source: Option<&str>) -> String {
    source.map_or_else(
        || "Captured prompt".to_string(),
        |s| format!("Saved from {}", truncate(s, MAX_TITLE_LEN)),
    )
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len).collect();
        format!("{head}...")
    }
}
