//! Filesystem-based prompt store.
//!
//! Stores each prompt and history entry as an individual JSON file. Useful
//! for single-user tools and environments without a database.
//!
//! # Security
//!
//! - **Path traversal**: record IDs are validated before being used as file
//!   names; IDs containing separators or `..` are rejected.
//! - **File size limits**: records above [`MAX_FILE_SIZE`] are refused at
//!   load time.
//!
//! # Schema evolution
//!
//! Records written by older builds may lack fields added later. The on-disk
//! DTOs default missing fields once at load time (`version` 1, `uses` 0,
//! category `general`), so the rest of the crate only ever sees fully
//! populated prompts.

use crate::models::{Category, HistoryEntry, Prompt, PromptId};
use crate::storage::traits::PromptStore;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Maximum file size for prompt records (1MB).
/// Prevents memory exhaustion from corrupt or hostile files.
const MAX_FILE_SIZE: u64 = 1024 * 1024;

const fn default_version() -> u32 {
    1
}

/// Serializable prompt format for filesystem storage.
#[derive(Debug, Serialize, Deserialize)]
struct StoredPrompt {
    id: String,
    title: String,
    text: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    uses: u32,
    #[serde(default = "default_version")]
    version: u32,
    created_at: u64,
    #[serde(default)]
    updated_at: Option<u64>,
    #[serde(default)]
    source: Option<String>,
}

impl From<&Prompt> for StoredPrompt {
    fn from(p: &Prompt) -> Self {
        Self {
            id: p.id.as_str().to_string(),
            title: p.title.clone(),
            text: p.text.clone(),
            tags: p.tags.clone(),
            category: Some(p.category.as_str().to_string()),
            uses: p.uses,
            version: p.version,
            created_at: p.created_at,
            updated_at: Some(p.updated_at),
            source: p.source.clone(),
        }
    }
}

impl StoredPrompt {
    fn into_prompt(self) -> Prompt {
        Prompt {
            id: PromptId::new(self.id),
            title: self.title,
            text: self.text,
            tags: self.tags,
            category: self
                .category
                .as_deref()
                .and_then(Category::parse)
                .unwrap_or_default(),
            uses: self.uses,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at.unwrap_or(self.created_at),
            source: self.source,
        }
    }
}

/// Serializable history entry format for filesystem storage.
#[derive(Debug, Serialize, Deserialize)]
struct StoredHistoryEntry {
    entry_id: String,
    prompt_id: String,
    version: u32,
    title: String,
    text: String,
    #[serde(default)]
    tags: Vec<String>,
    archived_at: u64,
    #[serde(default)]
    original_created_at: u64,
    #[serde(default)]
    original_uses: u32,
}

impl From<&HistoryEntry> for StoredHistoryEntry {
    fn from(e: &HistoryEntry) -> Self {
        Self {
            entry_id: e.entry_id.clone(),
            prompt_id: e.prompt_id.as_str().to_string(),
            version: e.version,
            title: e.title.clone(),
            text: e.text.clone(),
            tags: e.tags.clone(),
            archived_at: e.archived_at,
            original_created_at: e.original_created_at,
            original_uses: e.original_uses,
        }
    }
}

impl StoredHistoryEntry {
    fn into_entry(self) -> HistoryEntry {
        HistoryEntry {
            entry_id: self.entry_id,
            prompt_id: PromptId::new(self.prompt_id),
            version: self.version,
            title: self.title,
            text: self.text,
            tags: self.tags,
            archived_at: self.archived_at,
            original_created_at: self.original_created_at,
            original_uses: self.original_uses,
        }
    }
}

/// Filesystem-based prompt store.
///
/// The paired history-plus-record commit is serialized behind a process-local
/// mutex and rolled back on partial failure. True multi-file atomicity across
/// independent processes is not provided; single-writer deployments are the
/// intended use.
pub struct FilesystemStore {
    prompts_dir: PathBuf,
    history_dir: PathBuf,
    /// Serializes multi-file write sequences within this process.
    write_lock: Mutex<()>,
}

impl FilesystemStore {
    /// Creates a store rooted at `base_path`, creating directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories cannot be created.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base = base_path.into();
        let prompts_dir = base.join("prompts");
        let history_dir = base.join("history");

        fs::create_dir_all(&prompts_dir)
            .map_err(|e| Error::persistence("create_storage_dir", e))?;
        fs::create_dir_all(&history_dir)
            .map_err(|e| Error::persistence("create_storage_dir", e))?;

        Ok(Self {
            prompts_dir,
            history_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates a record ID for use as a file name.
    fn validate_id(id: &str) -> Result<()> {
        if id.is_empty()
            || id.contains('/')
            || id.contains('\\')
            || id.contains("..")
            || id.contains('\0')
        {
            return Err(Error::InvalidInput(format!(
                "record id '{id}' is not a valid file name"
            )));
        }
        Ok(())
    }

    fn prompt_path(&self, id: &PromptId) -> Result<PathBuf> {
        Self::validate_id(id.as_str())?;
        Ok(self.prompts_dir.join(format!("{id}.json")))
    }

    fn history_path(&self, entry_id: &str) -> Result<PathBuf> {
        Self::validate_id(entry_id)?;
        Ok(self.history_dir.join(format!("{entry_id}.json")))
    }

    /// Writes JSON to `path` via a temp file and rename, so readers never
    /// observe a partially written record.
    fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let json = serde_json::to_vec_pretty(value)
            .map_err(|e| Error::persistence("serialize_record", e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, &json).map_err(|e| Error::persistence("write_record", e))?;
        fs::rename(&tmp, path).map_err(|e| Error::persistence("write_record", e))?;
        Ok(())
    }

    fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Option<T>> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::persistence("read_record", e)),
        };
        if metadata.len() > MAX_FILE_SIZE {
            return Err(Error::persistence(
                "read_record",
                format!("record at {} exceeds size limit", path.display()),
            ));
        }
        let bytes = fs::read(path).map_err(|e| Error::persistence("read_record", e))?;
        let value =
            serde_json::from_slice(&bytes).map_err(|e| Error::persistence("parse_record", e))?;
        Ok(Some(value))
    }

    fn read_dir_records<T: for<'de> Deserialize<'de>>(dir: &Path) -> Result<Vec<T>> {
        let entries = fs::read_dir(dir).map_err(|e| Error::persistence("list_records", e))?;
        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::persistence("list_records", e))?;
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match Self::read_json::<T>(&path) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {},
                Err(e) => {
                    // A single corrupt file must not take down every scan.
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable record");
                },
            }
        }
        Ok(records)
    }

    fn archive_exists(&self, prompt_id: &PromptId, version: u32) -> Result<bool> {
        let entries: Vec<StoredHistoryEntry> = Self::read_dir_records(&self.history_dir)?;
        Ok(entries
            .iter()
            .any(|e| e.prompt_id == prompt_id.as_str() && e.version == version))
    }

    fn put_history_locked(&self, entry: &HistoryEntry) -> Result<()> {
        if self.archive_exists(&entry.prompt_id, entry.version)? {
            return Err(Error::AlreadyArchived {
                prompt_id: entry.prompt_id.to_string(),
                version: entry.version,
            });
        }
        let path = self.history_path(&entry.entry_id)?;
        Self::write_json(&path, &StoredHistoryEntry::from(entry))
    }
}

impl PromptStore for FilesystemStore {
    fn get(&self, id: &PromptId) -> Result<Option<Prompt>> {
        let path = self.prompt_path(id)?;
        Ok(Self::read_json::<StoredPrompt>(&path)?.map(StoredPrompt::into_prompt))
    }

    fn put(&self, prompt: &Prompt) -> Result<()> {
        let _guard = self.lock();
        let path = self.prompt_path(&prompt.id)?;
        Self::write_json(&path, &StoredPrompt::from(prompt))
    }

    fn delete(&self, id: &PromptId) -> Result<bool> {
        let _guard = self.lock();
        let path = self.prompt_path(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Error::persistence("delete_record", e)),
        }
    }

    fn list(&self) -> Result<Vec<Prompt>> {
        let records: Vec<StoredPrompt> = Self::read_dir_records(&self.prompts_dir)?;
        Ok(records.into_iter().map(StoredPrompt::into_prompt).collect())
    }

    fn put_history(&self, entry: &HistoryEntry) -> Result<()> {
        let _guard = self.lock();
        self.put_history_locked(entry)
    }

    fn list_history(&self, prompt_id: &PromptId) -> Result<Vec<HistoryEntry>> {
        let records: Vec<StoredHistoryEntry> = Self::read_dir_records(&self.history_dir)?;
        Ok(records
            .into_iter()
            .filter(|e| e.prompt_id == prompt_id.as_str())
            .map(StoredHistoryEntry::into_entry)
            .collect())
    }

    fn commit_versioned(&self, prompt: &Prompt, archived: &HistoryEntry) -> Result<()> {
        let _guard = self.lock();
        self.put_history_locked(archived)?;

        let path = self.prompt_path(&prompt.id)?;
        if let Err(e) = Self::write_json(&path, &StoredPrompt::from(prompt)) {
            // Roll the archive back so the pair stays all-or-nothing.
            if let Ok(history_path) = self.history_path(&archived.entry_id) {
                let _ = fs::remove_file(history_path);
            }
            return Err(e);
        }
        Ok(())
    }
}
