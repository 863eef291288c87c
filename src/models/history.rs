//! Prompt history entries.

use super::{Prompt, PromptId};

/// Immutable snapshot of a prompt taken before a mutation was applied.
///
/// Keyed by `(prompt_id, version)` where `version` is the version the
/// snapshot *was* (the pre-mutation version). `entry_id` additionally embeds
/// a millisecond timestamp to disambiguate entries should the same version
/// ever be re-captured, which must not happen under correct operation.
///
/// Entries are never mutated after creation. For a given prompt the ledger
/// forms a strictly increasing, gap-free sequence of versions from 1 up to
/// the live record's version minus one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Synthetic storage key: `{prompt_id}_v{version}_{millis}`.
    pub entry_id: String,
    /// The prompt this snapshot belongs to.
    pub prompt_id: PromptId,
    /// The pre-mutation version this entry archives.
    pub version: u32,
    /// Title as it existed at this version.
    pub title: String,
    /// Text as it existed at this version.
    pub text: String,
    /// Tags as they existed at this version.
    pub tags: Vec<String>,
    /// When this entry was archived (Unix epoch seconds).
    pub archived_at: u64,
    /// The snapshot's original creation timestamp, kept for audit.
    pub original_created_at: u64,
    /// The snapshot's usage counter at archive time, kept for audit.
    pub original_uses: u32,
}

impl HistoryEntry {
    /// Builds a history entry snapshotting the given live record.
    #[must_use]
    pub fn snapshot_of(prompt: &Prompt) -> Self {
        let millis = crate::current_timestamp_millis();
        Self {
            entry_id: format!("{}_v{}_{}", prompt.id, prompt.version, millis),
            prompt_id: prompt.id.clone(),
            version: prompt.version,
            title: prompt.title.clone(),
            text: prompt.text.clone(),
            tags: prompt.tags.clone(),
            archived_at: millis / 1000,
            original_created_at: prompt.created_at,
            original_uses: prompt.uses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn sample_prompt() -> Prompt {
        Prompt {
            id: PromptId::new("p1"),
            title: "Sample".to_string(),
            text: "Explain quantum entanglement".to_string(),
            tags: vec!["physics".to_string()],
            category: Category::General,
            uses: 4,
            version: 2,
            created_at: 1_700_000_000,
            updated_at: 1_700_000_100,
            source: None,
        }
    }

    #[test]
    fn test_snapshot_copies_content() {
        let prompt = sample_prompt();
        let entry = HistoryEntry::snapshot_of(&prompt);

        assert_eq!(entry.prompt_id, prompt.id);
        assert_eq!(entry.version, 2);
        assert_eq!(entry.title, prompt.title);
        assert_eq!(entry.text, prompt.text);
        assert_eq!(entry.tags, prompt.tags);
        assert_eq!(entry.original_created_at, prompt.created_at);
        assert_eq!(entry.original_uses, 4);
    }

    #[test]
    fn test_entry_id_embeds_prompt_and_version() {
        let entry = HistoryEntry::snapshot_of(&sample_prompt());
        assert!(entry.entry_id.starts_with("p1_v2_"));
    }
}
