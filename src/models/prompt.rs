//! Prompt types and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a prompt.
///
/// Opaque and immutable after creation. New identifiers are allocated by the
/// save coordinator; callers never construct fresh ones for existing records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(String);

impl PromptId {
    /// Creates a new prompt ID from an existing string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Allocates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PromptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PromptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Content category, derived from prompt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Programming, debugging, and technical prompts.
    Coding,
    /// Writing, content, and copywriting prompts.
    Writing,
    /// Research, data, and analysis prompts.
    Analysis,
    /// Design, art, and brainstorming prompts.
    Creative,
    /// Everything else.
    General,
}

/// Keyword lists used by [`Category::detect`]. Matching is first-hit in
/// declaration order, so coding keywords win over writing keywords.
const CODING_KEYWORDS: &[&str] = &[
    "code",
    "function",
    "javascript",
    "python",
    "react",
    "api",
    "debug",
    "programming",
    "algorithm",
    "database",
];

const WRITING_KEYWORDS: &[&str] = &[
    "write",
    "article",
    "blog",
    "content",
    "essay",
    "story",
    "copywriting",
    "marketing",
];

const ANALYSIS_KEYWORDS: &[&str] = &[
    "analyze",
    "research",
    "data",
    "study",
    "report",
    "statistics",
    "insights",
    "trends",
];

const CREATIVE_KEYWORDS: &[&str] = &[
    "creative",
    "design",
    "art",
    "music",
    "brainstorm",
    "innovative",
    "imagination",
];

impl Category {
    /// Derives a category from prompt text by keyword matching.
    ///
    /// # Example
    ///
    /// ```rust
    /// use prompthive::Category;
    ///
    /// assert_eq!(Category::detect("Debug this Python function"), Category::Coding);
    /// assert_eq!(Category::detect("Hello there"), Category::General);
    /// ```
    #[must_use]
    pub fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let contains_any = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if contains_any(CODING_KEYWORDS) {
            Self::Coding
        } else if contains_any(WRITING_KEYWORDS) {
            Self::Writing
        } else if contains_any(ANALYSIS_KEYWORDS) {
            Self::Analysis
        } else if contains_any(CREATIVE_KEYWORDS) {
            Self::Creative
        } else {
            Self::General
        }
    }

    /// Returns the category as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coding => "coding",
            Self::Writing => "writing",
            Self::Analysis => "analysis",
            Self::Creative => "creative",
            Self::General => "general",
        }
    }

    /// Parses a category from its string form. Case-insensitive.
    ///
    /// Returns `None` for unknown names; storage adapters fall back to
    /// [`Category::General`] for records written before categories existed.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "coding" => Some(Self::Coding),
            "writing" => Some(Self::Writing),
            "analysis" => Some(Self::Analysis),
            "creative" => Some(Self::Creative),
            "general" => Some(Self::General),
            _ => None,
        }
    }

    /// Returns all categories.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Coding,
            Self::Writing,
            Self::Analysis,
            Self::Creative,
            Self::General,
        ]
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::General
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A stored prompt snippet.
///
/// The live record. `version` starts at 1 and strictly increases with every
/// committed mutation of `title`/`text`/`tags`; no two committed states of
/// the same prompt ever share a version number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Unique identifier, immutable after creation.
    pub id: PromptId,
    /// Display title.
    pub title: String,
    /// The semantic payload. Never empty after trimming.
    pub text: String,
    /// Tags in insertion order. Order is irrelevant for matching.
    pub tags: Vec<String>,
    /// Category derived from `text` content.
    pub category: Category,
    /// Monotonically non-decreasing usage counter.
    pub uses: u32,
    /// Version number, starts at 1.
    pub version: u32,
    /// Creation timestamp (Unix epoch seconds), immutable.
    pub created_at: u64,
    /// Timestamp of the last committed mutation (Unix epoch seconds).
    pub updated_at: u64,
    /// Origin identifier (e.g. a page URL), used in fingerprinting.
    pub source: Option<String>,
}

impl Prompt {
    /// Returns the tags deduplicated while preserving insertion order.
    ///
    /// Tag order is display order; duplicates can arrive from automated
    /// capture paths and are dropped on the first occurrence wins rule.
    #[must_use]
    pub fn normalized_tags(tags: Vec<String>) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        tags.into_iter()
            .filter(|t| !t.trim().is_empty() && seen.insert(t.clone()))
            .collect()
    }
}
