//! Case-insensitive search over prompt snapshots.

use crate::models::Prompt;

/// Filters prompts whose title, text, or tags contain the query.
///
/// Matching is case-insensitive substring containment. An empty or
/// whitespace-only query matches everything. Pure computation over the
/// snapshot; no index is consulted.
#[must_use]
pub fn search<'a>(prompts: &'a [Prompt], query: &str) -> Vec<&'a Prompt> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return prompts.iter().collect();
    }

    prompts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&query)
                || p.text.to_lowercase().contains(&query)
                || p.tags.iter().any(|t| t.to_lowercase().contains(&query))
        })
        .collect()
}
