//! Aggregate statistics over stored prompts.

use super::{Category, Prompt, PromptId};
use std::collections::HashMap;

/// Seconds in the "recent" window used by [`StoreStats::compute`].
const RECENT_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Aggregate statistics over the live prompt set.
///
/// Pure computation over a snapshot; nothing here reads the store.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    /// Total number of live prompts.
    pub total_prompts: usize,
    /// Sum of all usage counters.
    pub total_uses: u64,
    /// Prompts created within the last seven days.
    pub recent_prompts: usize,
    /// Count of prompts per category.
    pub category_breakdown: HashMap<Category, usize>,
    /// The most used prompt, if any prompts exist.
    pub most_used: Option<PromptId>,
    /// Share of prompts used more than once, in `[0, 1]`.
    pub reuse_rate: f64,
}

impl StoreStats {
    /// Computes statistics for a snapshot of live prompts.
    #[must_use]
    pub fn compute(prompts: &[Prompt], now: u64) -> Self {
        if prompts.is_empty() {
            return Self::default();
        }

        let mut category_breakdown = HashMap::new();
        let mut total_uses = 0u64;
        let mut recent_prompts = 0;
        let mut most_used: Option<&Prompt> = None;
        let mut reused = 0usize;

        for prompt in prompts {
            total_uses += u64::from(prompt.uses);
            *category_breakdown.entry(prompt.category).or_insert(0) += 1;

            if now.saturating_sub(prompt.created_at) <= RECENT_WINDOW_SECS {
                recent_prompts += 1;
            }
            if prompt.uses > 1 {
                reused += 1;
            }
            if most_used.is_none_or(|m| prompt.uses > m.uses) {
                most_used = Some(prompt);
            }
        }

        #[allow(clippy::cast_precision_loss)]
        let reuse_rate = reused as f64 / prompts.len() as f64;

        Self {
            total_prompts: prompts.len(),
            total_uses,
            recent_prompts,
            category_breakdown,
            most_used: most_used.map(|p| p.id.clone()),
            reuse_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt(id: &str, uses: u32, category: Category, created_at: u64) -> Prompt {
        Prompt {
            id: PromptId::new(id),
            title: id.to_string(),
            text: format!("text for {id}"),
            tags: vec![],
            category,
            uses,
            version: 1,
            created_at,
            updated_at: created_at,
            source: None,
        }
    }

    #[test]
    fn test_empty_stats() {
        let stats = StoreStats::compute(&[], 1_700_000_000);
        assert_eq!(stats.total_prompts, 0);
        assert!(stats.most_used.is_none());
        assert!(stats.reuse_rate.abs() < f64::EPSILON);
    }

    #[test]
    fn test_compute_breakdown_and_most_used() {
        let now = 1_700_000_000;
        let prompts = vec![
            prompt("a", 5, Category::Coding, now - 100),
            prompt("b", 0, Category::Coding, now - RECENT_WINDOW_SECS - 1),
            prompt("c", 2, Category::Writing, now - 100),
        ];

        let stats = StoreStats::compute(&prompts, now);
        assert_eq!(stats.total_prompts, 3);
        assert_eq!(stats.total_uses, 7);
        assert_eq!(stats.recent_prompts, 2);
        assert_eq!(stats.category_breakdown[&Category::Coding], 2);
        assert_eq!(stats.category_breakdown[&Category::Writing], 1);
        assert_eq!(stats.most_used, Some(PromptId::new("a")));
        assert!((stats.reuse_rate - 2.0 / 3.0).abs() < f64::EPSILON);
    }
}
