//! Data models for the prompt store.
//!
//! This module contains the core data structures used throughout the system.

mod history;
mod prompt;
mod stats;

pub use history::HistoryEntry;
pub use prompt::{Category, Prompt, PromptId};
pub use stats::StoreStats;
