//! Storage layer abstraction.
//!
//! The store is the only shared mutable resource in the system. Backends are
//! the authoritative source of truth for prompts and their history; the save
//! coordinator is the sole writer path against them.

mod filesystem;
mod memory;
mod traits;

pub use filesystem::FilesystemStore;
pub use memory::MemoryStore;
pub use traits::PromptStore;
