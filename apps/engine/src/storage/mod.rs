#![allow(dead_code)]

//! Pluggable key-value persistence.
//!
//! Controllers never touch ambient storage; they hold an `Arc<dyn
//! KeyValueStore>` and read/write whole serialized slots under well-known
//! keys. `MemoryStore` backs tests, `JsonFileStore` backs the binary.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::errors::AppError;

/// Draft snapshot slot — overwritten on every autosave tick.
pub const DRAFT_KEY: &str = "cv-sob-medida-draft";
/// Whole history list, replaced on every history write.
pub const HISTORY_KEY: &str = "cv-sob-medida-history";
/// Default-CV-on-file slot: `{file_name, updated_at}`.
pub const DEFAULT_CV_KEY: &str = "cv-default-file";
/// Source panel collapse flag, boolean-as-string.
pub const SOURCE_COLLAPSED_KEY: &str = "cv-source-collapsed";
/// Sidebar collapse flag, boolean-as-string.
pub const SIDEBAR_COLLAPSED_KEY: &str = "cv-sidebar-collapsed";

/// Keyed string slots with overwrite semantics. Exactly one logical writer
/// (the current session), so there is nothing to lock across operations.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored value, or `None` when the key has never been set.
    async fn get(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), AppError>;

    /// Removes the slot. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), AppError>;
}
