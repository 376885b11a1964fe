//! # Key-Value Backend Trait

use super::errors::StoreResult;

/// Synchronous string-keyed store that outlives the process.
///
/// `set` must replace the value atomically: a reader sees either the old or
/// the new value, never a mix.
pub trait KeyValueStore: Send + Sync + std::fmt::Debug {
    /// Read the value at `key`, `None` if absent
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Replace the value at `key`
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StoreResult<()>;
}
