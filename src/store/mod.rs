// ABOUTME: Key-value store port: the persisted slots the history log lives in.
// ABOUTME: File-backed JSON store for real use, in-memory store for tests.

pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use serde_json::Value;

use crate::error::StoreError;

/// A persisted map of named JSON values.
///
/// Implementations use interior mutability so one store can be shared
/// behind an `Arc` by the history log and the CLI.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Drop `key` entirely. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
