//! Key-value persistence trait.
//!
//! Defines the interface the session store uses to survive process restarts.

use crate::error::Result;
use async_trait::async_trait;

/// Key under which the serialized session record is stored.
pub const SESSION_KEY: &str = "user";

/// An abstract string key-value store.
///
/// This trait decouples the session store from the specific storage
/// mechanism (in-memory map, JSON file, platform key-value storage).
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Missing keys as `Ok(None)` rather than an error
/// - Removal of a missing key as success
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(value))`: Value found
    /// - `Ok(None)`: Nothing stored under `key`
    /// - `Err(_)`: Storage could not be read
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Key removed (or didn't exist)
    /// - `Err(_)`: Storage could not be written
    async fn remove(&self, key: &str) -> Result<()>;
}
