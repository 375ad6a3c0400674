//! Common trait definitions
//!
//! Defines the seams used for dependency injection and testing: the
//! key-value store behind `LocalStorage` and the clock used for relative
//! time formatting.

use crate::error::StoreError;
use chrono::{DateTime, Utc};

/// Trait for text key-value storage
///
/// Mirrors the browser storage API: values are opaque text, absent keys
/// read as `None`. Production code uses `FileKeyValueStore`, tests can use
/// `MemoryStore`.
pub trait KeyValueStore: Send + Sync {
    /// Read the text stored under a key
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store text under a key, replacing any previous value
    fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Delete a key; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
