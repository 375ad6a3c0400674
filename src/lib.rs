//! ttingchu library
//!
//! Form validation, display formatting and key-value persistence for the
//! ttingchu recommendation community. Modules are exposed for integration
//! testing and for the command-line front end.

pub mod config;
pub mod error;
pub mod locale;
pub mod models;
pub mod stores;
pub mod traits;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::StoreError;
pub use locale::Locale;
pub use models::{Platform, PostCategory};
pub use stores::{FileKeyValueStore, LocalStorage, MemoryStore};
pub use traits::{Clock, FixedClock, KeyValueStore, SystemClock};
