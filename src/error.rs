//! Storage error type

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by key-value stores and the `LocalStorage` helpers
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access storage file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The storage file itself is not a JSON object of strings
    #[error("storage file {path:?} is corrupt")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode storage file {path:?}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A stored value is not valid JSON for the requested type
    #[error("stored value for key '{key}' could not be parsed")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("value for key '{key}' could not be serialized")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
