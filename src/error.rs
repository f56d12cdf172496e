use crate::storage::StorageError;
use crate::transport::NetworkError;
use thiserror::Error;

/// Unified error type for the cache agent runtime.
/// This aggregates all low-level errors into actionable, high-level categories
#[derive(Debug, Error)]
pub enum Error {
    /// A manifest asset could not be fetched during install. The whole install
    /// is rejected and no batch is committed.
    #[error("install failed for asset {url}: {source}")]
    Install {
        url: String,
        #[source]
        source: NetworkError,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// A failed navigation asked for the offline fallback but the store holds
    /// no entry for it (install never ran, or the store was deleted).
    #[error("offline fallback {url} is not present in the cache store")]
    OfflineFallbackMissing { url: String },

    #[error("configuration error: {message}")]
    Config { message: String },
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error came out of the network rather than the agent's own
    /// configuration or storage.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Install { .. })
    }
}
