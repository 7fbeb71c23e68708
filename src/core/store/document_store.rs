// Whole-document persistence.
//
// Both the points ledger and the guild settings live in a single document each.
// Every operation loads the full document, changes it in memory, and writes the
// full document back, so the backing store is the only source of truth between
// events. There is no partial update and no append log.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Loads and saves one complete document.
///
/// Implementations must never leave a half-written document behind: a failed
/// save keeps the previous document readable.
#[async_trait]
pub trait DocumentStore<D>: Send + Sync {
    /// Read the full document. A missing backing file is not an error; it is
    /// created empty and the default document is returned.
    async fn load(&self) -> Result<D, StoreError>;

    /// Overwrite the full document.
    async fn save(&self, document: &D) -> Result<(), StoreError>;
}
