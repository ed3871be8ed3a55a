//! Library store port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::library::RecordingEntry;

/// Library store errors
#[derive(Debug, Clone, Error)]
pub enum LibraryError {
    #[error("Library data is corrupt: {0}")]
    CorruptStore(String),

    #[error("Failed to persist library: {0}")]
    PersistenceUnavailable(String),
}

/// Port for the durable, ordered collection of saved recordings.
///
/// Mutations are read-modify-write over the whole collection and must be
/// serialized by the implementation so back-to-back append/remove apply
/// in issuance order against one logical copy.
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// All valid entries in insertion order.
    ///
    /// Malformed entries are filtered out, never a hard error;
    /// `CorruptStore` only when the serialized form cannot be parsed at
    /// all, in which case the caller treats the store as empty.
    async fn list(&self) -> Result<Vec<RecordingEntry>, LibraryError>;

    /// Append an entry, assigning a unique id if absent.
    ///
    /// # Returns
    /// The entry as persisted (with its id), or `PersistenceUnavailable`
    /// when the write is rejected — the caller must not claim success.
    async fn append(&self, entry: RecordingEntry) -> Result<RecordingEntry, LibraryError>;

    /// Remove the first entry with a matching id.
    /// A missing id is a no-op, matching idempotent-delete semantics.
    async fn remove(&self, id: &str) -> Result<(), LibraryError>;
}
