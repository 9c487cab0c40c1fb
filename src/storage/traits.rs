//! Storage trait definitions

use crate::identity::{IdentityRecord, NewAccount};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Date parsing error: {0}")]
    DateParse(String),

    #[error("Unknown actor type: {0}")]
    UnknownActorType(String),

    /// The handle already belongs to an identity with a different IRI
    #[error("Handle already taken: {0}")]
    HandleTaken(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for identity storage backends
///
/// Implementations must be thread-safe (Send + Sync). Concurrent upserts of
/// the same IRI must converge on a single record.
pub trait IdentityStore: Send + Sync {
    /// All records whose handle is a member of `handles`
    ///
    /// Duplicate handles in the input do not produce duplicate rows.
    fn find_by_handles(&self, handles: &[String]) -> StorageResult<Vec<IdentityRecord>>;

    /// Insert an identity, or refresh the existing one with the same IRI
    fn upsert_account(&self, account: &NewAccount) -> StorageResult<IdentityRecord>;

    /// Load a record by internal id
    fn load_account(&self, id: &str) -> StorageResult<Option<IdentityRecord>>;

    /// Load a record by canonical IRI
    fn load_account_by_iri(&self, iri: &str) -> StorageResult<Option<IdentityRecord>>;

    /// Every known record, ordered by handle
    fn list_accounts(&self) -> StorageResult<Vec<IdentityRecord>>;
}

/// Extension trait for opening stores from paths
pub trait OpenStore: IdentityStore + Sized {
    /// Open or create a store at the given path
    fn open(path: impl AsRef<Path>) -> StorageResult<Self>;

    /// Create an in-memory store (useful for testing)
    fn open_in_memory() -> StorageResult<Self>;
}
