//! Storage backends for identity records
//!
//! The pipeline reads and writes identities through the `IdentityStore`
//! trait. The bundled implementation is `SqliteStore`.

mod sqlite;
mod traits;

pub use sqlite::SqliteStore;
pub use traits::{IdentityStore, OpenStore, StorageError, StorageResult};
