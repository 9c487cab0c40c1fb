//! Remote directory lookups
//!
//! Mentions the store does not know are looked up in a remote directory.
//! The transport behind a directory is not this crate's concern: callers
//! plug in a `RemoteDirectory`, and may hand it `DocumentLoader` overrides
//! through `LookupOptions`.

mod directory;
mod object;

pub use directory::{
    DocumentLoader, LookupError, LookupOptions, RemoteDirectory, RemoteDocument, StaticDirectory,
};
pub use object::{ObjectType, RemoteObject};
