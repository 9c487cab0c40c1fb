//! atlink: mention resolution and rendering for federated social text
//!
//! Turns user-written markdown containing `@user@host` mentions into HTML,
//! resolving each mention to a durable identity record on the way.
//!
//! # Core Concepts
//!
//! - **Mention tokens**: handles found in text, without the `@` sigil
//! - **Identity records**: persisted identities with a stable id and a link
//! - **Handle table**: per-call map from token to resolved id and link
//!
//! # Example
//!
//! ```
//! use atlink::{FormatConfig, MarkdownRenderer};
//!
//! let rendered = MarkdownRenderer::new().render("hi @bob@example.com", None);
//! assert_eq!(rendered.mentions, vec!["bob@example.com"]);
//! let _config = FormatConfig::default();
//! ```

pub mod format;
pub mod identity;
pub mod markdown;
pub mod remote;
pub mod storage;

pub use format::{
    format_text, FormatConfig, FormatError, FormatOutcome, FormatResult, HandleEntry, HandleTable,
    TextFormatter,
};
pub use identity::{AccountPersister, ActorType, IdentityRecord, NewAccount, StorePersister};
pub use markdown::{MarkdownRenderer, MentionLinker, Rendered};
pub use remote::{
    DocumentLoader, LookupError, LookupOptions, ObjectType, RemoteDirectory, RemoteDocument,
    RemoteObject, StaticDirectory,
};
pub use storage::{IdentityStore, OpenStore, SqliteStore, StorageError, StorageResult};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
