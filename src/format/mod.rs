//! Mention-aware text formatting
//!
//! Formatting runs in four steps, strictly one after another:
//!
//! 1. a discovery render collects every mention token without resolving any,
//! 2. the resolver matches tokens against the store, then looks up and
//!    persists the ones the store lacks,
//! 3. a second render links mentions through the finished handle table,
//! 4. the HTML is returned with the distinct ids of the linked identities.
//!
//! A mention that cannot be resolved stays plain text. Only store and
//! persistence failures fail the call.

mod config;
mod resolve;
mod table;

pub use config::{FormatConfig, DEFAULT_MENTION_CLASS};
pub use table::{HandleEntry, HandleTable};

use crate::identity::{AccountPersister, StorePersister};
use crate::markdown::MarkdownRenderer;
use crate::remote::{LookupOptions, RemoteDirectory};
use crate::storage::{IdentityStore, StorageError};
use resolve::Resolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use table::TableLinker;
use thiserror::Error;
use tracing::debug;

/// Errors that fail a whole formatting call
#[derive(Debug, Error)]
pub enum FormatError {
    /// The store could not be queried
    #[error("identity store unavailable: {0}")]
    Store(#[from] StorageError),

    /// The persistence layer failed while saving a fetched identity
    #[error("identity persistence failed: {0}")]
    Persistence(#[source] StorageError),
}

/// Result type for formatting calls
pub type FormatOutcome<T> = Result<T, FormatError>;

/// Rendered text plus the identities it mentions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatResult {
    pub html: String,
    /// Distinct identity ids, store matches first, then newly resolved ones
    pub mentions: Vec<String>,
}

/// Formats user text against an identity store and a remote directory.
pub struct TextFormatter {
    store: Arc<dyn IdentityStore>,
    directory: Arc<dyn RemoteDirectory>,
    persister: Arc<dyn AccountPersister>,
    config: FormatConfig,
}

impl TextFormatter {
    /// Formatter persisting new identities straight into `store`
    pub fn new(store: Arc<dyn IdentityStore>, directory: Arc<dyn RemoteDirectory>) -> Self {
        let persister = Arc::new(StorePersister::new(store.clone()));
        Self {
            store,
            directory,
            persister,
            config: FormatConfig::default(),
        }
    }

    pub fn with_persister(mut self, persister: Arc<dyn AccountPersister>) -> Self {
        self.persister = persister;
        self
    }

    pub fn with_config(mut self, config: FormatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &FormatConfig {
        &self.config
    }

    fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::new().with_linkify(self.config.linkify)
    }

    /// Mention tokens in `text`, in order, duplicates kept. No I/O.
    pub fn scan(&self, text: &str) -> Vec<String> {
        self.renderer().render(text, None).mentions
    }

    /// Resolve tokens into a handle table, persisting new identities.
    pub async fn resolve(
        &self,
        tokens: &[String],
        options: &LookupOptions,
    ) -> FormatOutcome<HandleTable> {
        Resolver {
            store: self.store.as_ref(),
            directory: self.directory.as_ref(),
            persister: self.persister.as_ref(),
            options,
            lookup_concurrency: self.config.lookup_concurrency,
        }
        .resolve(tokens)
        .await
    }

    /// Render `text` with mentions linked through `table`. No I/O.
    pub fn render(&self, text: &str, table: &HandleTable) -> String {
        let linker = TableLinker {
            table,
            class: &self.config.mention_class,
        };
        self.renderer().render(text, Some(&linker)).html
    }

    /// Format `text`, resolving and persisting the identities it mentions.
    pub async fn format(&self, text: &str, options: &LookupOptions) -> FormatOutcome<FormatResult> {
        let tokens = self.scan(text);
        let table = self.resolve(&tokens, options).await?;
        let html = self.render(text, &table);
        let mentions = table.mention_ids();
        debug!(
            tokens = tokens.len(),
            resolved = mentions.len(),
            "formatted text"
        );
        Ok(FormatResult { html, mentions })
    }
}

/// Format `text` with the default persister and configuration.
pub async fn format_text(
    store: Arc<dyn IdentityStore>,
    directory: Arc<dyn RemoteDirectory>,
    text: &str,
    options: &LookupOptions,
) -> FormatOutcome<FormatResult> {
    TextFormatter::new(store, directory).format(text, options).await
}
