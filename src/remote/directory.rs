//! Directory trait, lookup options, and the in-memory directory

use super::object::RemoteObject;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Errors from remote lookups.
///
/// The formatting pipeline treats every one of these as "not found" for the
/// mention being looked up.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("invalid document: {0}")]
    InvalidDocument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A fetched JSON-LD document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub document_url: String,
    pub context_url: Option<String>,
    pub document: serde_json::Value,
}

/// Fetches documents by URL.
///
/// Directories use loaders to dereference objects and their JSON-LD
/// contexts; callers override them to add caching or signing.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    async fn load(&self, url: &str) -> Result<RemoteDocument, LookupError>;
}

/// Loader overrides handed through to the directory and the persister
#[derive(Clone, Default)]
pub struct LookupOptions {
    /// Loader for JSON-LD contexts and signature verification
    pub context_loader: Option<Arc<dyn DocumentLoader>>,
    /// Loader for the objects themselves
    pub document_loader: Option<Arc<dyn DocumentLoader>>,
}

impl LookupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.context_loader = Some(loader);
        self
    }

    pub fn with_document_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.document_loader = Some(loader);
        self
    }
}

impl std::fmt::Debug for LookupOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupOptions")
            .field("context_loader", &self.context_loader.is_some())
            .field("document_loader", &self.document_loader.is_some())
            .finish()
    }
}

/// Resolves a mention token to a remote object.
///
/// Abstracts over transport (WebFinger plus HTTP, fixtures, mocks) so the
/// pipeline doesn't depend on how the directory is reached.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Look up the object a token refers to.
    ///
    /// `Ok(None)` means the directory has no such object.
    async fn lookup(
        &self,
        token: &str,
        options: &LookupOptions,
    ) -> Result<Option<RemoteObject>, LookupError>;
}

/// Directory backed by a fixed token → object map
#[derive(Debug, Clone, Default)]
pub struct StaticDirectory {
    objects: HashMap<String, RemoteObject>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, token: impl Into<String>, object: RemoteObject) -> Self {
        self.objects.insert(token.into(), object);
        self
    }

    /// Load a directory from a JSON file mapping tokens to objects.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LookupError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, LookupError> {
        let objects: HashMap<String, RemoteObject> = serde_json::from_str(raw)?;
        Ok(Self { objects })
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl RemoteDirectory for StaticDirectory {
    async fn lookup(
        &self,
        token: &str,
        _options: &LookupOptions,
    ) -> Result<Option<RemoteObject>, LookupError> {
        Ok(self.objects.get(token).cloned())
    }
}
