//! Shared collaborators for formatting pipeline tests
//!
//! In-memory stand-ins for the identity store, the remote directory and the
//! persister, each recording how it was called.

#![allow(dead_code)]

use async_trait::async_trait;
use atlink::{
    AccountPersister, ActorType, DocumentLoader, IdentityRecord, IdentityStore, LookupError,
    LookupOptions, NewAccount, RemoteDirectory, RemoteDocument, RemoteObject, StorageError,
    StorageResult,
};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn record(id: &str, handle: &str, iri: &str, url: Option<&str>) -> IdentityRecord {
    IdentityRecord {
        id: id.to_string(),
        handle: handle.to_string(),
        iri: iri.to_string(),
        url: url.map(String::from),
        name: None,
        actor_type: ActorType::Person,
        updated_at: Utc::now(),
    }
}

/// Store holding records with caller-chosen ids
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<IdentityRecord>>,
    queries: AtomicUsize,
    fail_queries: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(self, record: IdentityRecord) -> Self {
        self.records.lock().unwrap().push(record);
        self
    }

    /// Store whose queries always fail
    pub fn unavailable() -> Self {
        Self {
            fail_queries: true,
            ..Self::default()
        }
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn records(&self) -> Vec<IdentityRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl IdentityStore for MemoryStore {
    fn find_by_handles(&self, handles: &[String]) -> StorageResult<Vec<IdentityRecord>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "store offline",
            )));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| handles.contains(&r.handle))
            .cloned()
            .collect())
    }

    fn upsert_account(&self, account: &NewAccount) -> StorageResult<IdentityRecord> {
        let mut records = self.records.lock().unwrap();
        if let Some(existing) = records.iter_mut().find(|r| r.iri == account.iri) {
            existing.handle = account.handle.clone();
            existing.url = account.url.clone();
            return Ok(existing.clone());
        }
        let mut created = record(
            &(records.len() + 1).to_string(),
            &account.handle,
            &account.iri,
            account.url.as_deref(),
        );
        created.actor_type = account.actor_type;
        records.push(created.clone());
        Ok(created)
    }

    fn load_account(&self, id: &str) -> StorageResult<Option<IdentityRecord>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    fn load_account_by_iri(&self, iri: &str) -> StorageResult<Option<IdentityRecord>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.iri == iri).cloned())
    }

    fn list_accounts(&self) -> StorageResult<Vec<IdentityRecord>> {
        Ok(self.records())
    }
}

/// Directory that records each lookup
#[derive(Default)]
pub struct RecordingDirectory {
    objects: HashMap<String, RemoteObject>,
    broken: Vec<String>,
    lookups: Mutex<Vec<String>>,
    seen_loaders: Mutex<Vec<Option<Arc<dyn DocumentLoader>>>>,
}

impl RecordingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, token: &str, object: RemoteObject) -> Self {
        self.objects.insert(token.to_string(), object);
        self
    }

    /// Lookups of `token` fail with a transport error
    pub fn with_broken(mut self, token: &str) -> Self {
        self.broken.push(token.to_string());
        self
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub fn seen_document_loaders(&self) -> Vec<Option<Arc<dyn DocumentLoader>>> {
        self.seen_loaders.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteDirectory for RecordingDirectory {
    async fn lookup(
        &self,
        token: &str,
        options: &LookupOptions,
    ) -> Result<Option<RemoteObject>, LookupError> {
        self.lookups.lock().unwrap().push(token.to_string());
        self.seen_loaders
            .lock()
            .unwrap()
            .push(options.document_loader.clone());
        tokio::task::yield_now().await;
        if self.broken.iter().any(|b| b == token) {
            return Err(LookupError::Transport(format!("connection reset for {token}")));
        }
        Ok(self.objects.get(token).cloned())
    }
}

/// How `ScriptedPersister` answers for a given IRI
#[derive(Clone)]
pub enum PersistReply {
    Record(IdentityRecord),
    Nothing,
    Fail,
}

/// Persister answering from a script keyed by actor IRI
#[derive(Default)]
pub struct ScriptedPersister {
    replies: HashMap<String, PersistReply>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedPersister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, iri: &str, reply: PersistReply) -> Self {
        self.replies.insert(iri.to_string(), reply);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AccountPersister for ScriptedPersister {
    async fn persist(
        &self,
        actor: &RemoteObject,
        _options: &LookupOptions,
    ) -> StorageResult<Option<IdentityRecord>> {
        let iri = actor.id.clone().unwrap_or_default();
        self.calls.lock().unwrap().push(iri.clone());
        match self.replies.get(&iri) {
            Some(PersistReply::Record(r)) => Ok(Some(r.clone())),
            Some(PersistReply::Fail) => Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            ))),
            Some(PersistReply::Nothing) | None => Ok(None),
        }
    }
}

/// Loader that is only passed along, never called
pub struct InertLoader;

#[async_trait]
impl DocumentLoader for InertLoader {
    async fn load(&self, url: &str) -> Result<RemoteDocument, LookupError> {
        Err(LookupError::Transport(format!("inert loader asked for {url}")))
    }
}
