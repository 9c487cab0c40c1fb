//! Persisting fetched actors as identity records

use super::record::{IdentityRecord, NewAccount};
use crate::remote::{LookupOptions, RemoteObject};
use crate::storage::{IdentityStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Turns a fetched actor into a durable identity record.
///
/// `Ok(None)` means the actor was not persisted (it failed validation or
/// lost a race for its handle). `Err` is reserved for the storage layer
/// itself being unavailable.
#[async_trait]
pub trait AccountPersister: Send + Sync {
    async fn persist(
        &self,
        actor: &RemoteObject,
        options: &LookupOptions,
    ) -> StorageResult<Option<IdentityRecord>>;
}

/// Persister writing straight into an `IdentityStore`
///
/// The handle is derived as `preferredUsername@host`, where host comes from
/// the actor's IRI.
pub struct StorePersister {
    store: Arc<dyn IdentityStore>,
}

impl StorePersister {
    pub fn new(store: Arc<dyn IdentityStore>) -> Self {
        Self { store }
    }

    /// Validate an actor and build the row to upsert
    pub fn account_for(actor: &RemoteObject) -> Option<NewAccount> {
        let actor_type = actor.object_type.actor_type()?;
        let iri = actor.id.as_deref()?;
        let host = Url::parse(iri).ok()?.host_str()?.to_string();
        let username = actor
            .preferred_username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())?;

        let mut account = NewAccount::new(iri, format!("{username}@{host}"), actor_type);
        if let Some(url) = actor.url.as_deref().filter(|u| Url::parse(u).is_ok()) {
            account = account.with_url(url);
        }
        if let Some(name) = actor.name.as_deref() {
            account = account.with_name(name);
        }
        Some(account)
    }
}

#[async_trait]
impl AccountPersister for StorePersister {
    async fn persist(
        &self,
        actor: &RemoteObject,
        _options: &LookupOptions,
    ) -> StorageResult<Option<IdentityRecord>> {
        let Some(account) = Self::account_for(actor) else {
            debug!(iri = ?actor.id, "actor failed validation, not persisting");
            return Ok(None);
        };

        match self.store.upsert_account(&account) {
            Ok(record) => Ok(Some(record)),
            Err(StorageError::HandleTaken(handle)) => {
                warn!(%handle, iri = %account.iri, "handle belongs to another identity");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
