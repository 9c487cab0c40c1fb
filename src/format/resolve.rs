//! Resolving mention tokens to identities

use super::table::HandleTable;
use super::FormatError;
use crate::identity::AccountPersister;
use crate::remote::{LookupOptions, RemoteDirectory, RemoteObject};
use crate::storage::IdentityStore;
use futures::stream::{self, StreamExt};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Builds the handle table for one formatting call.
///
/// Tokens the store knows are taken as-is. The rest are looked up in the
/// directory and persisted; any token that fails along the way is left out
/// of the table instead of failing the call.
pub(crate) struct Resolver<'a> {
    pub store: &'a dyn IdentityStore,
    pub directory: &'a dyn RemoteDirectory,
    pub persister: &'a dyn AccountPersister,
    pub options: &'a LookupOptions,
    pub lookup_concurrency: usize,
}

impl Resolver<'_> {
    pub async fn resolve(&self, tokens: &[String]) -> Result<HandleTable, FormatError> {
        let mut table = HandleTable::new();
        if tokens.is_empty() {
            return Ok(table);
        }

        for record in self.store.find_by_handles(tokens)? {
            table.insert_record(&record);
        }
        debug!(tokens = tokens.len(), known = table.len(), "store lookup done");

        let mut seen = HashSet::new();
        let unknown: Vec<&str> = tokens
            .iter()
            .map(String::as_str)
            .filter(|t| !table.contains(t) && seen.insert(*t))
            .collect();

        if self.lookup_concurrency <= 1 {
            for token in unknown {
                // An earlier persist may have filed this handle already
                if table.contains(token) {
                    continue;
                }
                let actor = self.lookup(token).await;
                self.admit(&mut table, token, actor).await?;
            }
        } else {
            let mut lookups = stream::iter(unknown)
                .map(|token| async move { (token, self.lookup(token).await) })
                .buffered(self.lookup_concurrency);
            while let Some((token, actor)) = lookups.next().await {
                if table.contains(token) {
                    continue;
                }
                self.admit(&mut table, token, actor).await?;
            }
        }

        Ok(table)
    }

    /// Fetch a token's actor, or `None` if it can't be used
    async fn lookup(&self, token: &str) -> Option<RemoteObject> {
        match self.directory.lookup(token, self.options).await {
            Ok(Some(object)) if object.is_actor() && object.id.is_some() => Some(object),
            Ok(Some(object)) => {
                debug!(%token, object_type = ?object.object_type, "not an addressable actor");
                None
            }
            Ok(None) => {
                debug!(%token, "not found in directory");
                None
            }
            Err(e) => {
                warn!(%token, error = %e, "directory lookup failed");
                None
            }
        }
    }

    /// Persist a fetched actor and file it under the persisted handle
    async fn admit(
        &self,
        table: &mut HandleTable,
        token: &str,
        actor: Option<RemoteObject>,
    ) -> Result<(), FormatError> {
        let Some(actor) = actor else {
            return Ok(());
        };
        let persisted = self
            .persister
            .persist(&actor, self.options)
            .await
            .map_err(FormatError::Persistence)?;

        match persisted {
            Some(record) => {
                if record.handle != token {
                    debug!(%token, handle = %record.handle, "persisted under a different handle");
                }
                table.insert_record(&record);
            }
            None => debug!(%token, "actor was not persisted"),
        }
        Ok(())
    }
}
