//! Per-call handle table and the linker built on it

use crate::identity::IdentityRecord;
use crate::markdown::MentionLinker;
use indexmap::IndexMap;
use std::collections::HashSet;

/// Where a resolved handle points
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleEntry {
    pub id: String,
    pub href: String,
}

/// Handle → resolved identity, in insertion order.
///
/// Built once per formatting call and discarded afterwards. Re-inserting a
/// handle replaces its entry but keeps its original position.
#[derive(Debug, Clone, Default)]
pub struct HandleTable {
    entries: IndexMap<String, HandleEntry>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record under its own handle
    pub fn insert_record(&mut self, record: &IdentityRecord) {
        self.insert(
            record.handle.clone(),
            HandleEntry {
                id: record.id.clone(),
                href: record.href().to_string(),
            },
        );
    }

    pub fn insert(&mut self, handle: String, entry: HandleEntry) {
        self.entries.insert(handle, entry);
    }

    pub fn get(&self, handle: &str) -> Option<&HandleEntry> {
        self.entries.get(handle)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.entries.contains_key(handle)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &HandleEntry)> {
        self.entries.iter().map(|(h, e)| (h.as_str(), e))
    }

    /// Distinct identity ids in insertion order
    pub fn mention_ids(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .values()
            .filter(|e| seen.insert(e.id.as_str()))
            .map(|e| e.id.clone())
            .collect()
    }
}

/// Linker used by the final render pass
pub(crate) struct TableLinker<'t> {
    pub table: &'t HandleTable,
    pub class: &'t str,
}

impl MentionLinker for TableLinker<'_> {
    fn link(&self, token: &str) -> Option<String> {
        self.table.get(token).map(|e| e.href.clone())
    }

    fn link_attributes(&self, token: &str) -> Vec<(String, String)> {
        let id = self
            .table
            .get(token)
            .map(|e| e.id.clone())
            .unwrap_or_default();
        vec![
            ("data-account-id".to_string(), id),
            ("data-account-handle".to_string(), token.to_string()),
            ("translate".to_string(), "no".to_string()),
            ("class".to_string(), self.class.to_string()),
        ]
    }
}
