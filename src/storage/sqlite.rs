//! SQLite storage backend for identity records

use super::traits::{IdentityStore, OpenStore, StorageError, StorageResult};
use crate::identity::{ActorType, IdentityRecord, NewAccount};
use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, OptionalExtension, Row};
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

/// Raw column values of an `accounts` row, in `COLUMNS` order
type AccountRow = (
    String,
    String,
    String,
    Option<String>,
    Option<String>,
    String,
    String,
);

const COLUMNS: &str = "id, handle, iri, url, name, actor_type, updated_at";

/// Handles bound per membership query, below SQLite's host-parameter limit
const HANDLES_PER_QUERY: usize = 500;

/// SQLite-backed identity store
///
/// A single `accounts` table keyed by a UUID id, with unique `iri` and
/// `handle` columns. Thread-safe via internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Initialize the database schema
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                handle TEXT NOT NULL UNIQUE,
                iri TEXT NOT NULL UNIQUE,
                url TEXT,
                name TEXT,
                actor_type TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
            row.get(6)?,
        ))
    }

    /// Deserialize a record from database columns
    fn row_to_record(row: AccountRow) -> StorageResult<IdentityRecord> {
        let (id, handle, iri, url, name, actor_type, updated_at) = row;
        let actor_type =
            ActorType::parse(&actor_type).ok_or(StorageError::UnknownActorType(actor_type))?;
        Ok(IdentityRecord {
            id,
            handle,
            iri,
            url,
            name,
            actor_type,
            updated_at: DateTime::parse_from_rfc3339(&updated_at)
                .map_err(|e| StorageError::DateParse(e.to_string()))?
                .with_timezone(&Utc),
        })
    }

    fn collect_rows(
        rows: impl Iterator<Item = rusqlite::Result<AccountRow>>,
    ) -> StorageResult<Vec<IdentityRecord>> {
        let mut records = Vec::new();
        for row in rows {
            records.push(Self::row_to_record(row?)?);
        }
        Ok(records)
    }

    fn from_connection(conn: Connection) -> StorageResult<Self> {
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::from_connection(Connection::open(path)?)
    }

    fn open_in_memory() -> StorageResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }
}

impl IdentityStore for SqliteStore {
    fn find_by_handles(&self, handles: &[String]) -> StorageResult<Vec<IdentityRecord>> {
        if handles.is_empty() {
            return Ok(Vec::new());
        }

        // Sorted distinct handles: chunks come back in handle order, so
        // concatenating them keeps the whole result ordered by handle.
        let distinct: Vec<&String> = handles.iter().collect::<BTreeSet<_>>().into_iter().collect();

        let conn = self.conn.lock().unwrap();
        let mut records = Vec::new();
        for chunk in distinct.chunks(HANDLES_PER_QUERY) {
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let mut stmt = conn.prepare(&format!(
                "SELECT {COLUMNS} FROM accounts WHERE handle IN ({placeholders}) ORDER BY handle"
            ))?;
            let rows = stmt.query_map(params_from_iter(chunk.iter()), Self::read_row)?;
            records.extend(Self::collect_rows(rows)?);
        }
        Ok(records)
    }

    fn upsert_account(&self, account: &NewAccount) -> StorageResult<IdentityRecord> {
        let conn = self.conn.lock().unwrap();
        let row = conn.query_row(
            &format!(
                r#"
                INSERT INTO accounts (id, handle, iri, url, name, actor_type, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(iri) DO UPDATE SET
                    handle = excluded.handle,
                    url = excluded.url,
                    name = excluded.name,
                    actor_type = excluded.actor_type,
                    updated_at = excluded.updated_at
                RETURNING {COLUMNS}
                "#
            ),
            params![
                Uuid::new_v4().to_string(),
                account.handle,
                account.iri,
                account.url,
                account.name,
                account.actor_type.as_str(),
                Utc::now().to_rfc3339(),
            ],
            Self::read_row,
        );

        match row {
            Ok(row) => Self::row_to_record(row),
            // The IRI conflict is absorbed by the upsert, so a remaining
            // constraint failure is the handle column.
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StorageError::HandleTaken(account.handle.clone()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn load_account(&self, id: &str) -> StorageResult<Option<IdentityRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM accounts WHERE id = ?1"),
                params![id],
                Self::read_row,
            )
            .optional()?;
        row.map(Self::row_to_record).transpose()
    }

    fn load_account_by_iri(&self, iri: &str) -> StorageResult<Option<IdentityRecord>> {
        let conn = self.conn.lock().unwrap();
        let row = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM accounts WHERE iri = ?1"),
                params![iri],
                Self::read_row,
            )
            .optional()?;
        row.map(Self::row_to_record).transpose()
    }

    fn list_accounts(&self) -> StorageResult<Vec<IdentityRecord>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM accounts ORDER BY handle"))?;
        let rows = stmt.query_map([], Self::read_row)?;
        Self::collect_rows(rows)
    }
}
