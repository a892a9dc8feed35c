//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the EndpointStore trait.
//! The single connection lives behind a mutex so one `SqliteStorage` can be
//! shared by every in-flight search.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{EndpointStore, StorageError, StorageResult};
use crate::storage::{Host, HostTransaction, PageMatch, PendingWrite};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Opens or creates the database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn host_from_row(row: &Row<'_>) -> rusqlite::Result<Host> {
    Ok(Host {
        id: row.get(0)?,
        name: row.get(1)?,
        is_searchable: row.get(2)?,
        created_at: row.get(3)?,
    })
}

fn page_from_row(row: &Row<'_>) -> rusqlite::Result<PageMatch> {
    Ok(PageMatch {
        path: row.get(0)?,
        title: row.get(1)?,
    })
}

/// Inserts an endpoint unless `(host, path)` is already known; titles are never overwritten
fn insert_endpoint(conn: &Connection, host_id: i64, path: &str, title: &str) -> StorageResult<usize> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO endpoints (host_id, name, title) VALUES (?1, ?2, ?3)",
        params![host_id, path, title],
    )?;
    Ok(inserted)
}

impl EndpointStore for SqliteStorage {
    // ===== Hosts =====

    fn list_hosts(&self) -> StorageResult<Vec<Host>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, is_searchable, created_at FROM hosts ORDER BY id")?;

        let hosts = stmt
            .query_map([], host_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hosts)
    }

    fn get_host(&self, name: &str) -> StorageResult<Option<Host>> {
        let conn = self.lock()?;
        let host = conn
            .query_row(
                "SELECT id, name, is_searchable, created_at FROM hosts WHERE name = ?1",
                params![name],
                host_from_row,
            )
            .optional()?;

        Ok(host)
    }

    fn create_host(&self, name: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO hosts (name, is_searchable, created_at) VALUES (?1, 0, ?2)",
            params![name, now],
        )?;
        Ok(inserted > 0)
    }

    fn mark_host_searchable(&self, host: &Host) -> StorageResult<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE hosts SET is_searchable = 1 WHERE id = ?1",
            params![host.id],
        )?;

        if updated == 0 {
            return Err(StorageError::HostNotFound(host.name.clone()));
        }
        Ok(())
    }

    // ===== Endpoints =====

    fn get_confirmed_endpoints(&self, host: &Host, phrase: &str) -> StorageResult<Vec<PageMatch>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT e.name, e.title FROM endpoints e
             INNER JOIN endpoint_phrases ep ON ep.endpoint_id = e.id
             INNER JOIN phrases p ON p.id = ep.phrase_id
             WHERE e.host_id = ?1 AND p.name = ?2
             ORDER BY e.id",
        )?;

        let pages = stmt
            .query_map(params![host.id, phrase], page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn get_unconfirmed_endpoints(&self, host: &Host, phrase: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT e.name FROM endpoints e
             WHERE e.host_id = ?1 AND NOT EXISTS (
                 SELECT 1 FROM endpoint_phrases ep
                 INNER JOIN phrases p ON p.id = ep.phrase_id
                 WHERE ep.endpoint_id = e.id AND p.name = ?2
             )
             ORDER BY e.id",
        )?;

        let paths = stmt
            .query_map(params![host.id, phrase], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(paths)
    }

    fn partition_endpoints(
        &self,
        host: &Host,
        phrase: &str,
    ) -> StorageResult<(Vec<PageMatch>, Vec<String>)> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT e.name, e.title, EXISTS (
                 SELECT 1 FROM endpoint_phrases ep
                 INNER JOIN phrases p ON p.id = ep.phrase_id
                 WHERE ep.endpoint_id = e.id AND p.name = ?2
             )
             FROM endpoints e
             WHERE e.host_id = ?1
             ORDER BY e.id",
        )?;

        let rows = stmt.query_map(params![host.id, phrase], |row| {
            Ok((page_from_row(row)?, row.get::<_, bool>(2)?))
        })?;

        let mut confirmed = Vec::new();
        let mut unconfirmed = Vec::new();
        for row in rows {
            let (page, is_confirmed) = row?;
            if is_confirmed {
                confirmed.push(page);
            } else {
                unconfirmed.push(page.path);
            }
        }

        Ok((confirmed, unconfirmed))
    }

    fn endpoint_exists(&self, host: &Host, path: &str) -> StorageResult<bool> {
        let conn = self.lock()?;
        let exists = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM endpoints WHERE host_id = ?1 AND name = ?2)",
            params![host.id, path],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn list_endpoints(&self, host: &Host) -> StorageResult<Vec<PageMatch>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT name, title FROM endpoints WHERE host_id = ?1 ORDER BY id")?;

        let pages = stmt
            .query_map(params![host.id], page_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(pages)
    }

    fn list_endpoint_phrases(&self, host: &Host, path: &str) -> StorageResult<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT p.name FROM phrases p
             INNER JOIN endpoint_phrases ep ON ep.phrase_id = p.id
             INNER JOIN endpoints e ON e.id = ep.endpoint_id
             WHERE e.host_id = ?1 AND e.name = ?2
             ORDER BY p.name",
        )?;

        let phrases = stmt
            .query_map(params![host.id, path], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(phrases)
    }

    // ===== Writes =====

    fn commit(&self, batch: HostTransaction) -> StorageResult<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let host_id = batch.host_id();
        let mut inserted = 0;

        for write in batch.writes() {
            match write {
                PendingWrite::Endpoint { path, title } => {
                    inserted += insert_endpoint(&tx, host_id, path, title)?;
                }
                PendingWrite::Confirmation {
                    path,
                    phrase,
                    title,
                } => {
                    inserted += insert_endpoint(&tx, host_id, path, title)?;
                    tx.execute(
                        "INSERT OR IGNORE INTO phrases (name) VALUES (?1)",
                        params![phrase],
                    )?;
                    tx.execute(
                        "INSERT OR IGNORE INTO endpoint_phrases (endpoint_id, phrase_id)
                         SELECT e.id, p.id FROM endpoints e, phrases p
                         WHERE e.host_id = ?1 AND e.name = ?2 AND p.name = ?3",
                        params![host_id, path, phrase],
                    )?;
                }
            }
        }

        tx.commit()?;
        tracing::debug!(
            "Committed {} writes for {} ({} new endpoints)",
            batch.len(),
            batch.host_name(),
            inserted
        );

        Ok(inserted)
    }
}
