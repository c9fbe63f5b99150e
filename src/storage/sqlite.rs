//! SQLite database layer

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;
use uuid::Uuid;

use crate::catalog::{CatalogProvider, PackageEntry, validate_batch};
use crate::error::{PackError, Result};
use crate::storage::migrations;

/// SQLite-backed package catalog.
///
/// The connection sits behind a mutex so the catalog can be shared across
/// threads; every operation holds it for its whole duration.
pub struct Database {
    conn: Mutex<Connection>,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

const SELECT_COLUMNS: &str = "SELECT id, size, created_at FROM packages";

/// Raw column values before conversion to [`PackageEntry`].
type PackageRow = (String, i64, String);

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema_version,
        })
    }

    /// Current schema version after migrations.
    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    #[cfg(test)]
    fn journal_mode(&self) -> Result<String> {
        let conn = self.conn.lock();
        Ok(conn.query_row("PRAGMA journal_mode;", [], |row| row.get(0))?)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -8000;
             PRAGMA temp_store = MEMORY;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )?;
        Ok(())
    }

    fn fetch(conn: &Connection, id: Uuid) -> Result<Option<PackageEntry>> {
        let row: Option<PackageRow> = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;
        row.map(entry_from_row).transpose()
    }

    fn insert(conn: &Connection, entry: &PackageEntry) -> Result<()> {
        conn.execute(
            "INSERT INTO packages (id, size, created_at) VALUES (?1, ?2, ?3)",
            params![
                entry.id.to_string(),
                i64::from(entry.size),
                entry.created_at.to_rfc3339()
            ],
        )
        .map_err(|err| map_unique_violation(err, entry.size))?;
        Ok(())
    }
}

impl CatalogProvider for Database {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn create(&self, size: u32) -> Result<PackageEntry> {
        validate_batch(&[size])?;
        let entry = PackageEntry::new(size);
        Self::insert(&self.conn.lock(), &entry)?;
        info!(id = %entry.id, size, "package created");
        Ok(entry)
    }

    fn create_many(&self, sizes: &[u32]) -> Result<Vec<PackageEntry>> {
        validate_batch(sizes)?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let mut created = Vec::with_capacity(sizes.len());
        for &size in sizes {
            let entry = PackageEntry::new(size);
            Self::insert(&tx, &entry)?;
            created.push(entry);
        }
        tx.commit()?;
        info!(count = created.len(), "packages created");
        Ok(created)
    }

    fn get(&self, id: Uuid) -> Result<PackageEntry> {
        Self::fetch(&self.conn.lock(), id)?
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))
    }

    fn update(&self, id: Uuid, size: u32) -> Result<PackageEntry> {
        validate_batch(&[size])?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let changed = tx
            .execute(
                "UPDATE packages SET size = ?1 WHERE id = ?2",
                params![i64::from(size), id.to_string()],
            )
            .map_err(|err| map_unique_violation(err, size))?;
        if changed == 0 {
            return Err(PackError::PackageNotFound(id.to_string()));
        }
        let entry = Self::fetch(&tx, id)?
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))?;
        tx.commit()?;
        info!(%id, size, "package updated");
        Ok(entry)
    }

    fn delete(&self, id: Uuid) -> Result<PackageEntry> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let entry = Self::fetch(&tx, id)?
            .ok_or_else(|| PackError::PackageNotFound(id.to_string()))?;
        tx.execute("DELETE FROM packages WHERE id = ?1", [id.to_string()])?;
        tx.commit()?;
        info!(%id, size = entry.size, "package removed");
        Ok(entry)
    }

    fn list(&self) -> Result<Vec<PackageEntry>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY rowid"))?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?;
        let mut results = Vec::new();
        for row in rows {
            results.push(entry_from_row(row?)?);
        }
        Ok(results)
    }

    fn sizes_descending(&self) -> Result<Vec<u32>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT size FROM packages ORDER BY size DESC")?;
        let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;
        let mut sizes = Vec::new();
        for size in rows {
            let size = size?;
            sizes.push(u32::try_from(size).map_err(|_| PackError::InvalidSize(size))?);
        }
        Ok(sizes)
    }

    fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .lock()
            .query_row("SELECT count(*) FROM packages", [], |row| row.get(0))?;
        usize::try_from(count).map_err(|err| PackError::Internal(err.to_string()))
    }
}

fn entry_from_row((id, size, created_at): PackageRow) -> Result<PackageEntry> {
    let id = Uuid::parse_str(&id)
        .map_err(|err| PackError::Serialization(format!("stored package id {id}: {err}")))?;
    let size = u32::try_from(size).map_err(|_| PackError::InvalidSize(size))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|err| {
            PackError::Serialization(format!("stored timestamp {created_at}: {err}"))
        })?
        .with_timezone(&Utc);
    Ok(PackageEntry {
        id,
        size,
        created_at,
    })
}

fn map_unique_violation(err: rusqlite::Error, size: u32) -> PackError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            PackError::DuplicateSize(size)
        }
        _ => PackError::Database(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DEFAULT_SIZES;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation_and_schema_version() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("catalog.db");
        let db = Database::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(db.schema_version(), migrations::SCHEMA_VERSION);
    }

    #[test]
    fn test_wal_mode_enabled() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("catalog.db")).unwrap();
        assert_eq!(db.journal_mode().unwrap().to_lowercase(), "wal");
    }

    #[test]
    fn test_create_and_get() {
        let db = Database::open_in_memory().unwrap();
        let created = db.create(250).unwrap();
        let fetched = db.get(created.id).unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.size, 250);
        assert_eq!(fetched.created_at.timestamp(), created.created_at.timestamp());
    }

    #[test]
    fn test_duplicate_size_maps_to_error() {
        let db = Database::open_in_memory().unwrap();
        db.create(500).unwrap();
        assert!(matches!(db.create(500), Err(PackError::DuplicateSize(500))));
        assert_eq!(db.len().unwrap(), 1);
    }

    #[test]
    fn test_create_many_rolls_back_on_conflict() {
        let db = Database::open_in_memory().unwrap();
        db.create(1000).unwrap();
        let err = db.create_many(&[250, 500, 1000]).unwrap_err();
        assert!(matches!(err, PackError::DuplicateSize(1000)));
        assert_eq!(db.sizes_descending().unwrap(), vec![1000]);
    }

    #[test]
    fn test_list_insertion_order_and_sorted_snapshot() {
        let db = Database::open_in_memory().unwrap();
        db.create_many(&DEFAULT_SIZES).unwrap();
        let listed: Vec<u32> = db.list().unwrap().iter().map(|e| e.size).collect();
        assert_eq!(listed, DEFAULT_SIZES.to_vec());
        assert_eq!(db.sizes_descending().unwrap(), vec![5000, 2000, 1000, 500, 250]);
    }

    #[test]
    fn test_update_enforces_uniqueness() {
        let db = Database::open_in_memory().unwrap();
        let small = db.create(250).unwrap();
        db.create(500).unwrap();

        assert!(matches!(db.update(small.id, 500), Err(PackError::DuplicateSize(500))));
        assert_eq!(db.update(small.id, 750).unwrap().size, 750);
        assert_eq!(db.get(small.id).unwrap().size, 750);
    }

    #[test]
    fn test_unknown_ids_are_not_found() {
        let db = Database::open_in_memory().unwrap();
        let id = Uuid::new_v4();
        assert!(matches!(db.get(id), Err(PackError::PackageNotFound(_))));
        assert!(matches!(db.update(id, 10), Err(PackError::PackageNotFound(_))));
        assert!(matches!(db.delete(id), Err(PackError::PackageNotFound(_))));
    }

    #[test]
    fn test_delete_returns_removed_entry() {
        let db = Database::open_in_memory().unwrap();
        let entry = db.create(250).unwrap();
        assert_eq!(db.delete(entry.id).unwrap().size, 250);
        assert_eq!(db.len().unwrap(), 0);
    }

    #[test]
    fn test_reopen_keeps_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catalog.db");
        {
            let db = Database::open(&path).unwrap();
            db.create_many(&[250, 500]).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.sizes_descending().unwrap(), vec![500, 250]);
    }
}
