//! Database migrations

use rusqlite::Connection;

use crate::error::{PackError, Result};

const MIGRATIONS: [&str; 1] = [include_str!("../../migrations/001_create_packages.sql")];

#[allow(clippy::cast_possible_truncation)]
pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Run all pending migrations, tracking progress in `PRAGMA user_version`.
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .map_err(|err| PackError::Migration(err.to_string()))?;

    if current_version > SCHEMA_VERSION {
        return Err(PackError::Migration(format!(
            "database schema version {current_version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    for (target_version, sql) in (1..).zip(MIGRATIONS.iter()) {
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql).map_err(|err| {
            PackError::Migration(format!("migration {target_version} failed: {err}"))
        })?;
        conn.pragma_update(None, "user_version", target_version)
            .map_err(|err| {
                PackError::Migration(format!("failed to set user_version {target_version}: {err}"))
            })?;
    }

    Ok(SCHEMA_VERSION)
}
