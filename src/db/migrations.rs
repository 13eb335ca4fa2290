use rusqlite::{Connection, OptionalExtension};
use tracing::info;

use super::schema::{CREATE_TABLES, SCHEMA_VERSION};

/// Säkerställ att schemat finns (idempotent)
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    let current_version = get_current_version(conn)?;

    if current_version >= SCHEMA_VERSION {
        info!("Databas är uppdaterad (version {})", current_version);
        return Ok(());
    }

    let legacy_rows = count_legacy_rows(conn)?;
    initial_setup(conn)?;

    match legacy_rows {
        Some(rows) => info!("Tog över befintlig problems-tabell med {} ärenden", rows),
        None => info!("Skapade ny databas med schema version {}", SCHEMA_VERSION),
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> rusqlite::Result<i32> {
    // Kontrollera om schema_migrations-tabellen finns
    if !table_exists(conn, "schema_migrations")? {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .optional()?
        .flatten();

    Ok(version.unwrap_or(0))
}

/// Databaser från tidigare versioner har tabellen men ingen versionshistorik
fn count_legacy_rows(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    if !table_exists(conn, "problems")? {
        return Ok(None);
    }

    conn.query_row("SELECT COUNT(*) FROM problems", [], |row| row.get(0))
        .map(Some)
}

fn table_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name=?)",
        [name],
        |row| row.get(0),
    )
}

fn initial_setup(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(CREATE_TABLES)?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_migrations (version) VALUES (?)",
        [SCHEMA_VERSION],
    )?;

    Ok(())
}
