/// SQL-schema för ärendeloggen
/// Tabellen `problems` har samma form som tidigare versioner av programmet
/// så att befintliga databasfiler kan öppnas direkt.

pub const SCHEMA_VERSION: i32 = 1;

pub const CREATE_TABLES: &str = r#"
-- Ärenden (AUTOINCREMENT: ID återanvänds aldrig)
CREATE TABLE IF NOT EXISTS problems (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT,
    subject TEXT,
    problem TEXT,
    solution TEXT
);

-- Schemaversion
CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

/// Kolumner i den ordning de exporteras och läses
pub const PROBLEM_COLUMNS: &str = "id, date, subject, problem, solution";
