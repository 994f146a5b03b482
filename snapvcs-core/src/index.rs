use crate::error::Result;
use crate::models::{FileStatus, TrackedFile};
use crate::registry::TrackedFileRegistry;
use chrono::DateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const SCHEMA_VERSION: i32 = 1;

/// Persists the tracked-file registry between process runs.
pub struct Index {
    conn: Connection,
}

impl Index {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let mut index = Self { conn };
        index.initialize()?;
        Ok(index)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut index = Self { conn };
        index.initialize()?;
        Ok(index)
    }

    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_version (
                version INTEGER PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS tracked_files (
                name TEXT PRIMARY KEY,
                status TEXT NOT NULL,
                tracked_at TEXT NOT NULL
            );
            "#,
        )?;

        let version: Option<i32> = self
            .conn
            .query_row("SELECT version FROM schema_version", [], |row| row.get(0))
            .optional()?;

        if version.is_none() {
            self.conn.execute(
                "INSERT INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )?;
        }

        Ok(())
    }

    pub fn load(&self) -> Result<TrackedFileRegistry> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, status, tracked_at FROM tracked_files ORDER BY name")?;

        let files = stmt
            .query_map([], tracked_file_from_row)?
            .collect::<rusqlite::Result<Vec<TrackedFile>>>()?;

        Ok(TrackedFileRegistry::from_files(files))
    }

    /// Replace the stored registry with `registry` in one transaction.
    pub fn save(&mut self, registry: &TrackedFileRegistry) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM tracked_files", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO tracked_files (name, status, tracked_at) VALUES (?1, ?2, ?3)",
            )?;
            for file in registry.files() {
                stmt.execute(params![
                    file.name,
                    file.status.to_string(),
                    file.tracked_at.to_rfc3339(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

fn tracked_file_from_row(row: &Row) -> rusqlite::Result<TrackedFile> {
    let name: String = row.get(0)?;
    let status: String = row.get(1)?;
    let tracked_at: String = row.get(2)?;

    let status = FileStatus::parse(&status).ok_or_else(|| invalid_column(1, &status))?;
    let tracked_at = DateTime::parse_from_rfc3339(&tracked_at)
        .map_err(|_| invalid_column(2, &tracked_at))?
        .into();

    Ok(TrackedFile {
        name,
        status,
        tracked_at,
    })
}

fn invalid_column(index: usize, value: &str) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        format!("unexpected index value {:?}", value).into(),
    )
}
