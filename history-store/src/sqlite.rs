//! SQLite-backed history log.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::errors::HistoryError;
use crate::record::HistoryRecord;
use crate::store::HistoryStore;

/// History log in a single SQLite table.
///
/// One connection guarded by a mutex; all calls block, so async callers
/// should run them on `spawn_blocking`.
pub struct SqliteHistoryStore {
    conn: Mutex<Connection>,
}

impl SqliteHistoryStore {
    /// Opens (or creates) the database file and ensures the schema exists.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::setup_db(&conn)?;
        info!(path = %db_path.display(), "history store opened");
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Private in-memory database; contents vanish on drop.
    pub fn open_in_memory() -> Result<Self, HistoryError> {
        let conn = Connection::open_in_memory()?;
        Self::setup_db(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn setup_db(conn: &Connection) -> rusqlite::Result<()> {
        // journal_mode answers with the resulting mode ("memory" for in-memory dbs)
        let mode: String = conn.query_row("PRAGMA journal_mode=WAL", [], |row| row.get(0))?;
        debug!(journal_mode = %mode, "history journal mode");
        conn.execute_batch(
            "
            PRAGMA synchronous=NORMAL;
            CREATE TABLE IF NOT EXISTS chat_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                question TEXT NOT NULL,
                answer TEXT NOT NULL
            );
        ",
        )
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, HistoryError> {
        self.conn.lock().map_err(|_| HistoryError::Poisoned)
    }
}

impl HistoryStore for SqliteHistoryStore {
    fn append(&self, question: &str, answer: &str) -> Result<i64, HistoryError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO chat_history (question, answer) VALUES (?1, ?2)",
            params![question, answer],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "history record appended");
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<HistoryRecord>, HistoryError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, question, answer FROM chat_history ORDER BY id DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok(HistoryRecord {
                id: row.get(0)?,
                question: row.get(1)?,
                answer: row.get(2)?,
            })
        })?;
        let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!(count = records.len(), "history listed");
        Ok(records)
    }

    fn clear_all(&self) -> Result<usize, HistoryError> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM chat_history", [])?;
        info!(deleted, "history cleared");
        Ok(deleted)
    }
}
