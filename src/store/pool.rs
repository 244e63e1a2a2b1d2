//! Database pool with split reader/writer connections in WAL mode.
//!
//! SQLite allows only one writer at a time. `DatabasePool` keeps a
//! single-connection writer pool for serialized INSERTs and a small
//! read-only pool for SELECTs. The schema is bootstrapped on the writer
//! before the read-only pool opens.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::debug;

use crate::store::error::{Result, StoreError};

/// Statements run once at open. `content` and `role` are deliberately
/// nullable: rows written by other tooling may lack them, and the read path
/// skips such rows instead of failing the whole load.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS agent_sessions (
        session_id TEXT PRIMARY KEY,
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS agent_turns (
        turn_id INTEGER PRIMARY KEY AUTOINCREMENT,
        session_id TEXT NOT NULL REFERENCES agent_sessions(session_id),
        role TEXT,
        content TEXT,
        created_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_agent_turns_session
        ON agent_turns(session_id)",
];

/// Split read/write pool for the session database.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Opens (creating if missing) the database at `db_path`.
    ///
    /// Both pools use WAL journal mode, foreign key enforcement, and a
    /// 5-second busy timeout. Parent directories are created as needed so a
    /// default path like `tmp/agent_storage.db` works from a fresh checkout.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::unavailable(format!("{}: {e}", parent.display())))?;
            }
        }

        let base_opts = SqliteConnectOptions::new()
            .filename(db_path)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
            .busy_timeout(std::time::Duration::from_secs(5))
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(base_opts.clone())
            .await?;

        for stmt in SCHEMA {
            sqlx::query(stmt).execute(&writer).await?;
        }

        let reader = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(base_opts.read_only(true))
            .await?;

        debug!(db_path = %db_path.display(), "Opened session database");
        Ok(Self { reader, writer })
    }
}
