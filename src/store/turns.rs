//! Durable keyed log of sessions and their turns.
//!
//! `TurnStore` is the single owner of durable turn data. Each session id maps
//! to an append-only, ordered sequence of turns; ordering is the insertion
//! order (`turn_id` rowid). There is no compaction, no eviction, and no
//! deletion. One writer per process is assumed; WAL mode plus the busy
//! timeout keep a concurrent process from corrupting the file, but
//! cross-process write ordering is undefined.

use std::path::Path;

use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use tracing::{debug, warn};

use crate::session::types::{Role, Turn};
use crate::store::error::{Result, StoreError};
use crate::store::pool::DatabasePool;

/// SQLite-backed turn store over the `agent_sessions`/`agent_turns` tables.
pub struct TurnStore {
    pool: DatabasePool,
}

impl TurnStore {
    /// Opens the store at `db_path`, creating file and schema if missing.
    pub async fn open(db_path: &Path) -> Result<Self> {
        let pool = DatabasePool::open(db_path).await?;
        Ok(Self { pool })
    }

    /// Wraps an already-open pool. Used by tests that need raw access.
    pub fn with_pool(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Durably records `turn` as the next element of `session_id`'s sequence,
    /// creating the session record if absent.
    pub async fn append(&self, session_id: &str, turn: &Turn) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query("INSERT OR IGNORE INTO agent_sessions (session_id, created_at) VALUES (?, ?)")
            .bind(session_id)
            .bind(&now)
            .execute(&self.pool.writer)
            .await?;

        sqlx::query(
            "INSERT INTO agent_turns (session_id, role, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(session_id)
        .bind(turn.role.as_str())
        .bind(&turn.content)
        .bind(&now)
        .execute(&self.pool.writer)
        .await?;

        debug!(session_id = %session_id, role = %turn.role, "Appended turn");
        Ok(())
    }

    /// Returns the full ordered turn sequence for `session_id`, or `None` if
    /// the id is unknown (not an error).
    ///
    /// Rows that cannot be decoded are skipped individually with a warning;
    /// a session whose rows are all malformed comes back as an empty
    /// sequence and the caller decides the fallback.
    pub async fn read(&self, session_id: &str) -> Result<Option<Vec<Turn>>> {
        let exists = sqlx::query("SELECT 1 FROM agent_sessions WHERE session_id = ?")
            .bind(session_id)
            .fetch_optional(&self.pool.reader)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let rows = sqlx::query(
            "SELECT role, content FROM agent_turns WHERE session_id = ? ORDER BY turn_id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            match decode_turn(row, session_id) {
                Ok(turn) => turns.push(turn),
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "Skipping malformed turn row");
                }
            }
        }

        debug!(
            session_id = %session_id,
            turn_count = turns.len(),
            "Read session turns"
        );
        Ok(Some(turns))
    }

    /// Returns all known session ids, in no guaranteed order.
    pub async fn list_session_ids(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT session_id FROM agent_sessions")
            .fetch_all(&self.pool.reader)
            .await?;

        rows.iter()
            .map(|row| row.try_get::<String, _>("session_id").map_err(StoreError::from))
            .collect()
    }

    /// Raw writer handle for tests that fabricate rows.
    #[cfg(test)]
    pub(crate) fn writer(&self) -> &sqlx::SqlitePool {
        &self.pool.writer
    }
}

fn decode_turn(row: &SqliteRow, session_id: &str) -> Result<Turn> {
    let role: Option<String> = row.try_get("role")?;
    let content: Option<String> = row.try_get("content")?;

    let role = role.ok_or_else(|| StoreError::malformed_turn(session_id, "role is NULL"))?;
    let content = content.ok_or_else(|| StoreError::malformed_turn(session_id, "content is NULL"))?;

    Ok(Turn::new(Role::parse_lossy(&role), content))
}
