use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rusqlite::{Connection, params};

use super::session::{ChatMessage, Role};
use crate::error::AppError;

/// One stored message with the session it belongs to
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StoredMessage {
    pub(crate) session_id: String,
    pub(crate) provider: String,
    pub(crate) message: ChatMessage,
}

/// Append-only chat transcript in SQLite
pub(crate) struct HistoryStore {
    conn: Connection,
    path: PathBuf,
}

impl HistoryStore {
    /// Open (or create) the database at `path`, creating parent folders
    pub(crate) fn open(path: &Path) -> Result<Self, AppError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|source| AppError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                session_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                role TEXT NOT NULL,
                provider TEXT NOT NULL,
                content TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);",
        )?;
        tracing::debug!(path = %path.display(), "opened chat history store");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn append(
        &self,
        session_id: &str,
        provider: &str,
        message: &ChatMessage,
    ) -> Result<(), AppError> {
        self.conn
            .prepare_cached(
                "INSERT INTO messages (session_id, timestamp, role, provider, content)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?
            .execute(params![
                session_id,
                message.timestamp,
                message.role.as_str(),
                provider,
                message.content,
            ])?;
        Ok(())
    }

    /// Latest `limit` messages from sessions other than `current_session`, oldest first
    pub(crate) fn earlier(
        &self,
        current_session: &str,
        limit: usize,
    ) -> Result<Vec<StoredMessage>, AppError> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT session_id, timestamp, role, provider, content
             FROM messages WHERE session_id <> ?1 ORDER BY id DESC LIMIT ?2",
        )?;
        let mut rows = stmt
            .query_map(params![current_session, limit as i64], |row| {
                let role: String = row.get(2)?;
                let timestamp: NaiveDateTime = row.get(1)?;
                Ok(StoredMessage {
                    session_id: row.get(0)?,
                    provider: row.get(3)?,
                    message: ChatMessage {
                        role: Role::parse(&role),
                        content: row.get(4)?,
                        timestamp,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        rows.reverse();
        Ok(rows)
    }

    pub(crate) fn session_count(&self) -> Result<usize, AppError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT session_id) FROM messages",
            [],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}
