//! SQLite message repository implementation.
//!
//! Implements `MessageRepository` from `palaver-core` using sqlx with split
//! read/write pools. Stores both the filtered and the original content so
//! retrieval can serve either.

use palaver_core::repository::message::MessageRepository;
use palaver_types::error::RepositoryError;
use palaver_types::message::{ChatMessage, MessageFilter, NewMessage, Sender};
use chrono::{DateTime, Utc};
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `MessageRepository`.
pub struct SqliteMessageRepository {
    pool: DatabasePool,
}

impl SqliteMessageRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Internal row type
// ---------------------------------------------------------------------------

struct ChatMessageRow {
    id: i64,
    message_id: String,
    session_id: String,
    content: String,
    original_content: String,
    has_inappropriate_content: i64,
    timestamp: String,
    sender: String,
    message_length: i64,
    word_count: i64,
    created_at: String,
    updated_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            message_id: row.try_get("message_id")?,
            session_id: row.try_get("session_id")?,
            content: row.try_get("content")?,
            original_content: row.try_get("original_content")?,
            has_inappropriate_content: row.try_get("has_inappropriate_content")?,
            timestamp: row.try_get("timestamp")?,
            sender: row.try_get("sender")?,
            message_length: row.try_get("message_length")?,
            word_count: row.try_get("word_count")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let sender = self
            .sender
            .parse::<Sender>()
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(ChatMessage {
            id: self.id,
            message_id: self.message_id,
            session_id: self.session_id,
            content: self.content,
            original_content: self.original_content,
            has_inappropriate_content: self.has_inappropriate_content != 0,
            timestamp: parse_datetime(&self.timestamp)?,
            sender,
            message_length: self.message_length as u32,
            word_count: self.word_count as u32,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn rows_into_messages(
    rows: &[sqlx::sqlite::SqliteRow],
) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut messages = Vec::with_capacity(rows.len());
    for row in rows {
        let r = ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
        messages.push(r.into_message()?);
    }
    Ok(messages)
}

// ---------------------------------------------------------------------------
// MessageRepository impl
// ---------------------------------------------------------------------------

impl MessageRepository for SqliteMessageRepository {
    async fn create(&self, message: &NewMessage) -> Result<ChatMessage, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"INSERT INTO messages
               (message_id, session_id, content, original_content,
                has_inappropriate_content, timestamp, sender, message_length,
                word_count, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&message.message_id)
        .bind(&message.session_id)
        .bind(&message.content)
        .bind(&message.original_content)
        .bind(message.has_inappropriate_content as i64)
        .bind(format_datetime(&message.timestamp))
        .bind(message.sender.to_string())
        .bind(message.message_length as i64)
        .bind(message.word_count as i64)
        .bind(format_datetime(&now))
        .bind(format_datetime(&now))
        .execute(&self.pool.writer)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.message().contains("UNIQUE") => {
                return Err(RepositoryError::Conflict(format!(
                    "message_id '{}' already exists",
                    message.message_id
                )));
            }
            Err(e) => return Err(RepositoryError::Query(e.to_string())),
        };

        Ok(ChatMessage {
            id: result.last_insert_rowid(),
            message_id: message.message_id.clone(),
            session_id: message.session_id.clone(),
            content: message.content.clone(),
            original_content: message.original_content.clone(),
            has_inappropriate_content: message.has_inappropriate_content,
            timestamp: message.timestamp,
            sender: message.sender,
            message_length: message.message_length,
            word_count: message.word_count,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = ChatMessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_message_id(
        &self,
        message_id: &str,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM messages WHERE message_id = ?")
            .bind(message_id)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let r = ChatMessageRow::from_row(&row)
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(r.into_message()?))
            }
            None => Ok(None),
        }
    }

    async fn get_by_session(
        &self,
        session_id: &str,
        filter: &MessageFilter,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let mut sql = String::from("SELECT * FROM messages WHERE session_id = ?");

        // Sender values come from a closed enum, never from raw input.
        if let Some(sender) = filter.sender {
            sql.push_str(&format!(" AND sender = '{sender}'"));
        }

        // Newest first; id breaks ties between equal timestamps.
        sql.push_str(" ORDER BY timestamp DESC, id DESC");
        sql.push_str(&format!(" LIMIT {} OFFSET {}", filter.limit, filter.offset));

        let rows = sqlx::query(&sql)
            .bind(session_id)
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_into_messages(&rows)
    }

    async fn count_by_session(
        &self,
        session_id: &str,
        sender: Option<Sender>,
    ) -> Result<i64, RepositoryError> {
        let mut sql = String::from("SELECT COUNT(*) as cnt FROM messages WHERE session_id = ?");
        if let Some(sender) = sender {
            sql.push_str(&format!(" AND sender = '{sender}'"));
        }

        let row = sqlx::query(&sql)
            .bind(session_id)
            .fetch_one(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        row.try_get("cnt")
            .map_err(|e| RepositoryError::Query(e.to_string()))
    }

    async fn get_recent(&self, limit: i64) -> Result<Vec<ChatMessage>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM messages ORDER BY created_at DESC, id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows_into_messages(&rows)
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM messages WHERE id = ?")
            .bind(id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_messages(&self) -> Result<i64, RepositoryError> {
        count_query(&self.pool, "SELECT COUNT(*) as cnt FROM messages").await
    }

    async fn count_sessions(&self) -> Result<i64, RepositoryError> {
        count_query(
            &self.pool,
            "SELECT COUNT(DISTINCT session_id) as cnt FROM messages",
        )
        .await
    }

    async fn count_flagged(&self) -> Result<i64, RepositoryError> {
        count_query(
            &self.pool,
            "SELECT COUNT(*) as cnt FROM messages WHERE has_inappropriate_content = 1",
        )
        .await
    }
}

async fn count_query(pool: &DatabasePool, sql: &str) -> Result<i64, RepositoryError> {
    let row = sqlx::query(sql)
        .fetch_one(&pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

    row.try_get("cnt")
        .map_err(|e| RepositoryError::Query(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
