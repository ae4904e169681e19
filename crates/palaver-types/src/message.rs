//! Chat message types for Palaver.
//!
//! These types model the ingestion and retrieval surface: the processed
//! message heading into the store, the persisted record coming back out,
//! and the filter/page values used by session queries and search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Origin of a chat message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'system'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    System,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::System => write!(f, "system"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Sender::User),
            "system" => Ok(Sender::System),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A fully processed message, ready for persistence.
///
/// Produced by the ingestion pipeline after validation, content filtering,
/// stats computation, and sanitization. The store assigns the numeric key
/// and the `created_at`/`updated_at` timestamps on insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewMessage {
    pub message_id: String,
    pub session_id: String,
    /// Post-filter text; denylist matches are masked with `*`.
    pub content: String,
    /// Pre-filter text as submitted (trimmed).
    pub original_content: String,
    pub has_inappropriate_content: bool,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    /// Character count of `content` (Unicode code points, not bytes).
    pub message_length: u32,
    /// Count of maximal word-character runs in `content`.
    pub word_count: u32,
}

/// A persisted chat message as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Store-assigned numeric key.
    pub id: i64,
    pub message_id: String,
    pub session_id: String,
    pub content: String,
    pub original_content: String,
    pub has_inappropriate_content: bool,
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    pub message_length: u32,
    pub word_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filter criteria for session-scoped message queries.
///
/// Always constructed explicitly; `Default` gives the canonical
/// no-sender / limit 50 / offset 0 filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageFilter {
    /// Restrict to a single sender; `None` returns both.
    pub sender: Option<Sender>,
    /// Page size, 1 to [`MessageFilter::MAX_LIMIT`].
    pub limit: i64,
    /// Number of messages to skip, >= 0.
    pub offset: i64,
}

impl MessageFilter {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;
}

impl Default for MessageFilter {
    fn default() -> Self {
        Self {
            sender: None,
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// One page of an ordered result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePage {
    pub messages: Vec<ChatMessage>,
    /// Total matching messages, ignoring limit/offset.
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

impl MessagePage {
    /// Build a page, deriving `has_more` from `total > offset + limit`.
    pub fn new(messages: Vec<ChatMessage>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            messages,
            total,
            limit,
            offset,
            has_more: total > offset + limit,
        }
    }
}

/// Successful retrieval outcome: an informational status line plus the page.
///
/// The `message` text distinguishes empty results from populated ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult {
    pub message: String,
    pub page: MessagePage,
}

/// Aggregate storage counters for dashboards and health reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StoreStats {
    pub total_messages: i64,
    pub total_sessions: i64,
    /// Messages the content filter masked.
    pub flagged_messages: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sender_roundtrip() {
        for sender in [Sender::User, Sender::System] {
            let s = sender.to_string();
            let parsed: Sender = s.parse().unwrap();
            assert_eq!(sender, parsed);
        }
    }

    #[test]
    fn test_sender_rejects_unknown() {
        assert!("assistant".parse::<Sender>().is_err());
        assert!("User".parse::<Sender>().is_err());
        assert!("".parse::<Sender>().is_err());
    }

    #[test]
    fn test_sender_serde() {
        let json = serde_json::to_string(&Sender::System).unwrap();
        assert_eq!(json, "\"system\"");
        let parsed: Sender = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Sender::System);
    }

    #[test]
    fn test_message_filter_default() {
        let filter = MessageFilter::default();
        assert_eq!(filter.sender, None);
        assert_eq!(filter.limit, 50);
        assert_eq!(filter.offset, 0);
    }

    #[test]
    fn test_message_page_has_more() {
        let page = MessagePage::new(Vec::new(), 120, 50, 0);
        assert!(page.has_more);

        let page = MessagePage::new(Vec::new(), 120, 50, 70);
        assert!(!page.has_more);

        // Boundary: total == offset + limit means the page reached the end.
        let page = MessagePage::new(Vec::new(), 100, 50, 50);
        assert!(!page.has_more);
    }

    #[test]
    fn test_chat_message_serialize() {
        let msg = ChatMessage {
            id: 7,
            message_id: "m-1".to_string(),
            session_id: "s-1".to_string(),
            content: "hello world".to_string(),
            original_content: "hello world".to_string(),
            has_inappropriate_content: false,
            timestamp: Utc::now(),
            sender: Sender::User,
            message_length: 11,
            word_count: 2,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"sender\":\"user\""));
        assert!(json.contains("\"message_length\":11"));
    }
}
