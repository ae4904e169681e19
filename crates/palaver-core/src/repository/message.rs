//! MessageRepository trait definition.

use palaver_types::error::RepositoryError;
use palaver_types::message::{ChatMessage, MessageFilter, NewMessage, Sender};

/// Repository trait for message persistence.
///
/// Implementations live in palaver-infra (e.g., `SqliteMessageRepository`).
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait MessageRepository: Send + Sync {
    /// Insert a processed message and return the stored row.
    ///
    /// Must fail with [`RepositoryError::Conflict`] when a message with the
    /// same `message_id` already exists.
    fn create(
        &self,
        message: &NewMessage,
    ) -> impl std::future::Future<Output = Result<ChatMessage, RepositoryError>> + Send;

    /// Get a message by its storage-assigned numeric id.
    fn get_by_id(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// Get a message by its client-supplied message_id.
    fn get_by_message_id(
        &self,
        message_id: &str,
    ) -> impl std::future::Future<Output = Result<Option<ChatMessage>, RepositoryError>> + Send;

    /// List messages for a session, newest first, honoring the filter's
    /// sender, limit, and offset.
    fn get_by_session(
        &self,
        session_id: &str,
        filter: &MessageFilter,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Count messages in a session, restricted to one sender when given.
    fn count_by_session(
        &self,
        session_id: &str,
        sender: Option<Sender>,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Get the most recently stored messages across all sessions.
    fn get_recent(
        &self,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<ChatMessage>, RepositoryError>> + Send;

    /// Delete a message by numeric id. Returns whether a row was removed.
    fn delete(
        &self,
        id: i64,
    ) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// Count all stored messages.
    fn count_messages(
        &self,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Count distinct sessions holding at least one message.
    fn count_sessions(
        &self,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;

    /// Count messages the content filter masked.
    fn count_flagged(
        &self,
    ) -> impl std::future::Future<Output = Result<i64, RepositoryError>> + Send;
}
