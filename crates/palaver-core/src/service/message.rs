//! Message ingestion and retrieval service.
//!
//! `create_message` runs the full processing pipeline over a raw JSON
//! payload: structural validation, field validation, duplicate check,
//! content filtering, statistics, sanitization, persistence. Retrieval
//! operations paginate over stored messages and never mutate them.

use palaver_types::config::ServiceConfig;
use palaver_types::error::{MessageError, RepositoryError};
use palaver_types::message::{
    ChatMessage, MessageFilter, MessagePage, NewMessage, PageResult, StoreStats,
};

use crate::filter::ContentFilter;
use crate::repository::message::MessageRepository;
use crate::sanitize::sanitize_text;
use crate::stats::message_stats;
use crate::validate::validate_complete;

/// Service orchestrating the message pipeline.
///
/// Generic over the repository trait to maintain clean architecture --
/// palaver-core never depends on palaver-infra.
pub struct MessageService<R: MessageRepository> {
    repo: R,
    filter: ContentFilter,
    config: ServiceConfig,
}

impl<R: MessageRepository> MessageService<R> {
    /// Create a new MessageService. The denylist is compiled once here,
    /// not per message.
    pub fn new(repo: R, config: ServiceConfig) -> Self {
        let filter = ContentFilter::new(&config.denylist);
        Self {
            repo,
            filter,
            config,
        }
    }

    /// Ingest a raw message payload through the full pipeline.
    ///
    /// Returns the stored message on success. Validation failures carry
    /// every accumulated violation; a duplicate `message_id` is a conflict
    /// whether caught by the pre-check or by the store itself.
    pub async fn create_message(
        &self,
        raw: &serde_json::Value,
    ) -> Result<ChatMessage, MessageError> {
        let valid = validate_complete(raw, &self.config.limits)
            .map_err(MessageError::Validation)?;

        let existing = self
            .repo
            .get_by_message_id(&valid.message_id)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;
        if existing.is_some() {
            tracing::info!(message_id = %valid.message_id, "rejected duplicate message");
            return Err(MessageError::Conflict(valid.message_id));
        }

        let outcome = self.filter.apply(&valid.content);
        if outcome.matched {
            tracing::debug!(
                message_id = %valid.message_id,
                terms = ?outcome.terms_found,
                "masked denylisted content"
            );
        }

        // Statistics describe the filtered text as the client would see it
        // echoed back, before storage tidying.
        let stats = message_stats(&outcome.filtered);

        let message = NewMessage {
            message_id: sanitize_text(&valid.message_id),
            session_id: sanitize_text(&valid.session_id),
            content: sanitize_text(&outcome.filtered),
            original_content: sanitize_text(&valid.content),
            has_inappropriate_content: outcome.matched,
            timestamp: valid.timestamp,
            sender: valid.sender,
            message_length: stats.length as u32,
            word_count: stats.word_count as u32,
        };

        let stored = match self.repo.create(&message).await {
            Ok(stored) => stored,
            // A concurrent create can slip past the pre-check; the store's
            // UNIQUE constraint reports it as the same conflict outcome.
            Err(RepositoryError::Conflict(_)) => {
                tracing::info!(message_id = %message.message_id, "rejected duplicate message");
                return Err(MessageError::Conflict(message.message_id));
            }
            Err(e) => return Err(MessageError::Storage(e.to_string())),
        };

        tracing::info!(
            message_id = %stored.message_id,
            session_id = %stored.session_id,
            filtered = stored.has_inappropriate_content,
            "stored message"
        );

        Ok(stored)
    }

    /// List a session's messages, newest first, with pagination.
    ///
    /// An unknown session is not an error: it yields an empty page with a
    /// status line saying so.
    pub async fn messages_by_session(
        &self,
        session_id: &str,
        filter: MessageFilter,
    ) -> Result<PageResult, MessageError> {
        let session_id = session_id.trim();
        if session_id.is_empty() {
            return Err(MessageError::validation("session_id cannot be empty"));
        }
        validate_filter_bounds(filter.limit, filter.offset)?;

        let messages = self
            .repo
            .get_by_session(session_id, &filter)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        // Count with the same sender filter so has_more stays truthful.
        let total = self
            .repo
            .count_by_session(session_id, filter.sender)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        let message = if total == 0 {
            format!("no messages found for session '{session_id}'")
        } else {
            "messages retrieved successfully".to_string()
        };

        Ok(PageResult {
            message,
            page: MessagePage::new(messages, total, filter.limit, filter.offset),
        })
    }

    /// Search stored content for a case-insensitive substring.
    ///
    /// Scans the most recent messages (bounded by `search_scan_limit`) and
    /// matches against both stored and original content, so a query for a
    /// masked term still finds the message that carried it.
    pub async fn search_messages(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> Result<PageResult, MessageError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(MessageError::validation("search query cannot be empty"));
        }
        validate_filter_bounds(limit, offset)?;

        let candidates = self
            .repo
            .get_recent(self.config.search_scan_limit)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        let needle = query.to_lowercase();
        let matches: Vec<ChatMessage> = candidates
            .into_iter()
            .filter(|m| {
                m.content.to_lowercase().contains(&needle)
                    || m.original_content.to_lowercase().contains(&needle)
            })
            .collect();

        let total = matches.len() as i64;
        let page: Vec<ChatMessage> = matches
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect();

        tracing::debug!(query = %query, total, "search completed");

        let message = if total == 0 {
            format!("no messages matched '{query}'")
        } else {
            "search completed successfully".to_string()
        };

        Ok(PageResult {
            message,
            page: MessagePage::new(page, total, limit, offset),
        })
    }

    /// Get one message by its storage-assigned id.
    pub async fn message_by_id(&self, id: i64) -> Result<ChatMessage, MessageError> {
        self.repo
            .get_by_id(id)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?
            .ok_or(MessageError::NotFound)
    }

    /// Delete one message by its storage-assigned id.
    pub async fn delete_message(&self, id: i64) -> Result<(), MessageError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        if !deleted {
            return Err(MessageError::NotFound);
        }

        tracing::info!(id, "deleted message");
        Ok(())
    }

    /// Aggregate counters across the whole store.
    pub async fn store_stats(&self) -> Result<StoreStats, MessageError> {
        let total_messages = self
            .repo
            .count_messages()
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;
        let total_sessions = self
            .repo
            .count_sessions()
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;
        let flagged_messages = self
            .repo
            .count_flagged()
            .await
            .map_err(|e| MessageError::Storage(e.to_string()))?;

        Ok(StoreStats {
            total_messages,
            total_sessions,
            flagged_messages,
        })
    }
}

/// Shared bounds check for pagination parameters.
fn validate_filter_bounds(limit: i64, offset: i64) -> Result<(), MessageError> {
    if limit < 1 || limit > MessageFilter::MAX_LIMIT {
        return Err(MessageError::validation(format!(
            "limit must be between 1 and {}",
            MessageFilter::MAX_LIMIT
        )));
    }
    if offset < 0 {
        return Err(MessageError::validation("offset cannot be negative"));
    }
    Ok(())
}
