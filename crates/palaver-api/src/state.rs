//! Application state wiring the message service to its SQLite backend.
//!
//! AppState holds the concrete service instance used by both CLI and REST API.
//! MessageService is generic over the repository trait, but AppState pins it
//! to the concrete infra implementation.

use std::path::PathBuf;
use std::sync::Arc;

use palaver_core::service::message::MessageService;
use palaver_infra::config::{load_service_config, resolve_data_dir};
use palaver_infra::sqlite::message::SqliteMessageRepository;
use palaver_infra::sqlite::pool::{database_url, DatabasePool};
use palaver_types::config::ServiceConfig;

/// Concrete type alias for the service generic pinned to the infra implementation.
pub type ConcreteMessageService = MessageService<SqliteMessageRepository>;

/// Shared application state holding the message service.
///
/// Used by both CLI commands and REST API handlers.
#[derive(Clone)]
pub struct AppState {
    pub message_service: Arc<ConcreteMessageService>,
    pub config: ServiceConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire the service.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        // Initialize database
        let db_pool = DatabasePool::new(&database_url(&data_dir)).await?;

        // Load config.toml (defaults when absent or malformed)
        let config = load_service_config(&data_dir).await;

        // Wire the message service to the SQLite repository
        let repo = SqliteMessageRepository::new(db_pool.clone());
        let message_service = MessageService::new(repo, config.clone());

        Ok(Self {
            message_service: Arc::new(message_service),
            config,
            data_dir,
            db_pool,
        })
    }
}
