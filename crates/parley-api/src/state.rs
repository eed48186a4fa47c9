//! Application state wiring all services together.
//!
//! AppState holds the concrete service instances used by both CLI commands
//! and REST API handlers. Services are generic over repository/provider
//! traits, but AppState pins them to the concrete infra implementations.

use std::path::PathBuf;
use std::sync::Arc;

use parley_core::chat::service::{ChatService, ChatServiceConfig};
use parley_infra::config::{chatflow_api_key, load_config, resolve_data_dir};
use parley_infra::flowise::FlowiseClient;
use parley_infra::sqlite::chat::SqliteChatRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_types::config::AppConfig;

/// Concrete type alias for the service generics pinned to infra implementations.
pub type ConcreteChatService = ChatService<SqliteChatRepository, FlowiseClient>;

/// Shared application state holding all services.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<ConcreteChatService>,
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: load config, connect to the DB,
    /// wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();

        // Ensure data directory exists
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_config(&data_dir).await;

        // Initialize database
        let db_url = format!("sqlite://{}?mode=rwc", data_dir.join("parley.db").display());
        let db_pool = DatabasePool::new(&db_url).await?;

        // Wire the chat service against the engine client
        let chat_repo = SqliteChatRepository::new(db_pool.clone());
        let flowise = FlowiseClient::new(config.chatflow.base_url.clone(), chatflow_api_key());
        let chat_service = ChatService::new(
            chat_repo,
            flowise,
            ChatServiceConfig {
                naming: config.naming.clone(),
                session_namespace: config.session.namespace.clone(),
                default_chatflow_id: config.chatflow.default_chatflow_id.clone(),
                allowed_chatflow_ids: config.chatflow.allowed_ids.clone(),
            },
        );

        Ok(Self {
            chat_service: Arc::new(chat_service),
            config,
            data_dir,
            db_pool,
        })
    }
}
