use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use thiserror::Error;

use crate::ai::{CompletionClient, GeminiClient};
use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager};

#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Shared handles every handler can reach through `State`
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: PgPool,
    pub http: reqwest::Client,
    pub completion: Arc<dyn CompletionClient>,
}

impl AppState {
    /// Lazy pool plus one outbound HTTP client; nothing touches the network yet
    pub fn new(config: AppConfig) -> Result<Self, StateError> {
        let pool = DatabaseManager::connect_lazy(&config.database)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.ai.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let completion: Arc<dyn CompletionClient> = Arc::new(GeminiClient::from_config(&config.ai, http.clone()));

        Ok(Self {
            config: Arc::new(config),
            pool,
            http,
            completion,
        })
    }

    /// Swap the completion backend (stub models in tests)
    pub fn with_completion(mut self, completion: Arc<dyn CompletionClient>) -> Self {
        self.completion = completion;
        self
    }
}
