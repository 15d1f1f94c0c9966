//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StudioConfig;
use crate::openai::OpenAiClient;
use crate::storage::StorageClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StudioConfig,
    pool: PgPool,
    openai: OpenAiClient,
    storage: StorageClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Studio configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StudioConfig, pool: PgPool) -> Self {
        let openai = OpenAiClient::new(&config.openai);
        let storage = StorageClient::new(&config.storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                openai,
                storage,
            }),
        }
    }

    /// Get a reference to the studio configuration.
    #[must_use]
    pub fn config(&self) -> &StudioConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the `OpenAI` client.
    #[must_use]
    pub fn openai(&self) -> &OpenAiClient {
        &self.inner.openai
    }

    /// Get a reference to the object storage client.
    #[must_use]
    pub fn storage(&self) -> &StorageClient {
        &self.inner.storage
    }
}
