//! Application state - shared across all handlers.

use std::sync::Arc;

use blogicum_core::ports::{Clock, Repositories, TokenService};
use blogicum_core::services::{BlogCommands, CommentQueries, PostQueries};
use blogicum_infra::{DatabaseConfig, InMemoryStore, JwtTokenService, SystemClock};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostQueries>,
    pub comments: Arc<CommentQueries>,
    pub commands: Arc<BlogCommands>,
    pub tokens: Arc<dyn TokenService>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Self::repositories(config.database.as_ref()).await;
        let tokens = Arc::new(JwtTokenService::new(config.jwt.clone()));

        tracing::info!("Application state initialized");
        Self::with(&repos, Arc::new(SystemClock), tokens)
    }

    /// Wire the services over an existing set of repositories.
    pub fn with(repos: &Repositories, clock: Arc<dyn Clock>, tokens: Arc<dyn TokenService>) -> Self {
        Self {
            posts: Arc::new(PostQueries::new(repos, clock.clone())),
            comments: Arc::new(CommentQueries::new(repos)),
            commands: Arc::new(BlogCommands::new(repos, clock.clone())),
            tokens,
            clock,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(db_config: Option<&DatabaseConfig>) -> Repositories {
        let Some(config) = db_config else {
            tracing::warn!("DATABASE_URL not set. Running on the in-memory store.");
            return Arc::new(InMemoryStore::new()).repositories();
        };

        match blogicum_infra::connect(config).await {
            Ok(db) => blogicum_infra::database::repositories(db),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Arc::new(InMemoryStore::new()).repositories()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(_db_config: Option<&DatabaseConfig>) -> Repositories {
        tracing::info!("Running without postgres feature - using the in-memory store");
        Arc::new(InMemoryStore::new()).repositories()
    }
}
