//! Application state - shared across all handlers.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use juicebox_core::DomainError;
use juicebox_core::ports::{
    PasswordService, PostRepository, TagRepository, TokenService, UserRepository,
};
use juicebox_infra::{Argon2PasswordService, InMemoryStore, JwtTokenService};

#[cfg(feature = "postgres")]
use juicebox_infra::database::schema::ensure_schema;
#[cfg(feature = "postgres")]
use juicebox_infra::{
    DatabaseConnections, PostgresPostRepository, PostgresTagRepository, PostgresUserRepository,
};

use crate::config::AppConfig;
use crate::middleware::error::AppError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub passwords: Arc<dyn PasswordService>,
    pub store_timeout: Duration,
    /// `"postgres"` or `"memory"`, reported by the health check.
    pub backend: &'static str,
}

impl AppState {
    /// State backed by a fresh in-memory store.
    pub fn in_memory(config: &AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::with_store(config, "memory", store.clone(), store.clone(), store)
    }

    /// State backed by the PostgreSQL pool in `db`.
    #[cfg(feature = "postgres")]
    pub fn postgres(config: &AppConfig, db: &DatabaseConnections) -> Self {
        Self::with_store(
            config,
            "postgres",
            Arc::new(PostgresUserRepository::new(db.main.clone())),
            Arc::new(PostgresPostRepository::new(db.main.clone())),
            Arc::new(PostgresTagRepository::new(db.main.clone())),
        )
    }

    fn with_store(
        config: &AppConfig,
        backend: &'static str,
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
    ) -> Self {
        Self {
            users,
            posts,
            tags,
            tokens: Arc::new(JwtTokenService::new(config.jwt.clone())),
            passwords: Arc::new(Argon2PasswordService::new()),
            store_timeout: config.store_timeout,
            backend,
        }
    }

    /// Run a store-backed operation under the configured timeout.
    pub async fn timed<T, F>(&self, operation: F) -> Result<T, AppError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        match tokio::time::timeout(self.store_timeout, operation).await {
            Ok(result) => result.map_err(AppError::from),
            Err(_) => {
                tracing::warn!(
                    timeout_ms = self.store_timeout.as_millis() as u64,
                    "Store call timed out"
                );
                Err(AppError::Timeout)
            }
        }
    }
}

/// Connect and bootstrap the database when one is configured.
///
/// Returns `None` when `DATABASE_URL` is unset or the connection fails, in
/// which case the server runs on the in-memory store.
#[cfg(feature = "postgres")]
pub async fn open_database(config: &AppConfig) -> Option<DatabaseConnections> {
    let Some(db_config) = config.database.as_ref() else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return None;
    };

    let connections = match DatabaseConnections::init(db_config).await {
        Ok(connections) => connections,
        Err(e) => {
            tracing::error!(
                "Failed to connect to database: {}. Using in-memory fallback.",
                e
            );
            return None;
        }
    };

    if let Err(e) = ensure_schema(&connections.main).await {
        tracing::error!("Failed to bootstrap schema: {}. Using in-memory fallback.", e);
        if let Err(e) = connections.close().await {
            tracing::warn!("Error closing database pool: {}", e);
        }
        return None;
    }

    Some(connections)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_rt::test]
    async fn test_timed_maps_expiry_to_timeout() {
        let state = AppState::in_memory(&AppConfig {
            store_timeout: Duration::from_millis(10),
            ..AppConfig::default()
        });

        let result: Result<(), AppError> = state
            .timed(async {
                tokio::time::sleep(Duration::from_secs(1)).await;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(AppError::Timeout)));
    }

    #[actix_rt::test]
    async fn test_timed_passes_domain_errors_through() {
        let state = AppState::in_memory(&AppConfig::default());

        let result: Result<(), AppError> = state
            .timed(async { Err(DomainError::Unauthenticated) })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Domain(DomainError::Unauthenticated))
        ));
    }
}
