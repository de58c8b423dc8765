mod error;
#[cfg(feature = "database-postgres")]
pub mod postgres;
pub mod repos;
#[cfg(feature = "database-sqlite")]
pub mod sqlite;

#[cfg(all(test, any(feature = "database-sqlite", feature = "database-postgres")))]
pub mod tests;

use std::sync::Arc;

pub use error::{DbError, DbResult};
pub use repos::*;

use crate::config::DatabaseConfig;

/// Cached repository trait objects, created once at startup.
struct CachedRepos {
    manifests: Arc<dyn BatchManifestRepo>,
    sessions: Arc<dyn SessionRepo>,
}

enum PoolStorage {
    #[cfg(feature = "database-sqlite")]
    Sqlite(sqlx::SqlitePool),
    /// Primary pool. A read replica, when configured, lives in the repos.
    #[cfg(feature = "database-postgres")]
    Postgres(sqlx::PgPool),
    #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
    _None(std::convert::Infallible),
}

/// Handle to the manifest store and the session tables.
///
/// Both live in the same database: the enumerator writes manifests and the
/// database worker deletes from `sessions` and `session_fields`.
pub struct DbPool {
    inner: PoolStorage,
    repos: CachedRepos,
}

impl DbPool {
    #[cfg(feature = "database-sqlite")]
    pub fn from_sqlite(pool: sqlx::SqlitePool) -> Self {
        let repos = CachedRepos {
            manifests: Arc::new(sqlite::SqliteBatchManifestRepo::new(pool.clone())),
            sessions: Arc::new(sqlite::SqliteSessionRepo::new(pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Sqlite(pool),
            repos,
        }
    }

    #[cfg(feature = "database-postgres")]
    pub fn from_postgres(write_pool: sqlx::PgPool, read_pool: Option<sqlx::PgPool>) -> Self {
        let repos = CachedRepos {
            manifests: Arc::new(postgres::PostgresBatchManifestRepo::new(
                write_pool.clone(),
                read_pool,
            )),
            sessions: Arc::new(postgres::PostgresSessionRepo::new(write_pool.clone())),
        };
        DbPool {
            inner: PoolStorage::Postgres(write_pool),
            repos,
        }
    }

    /// Open the configured database and apply migrations when enabled.
    pub async fn from_config(config: &DatabaseConfig) -> DbResult<Self> {
        let pool: Self = match config {
            DatabaseConfig::None => return Err(DbError::NotConfigured),
            #[cfg(feature = "database-sqlite")]
            DatabaseConfig::Sqlite(cfg) => {
                let pool = sqlx::sqlite::SqlitePoolOptions::new()
                    .max_connections(cfg.max_connections)
                    .connect_with(
                        sqlx::sqlite::SqliteConnectOptions::new()
                            .filename(&cfg.path)
                            .create_if_missing(cfg.create_if_missing)
                            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                            .busy_timeout(std::time::Duration::from_millis(cfg.busy_timeout_ms)),
                    )
                    .await?;
                Self::from_sqlite(pool)
            }
            #[cfg(feature = "database-postgres")]
            DatabaseConfig::Postgres(cfg) => {
                let timeout = std::time::Duration::from_secs(cfg.connect_timeout_secs);
                let write_pool = sqlx::postgres::PgPoolOptions::new()
                    .min_connections(cfg.min_connections)
                    .max_connections(cfg.max_connections)
                    .acquire_timeout(timeout)
                    .connect(&cfg.url)
                    .await?;

                let read_pool = if let Some(read_url) = &cfg.read_url {
                    tracing::info!("Configuring read replica pool");
                    Some(
                        sqlx::postgres::PgPoolOptions::new()
                            .min_connections(cfg.min_connections)
                            .max_connections(cfg.max_connections)
                            .acquire_timeout(timeout)
                            .connect(read_url)
                            .await?,
                    )
                } else {
                    None
                };

                Self::from_postgres(write_pool, read_pool)
            }
        };

        if config.run_migrations() {
            pool.run_migrations().await?;
        }

        Ok(pool)
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> DbResult<()> {
        match &self.inner {
            #[cfg(feature = "database-sqlite")]
            PoolStorage::Sqlite(pool) => {
                tracing::info!("Running SQLite migrations");
                sqlx::migrate!("./migrations_sqlx/sqlite").run(pool).await?;
                tracing::info!("SQLite migrations completed successfully");
                Ok(())
            }
            #[cfg(feature = "database-postgres")]
            PoolStorage::Postgres(pool) => {
                tracing::info!("Running PostgreSQL migrations");
                sqlx::migrate!("./migrations_sqlx/postgres").run(pool).await?;
                tracing::info!("PostgreSQL migrations completed successfully");
                Ok(())
            }
            #[cfg(not(any(feature = "database-sqlite", feature = "database-postgres")))]
            PoolStorage::_None(infallible) => match *infallible {},
        }
    }

    /// Get batch manifest repository
    pub fn manifests(&self) -> Arc<dyn BatchManifestRepo> {
        Arc::clone(&self.repos.manifests)
    }

    /// Get session repository
    pub fn sessions(&self) -> Arc<dyn SessionRepo> {
        Arc::clone(&self.repos.sessions)
    }
}
