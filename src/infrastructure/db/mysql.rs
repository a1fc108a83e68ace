use std::time::Duration;

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::settings::AppConfig;

const MAX_CONNECT_RETRIES: u32 = 5;

/// Owns the bounded connection pool. Created once at startup and handed to
/// every repository; cloning shares the same pool.
#[derive(Clone, Debug)]
pub struct Database {
    pool: MySqlPool,
}

impl Database {
    fn pool_options(config: &AppConfig) -> MySqlPoolOptions {
        MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
    }

    /// Connects with exponential backoff between attempts.
    pub async fn connect(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let mut retry_count = 0;
        let mut wait_seconds = 2;

        loop {
            match Self::pool_options(config).connect(&config.database_url).await {
                Ok(pool) => {
                    info!(
                        max_connections = config.db_max_connections,
                        "Database connection established."
                    );
                    return Ok(Database { pool });
                }
                Err(e) if retry_count < MAX_CONNECT_RETRIES => {
                    retry_count += 1;
                    warn!(
                        "Failed to connect to database (attempt {}/{}): {}. Retrying in {}s...",
                        retry_count, MAX_CONNECT_RETRIES, e, wait_seconds
                    );

                    tokio::time::sleep(Duration::from_secs(wait_seconds)).await;

                    wait_seconds *= 2;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Builds the pool without opening a connection; the first query does.
    pub fn connect_lazy(config: &AppConfig) -> Result<Self, sqlx::Error> {
        let pool = Self::pool_options(config).connect_lazy(&config.database_url)?;
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    pub async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    /// Waits for checked-out connections to be returned, then closes them all.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection pool closed.");
    }
}
