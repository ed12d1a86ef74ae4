use crate::config::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use tracing::{error, info};

const VERIFY_TIMEOUT_SECS: u64 = 5;

/// Build the PostgreSQL pool and verify it answers before handing it out.
pub async fn init_pool(cfg: &Config) -> Result<Pool<Postgres>, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.db_max_connections)
        .min_connections(cfg.db_min_connections)
        // Timeout for acquiring a connection from the pool
        .acquire_timeout(Duration::from_secs(cfg.db_acquire_timeout_secs))
        // Close connections idle for longer than this
        .idle_timeout(Duration::from_secs(600))
        // Maximum lifetime of a connection (to handle stale connections)
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&cfg.database_url)
        .await?;

    match tokio::time::timeout(
        Duration::from_secs(VERIFY_TIMEOUT_SECS),
        sqlx::query("SELECT 1").execute(&pool),
    )
    .await
    {
        Ok(Ok(_)) => {
            info!(
                max_connections = cfg.db_max_connections,
                "database pool created and verified"
            );
            Ok(pool)
        }
        Ok(Err(e)) => {
            error!(error = %e, "database connection verification failed");
            Err(e)
        }
        Err(_) => {
            error!(
                timeout_secs = VERIFY_TIMEOUT_SECS,
                "database connection verification timeout"
            );
            Err(sqlx::Error::Io(std::io::Error::new(
                std::io::ErrorKind::TimedOut,
                "database verification timeout",
            )))
        }
    }
}
