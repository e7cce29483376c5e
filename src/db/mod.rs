pub mod models;
pub mod repositories;
mod error;

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Executor;
use tracing::warn;

use crate::config::DatabaseConfig;

pub use error::{is_transient, DatabaseError};

/// Retries applied to connection-class failures at the access layer.
/// Business operations are never retried.
const MAX_RETRIES: u32 = 2;

/// Backoff grows linearly with the attempt number (~1s, ~2s).
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Initialize the database connection pool and run migrations.
///
/// Every connection gets a fixed statement timeout so a stuck query
/// surfaces as a generic failure instead of hanging the request.
pub async fn init_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let statement_timeout_secs = config.statement_timeout_secs;
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections.unwrap_or(20))
        .min_connections(config.min_connections.unwrap_or(1))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .after_connect(move |conn, _meta| {
            let stmt = format!("SET statement_timeout = '{}s'", statement_timeout_secs);
            Box::pin(async move {
                conn.execute(stmt.as_str()).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await?;

    // Run migrations
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Run a datastore operation, retrying transparently on connection-refused /
/// timeout-class errors with bounded linear backoff. All other errors are
/// returned on the first attempt.
pub async fn with_retry<T, F, Fut>(mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt: u32 = 0;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < MAX_RETRIES && is_transient(&err) => {
                attempt += 1;
                warn!(
                    attempt,
                    max_retries = MAX_RETRIES,
                    error = %err,
                    "transient database error, retrying"
                );
                tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
            }
            Err(err) => return Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn with_retry_returns_first_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok::<_, sqlx::Error>(7) }
        })
        .await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn with_retry_does_not_retry_non_transient_errors() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::RowNotFound) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn with_retry_gives_up_after_bounded_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), _> = with_retry(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::PoolTimedOut) }
        })
        .await;
        assert!(result.is_err());
        // Initial attempt plus MAX_RETRIES retries.
        assert_eq!(calls.load(Ordering::SeqCst), 1 + MAX_RETRIES);
    }
}
