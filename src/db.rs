//! Store bootstrap: connection with retry and schema creation.

use std::time::Duration;

use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::StoreError;

const CREATE_BILLS: &str = "CREATE TABLE IF NOT EXISTS bills (
    id BINARY(16) PRIMARY KEY,
    embasa DECIMAL(10,2) NOT NULL,
    coelba DECIMAL(10,2) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    INDEX idx_bills_created_at (created_at)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

const CREATE_ITEMS: &str = "CREATE TABLE IF NOT EXISTS items (
    id INT AUTO_INCREMENT PRIMARY KEY,
    name VARCHAR(100) NOT NULL,
    price DECIMAL(10,2) NOT NULL
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4";

/// Connection options built from the store settings.
pub fn connect_options(config: &Config) -> MySqlConnectOptions {
    MySqlConnectOptions::new()
        .host(&config.db_host)
        .port(config.db_port)
        .username(&config.db_user)
        .password(&config.db_pass)
        .database(&config.db_name)
}

/// Build the pool and wait until the database answers.
///
/// Pings up to `db_connect_attempts` times, sleeping
/// `db_connect_retry_seconds` between attempts. Per-request operations are
/// never retried.
pub async fn connect_with_retry(config: &Config) -> Result<MySqlPool, StoreError> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(10))
        .connect_lazy_with(connect_options(config));

    let delay = Duration::from_secs(config.db_connect_retry_seconds);
    let attempts = config.db_connect_attempts;
    let mut last_error = String::from("no connection attempt made");

    for attempt in 1..=attempts {
        match sqlx::query("SELECT 1").execute(&pool).await {
            Ok(_) => {
                info!("Connected to database: {}", config.db_name);
                return Ok(pool);
            }
            Err(e) => {
                warn!(
                    "Attempt {}/{}: error connecting to database: {}. Trying again in {}s...",
                    attempt,
                    attempts,
                    e,
                    delay.as_secs()
                );
                last_error = e.to_string();
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    Err(StoreError::Unreachable {
        attempts,
        reason: last_error,
    })
}

/// Create the `bills` and `items` tables if they are missing.
pub async fn ensure_schema(pool: &MySqlPool) -> Result<(), StoreError> {
    sqlx::query(CREATE_BILLS).execute(pool).await?;
    sqlx::query(CREATE_ITEMS).execute(pool).await?;
    info!("Tables bills and items created and verified");
    Ok(())
}
