use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use xlib::client::{DatabaseStatus, PostgresClient, PostgresClientConfig};

use crate::repo::Repo;

/// Makes sure the database and the `feedback` table exist, and returns the pool
/// request handlers share.
///
/// Failing to create the database is tolerated: the server may not grant
/// `CREATEDB` while the database already exists. Failing to connect to it or to
/// create the table is fatal.
pub async fn bootstrap(config: &PostgresClientConfig) -> Result<Arc<PostgresClient>> {
    match PostgresClient::ensure_database(config).await {
        Ok(DatabaseStatus::Created) => info!("Created database `{}`", config.db_name),
        Ok(DatabaseStatus::AlreadyExists) => {
            info!("Database `{}` already exists", config.db_name);
        }
        Err(e) => warn!("Could not create database `{}`: {e}", config.db_name),
    }

    let client = PostgresClient::build(config)
        .await
        .with_context(|| format!("failed to connect to database `{}`", config.db_name))?;
    let client = Arc::new(client);

    Repo::new(client.clone()).create_schema().await?;
    info!("Database initialized successfully");

    Ok(client)
}
