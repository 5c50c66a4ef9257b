use std::time::Duration;

use derive_more::Deref;
use sqlx::{
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    Connection, PgConnection,
};

/// Database every PostgreSQL server ships with; used for server-level statements.
const MAINTENANCE_DB: &str = "postgres";

/// SQLSTATE `duplicate_database`.
const DUPLICATE_DATABASE: &str = "42P04";

#[derive(Debug, Clone)]
pub struct PostgresClientConfig {
    pub hostname: String,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub db_name: String,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PostgresClientConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: None,
            user: None,
            password: None,
            db_name: MAINTENANCE_DB.to_string(),
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

impl PostgresClientConfig {
    fn connect_options(&self, database: &str) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.hostname)
            .database(database);
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if let Some(user) = &self.user {
            options = options.username(user);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        options
    }

    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Outcome of [`PostgresClient::ensure_database`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseStatus {
    Created,
    AlreadyExists,
}

/// Shared connection pool. Clones share the same pool.
#[derive(Debug, Clone, Deref)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Opens the pool and establishes one connection up front, so an unreachable
    /// server fails here rather than on the first request.
    pub async fn build(config: &PostgresClientConfig) -> Result<Self, sqlx::Error> {
        let pool = config
            .pool_options()
            .connect_with(config.connect_options(&config.db_name))
            .await?;

        tracing::info!(
            host = %config.hostname,
            database = %config.db_name,
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );

        Ok(Self { pool })
    }

    /// Builds the pool without connecting. Connections are opened on first use.
    pub fn build_lazy(config: &PostgresClientConfig) -> Self {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options(&config.db_name));
        Self { pool }
    }

    /// Creates `config.db_name` on the server if it does not exist yet.
    pub async fn ensure_database(
        config: &PostgresClientConfig,
    ) -> Result<DatabaseStatus, sqlx::Error> {
        let statement = format!("CREATE DATABASE {}", quote_identifier(&config.db_name));
        match run_maintenance(config, &statement).await {
            Ok(()) => Ok(DatabaseStatus::Created),
            Err(sqlx::Error::Database(e)) if e.code().as_deref() == Some(DUPLICATE_DATABASE) => {
                Ok(DatabaseStatus::AlreadyExists)
            }
            Err(e) => Err(e),
        }
    }

    /// Drops `config.db_name` if it exists. Every pool on it must be closed first.
    pub async fn drop_database(config: &PostgresClientConfig) -> Result<(), sqlx::Error> {
        let statement = format!(
            "DROP DATABASE IF EXISTS {}",
            quote_identifier(&config.db_name)
        );
        run_maintenance(config, &statement).await
    }

    /// Waits for checked-out connections to return, then closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

/// Runs a server-level statement over a one-off connection to the maintenance database.
async fn run_maintenance(config: &PostgresClientConfig, statement: &str) -> Result<(), sqlx::Error> {
    let mut conn = PgConnection::connect_with(&config.connect_options(MAINTENANCE_DB)).await?;
    let result = sqlx::raw_sql(statement).execute(&mut conn).await;

    if let Err(e) = conn.close().await {
        tracing::warn!("Failed to close maintenance connection: {e}");
    }

    result.map(|_| ())
}

fn quote_identifier(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
