use std::time::Duration;

use confique::Config;
use xlib::client::PostgresClientConfig;

/// Value shipped as the `DB_PASSWORD` default. Real deployments must override it.
pub const PLACEHOLDER_PASSWORD: &str = "yourpassword";

#[derive(Debug, Config)]
pub struct AppConfig {
    /// Port the HTTP listener binds on all interfaces.
    #[config(env = "PORT", default = 3000)]
    pub port: u16,

    #[config(nested)]
    pub db: DbConfig,
}

#[derive(Debug, Config)]
pub struct DbConfig {
    #[config(env = "DB_USER", default = "postgres")]
    pub user: String,

    #[config(env = "DB_HOST", default = "localhost")]
    pub host: String,

    /// Created at startup if missing.
    #[config(env = "DB_NAME", default = "feedback_db")]
    pub name: String,

    /// Default must stay equal to [`PLACEHOLDER_PASSWORD`].
    #[config(env = "DB_PASSWORD", default = "yourpassword")]
    pub password: String,

    #[config(env = "DB_PORT", default = 5432)]
    pub port: u16,

    #[config(env = "DB_MAX_CONNECTIONS", default = 10)]
    pub max_connections: u32,

    /// How long a request waits for a free pooled connection.
    #[config(env = "DB_ACQUIRE_TIMEOUT_SECS", default = 30)]
    pub acquire_timeout_secs: u64,
}

impl AppConfig {
    /// Reads every setting from the process environment, falling back to defaults.
    pub fn load() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }
}

impl DbConfig {
    pub fn uses_placeholder_password(&self) -> bool {
        self.password == PLACEHOLDER_PASSWORD
    }

    pub fn to_client_config(&self) -> PostgresClientConfig {
        PostgresClientConfig {
            hostname: self.host.clone(),
            port: Some(self.port),
            user: Some(self.user.clone()),
            password: Some(self.password.clone()),
            db_name: self.name.clone(),
            max_connections: self.max_connections,
            acquire_timeout: Duration::from_secs(self.acquire_timeout_secs),
        }
    }
}
