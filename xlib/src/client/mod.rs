mod postgres;

pub use postgres::{DatabaseStatus, PostgresClient, PostgresClientConfig};
