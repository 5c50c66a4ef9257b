use std::sync::Arc;

use xlib::client::PostgresClient;

mod feedback;

pub struct Repo {
    db_pool: Arc<PostgresClient>,
}

impl Repo {
    pub const fn new(db_pool: Arc<PostgresClient>) -> Self {
        Self { db_pool }
    }
}
