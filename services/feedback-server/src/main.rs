use std::net::{Ipv4Addr, SocketAddrV4};

use anyhow::{Context, Result};
use feedback_server::{bootstrap::bootstrap, config::AppConfig, router, AppState};
use tracing::{info, warn};
use xlib::app::serve::serve_service;

async fn start_web_server() -> Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    if config.db.uses_placeholder_password() {
        warn!("DB_PASSWORD is not set; using the placeholder password");
    }

    let db_config = config.db.to_client_config();
    let pg_client = bootstrap(&db_config)
        .await
        .context("database bootstrap failed")?;

    let app = router(AppState {
        pg_client: pg_client.clone(),
    });

    let served = serve_service(
        app,
        SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, config.port),
        "feedback service",
    )
    .await;

    pg_client.close().await;
    served
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    xlib::app::tracing::setup();
    info!("Starting feedback service...");

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(start_web_server())
        .inspect_err(|e| tracing::error!("{e:#}"))
}
