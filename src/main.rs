use anyhow::{Context, Result};
use culture_map::app_log;
use culture_map::{core::ConfigManager, start_web_server};
use std::fs::OpenOptions;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_PORT: u16 = 8000;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    // Log file is cleared on every start
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&config.environment.log_path)
        .with_context(|| {
            format!(
                "Failed to open log file {}",
                config.environment.log_path.display()
            )
        })?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("culture_map=info,rocket::server=off"))
        .context("Invalid log filter")?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(file)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let port = match std::env::var("ROCKET_PORT") {
        Ok(raw) => raw
            .parse::<u16>()
            .map_err(|_| anyhow::anyhow!("ROCKET_PORT must be a valid port number"))?,
        Err(_) => DEFAULT_PORT,
    };

    app_log!(info, "Starting culture map API server");
    app_log!(
        info,
        "Database: {}",
        config.environment.database_path.display()
    );
    app_log!(info, "Log file: {}", config.environment.log_path.display());
    app_log!(info, "Server: http://0.0.0.0:{}", port);

    start_web_server(config, port).await
}
