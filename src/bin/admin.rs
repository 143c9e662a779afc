use clap::Parser;
use culture_map::admin_cli::{handle_admin_command, AdminCli};
use culture_map::app_log;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = AdminCli::parse();
    if let Err(e) = handle_admin_command(cli).await {
        app_log!(error, "❌ {:#}", e);
        std::process::exit(1);
    }
}
