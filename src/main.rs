use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use caf_admin::config::AppConfig;
use caf_admin::server;

#[derive(Parser)]
#[command(
    name = "caf-admin",
    about = "Admin console backend for the cover-art generation platform"
)]
struct Cli {
    /// Port to listen on
    #[clap(short, long, default_value = "3001")]
    port: u16,

    /// Allowed CORS origin (any origin when omitted)
    #[clap(long)]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Cli::parse();
    let config = AppConfig::load().await?;

    server::start_server(args.port, config, args.cors_origin.as_deref()).await
}
