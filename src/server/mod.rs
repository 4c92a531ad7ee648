pub mod app;
pub mod handlers;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;

pub async fn start_server(port: u16, config: AppConfig, cors_origin: Option<&str>) -> Result<()> {
    let app = app::create_app(config, cors_origin).await?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    info!("Server running on http://0.0.0.0:{port}");

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /api/designs                - Design templates");
    info!("  /api/collections            - Collections & batch reordering");
    info!("  /api/orders                 - Orders (search, status, date filters)");
    info!("  /api/partners               - Partners & monthly sales reports");
    info!("  /api/prompt-templates       - AI prompt templates");
    info!("  /api/render-assets          - PSD render assets");
    info!("  /api/upload, /api/files/*   - Object storage, presigning, CDN");
}
