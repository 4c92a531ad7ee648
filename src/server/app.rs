use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::clients::{AdminApiClient, CdnClient, ObjectStore};
use crate::config::AppConfig;

use super::handlers::{
    collections, designs, files, health, orders, partners, prompt_templates, render_assets, upload,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub api: Arc<AdminApiClient>,
    pub store: Arc<ObjectStore>,
    pub cdn: Arc<CdnClient>,
}

pub async fn create_app(config: AppConfig, cors_origin: Option<&str>) -> Result<Router> {
    let sdk = config.sdk_config().await;
    let api = AdminApiClient::new(&config);
    let store = ObjectStore::new(&sdk, config.buckets.clone());
    let cdn = CdnClient::new(&sdk, config.cloudfront_distribution_id.clone());

    let state = AppState {
        config: Arc::new(config),
        api: Arc::new(api),
        store: Arc::new(store),
        cdn: Arc::new(cdn),
    };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(origin.parse::<axum::http::HeaderValue>()?)
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Ok(Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state))
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Designs
        .route(
            "/designs",
            get(designs::list_designs).post(designs::create_design),
        )
        .route(
            "/designs/:id",
            get(designs::get_design)
                .put(designs::update_design)
                .delete(designs::delete_design),
        )
        // Collections
        .route(
            "/collections",
            get(collections::list_collections)
                .post(collections::create_collection)
                .patch(collections::reorder_collections),
        )
        .route(
            "/collections/:slug",
            get(collections::get_collection)
                .put(collections::update_collection_designs)
                .delete(collections::delete_collection)
                .patch(collections::toggle_collection),
        )
        // Orders
        .route("/orders", get(orders::list_orders))
        .route(
            "/orders/:id",
            get(orders::get_order).post(orders::complete_order),
        )
        // Partners
        .route(
            "/partners",
            get(partners::list_partners).post(partners::create_partner),
        )
        .route(
            "/partners/:id",
            get(partners::get_partner)
                .put(partners::update_partner)
                .delete(partners::delete_partner),
        )
        .route("/partners/:id/sales", get(partners::partner_sales))
        // Prompt templates
        .route(
            "/prompt-templates",
            get(prompt_templates::list_templates).post(prompt_templates::create_template),
        )
        .route("/prompt-templates/test", post(prompt_templates::test_prompt))
        .route(
            "/prompt-templates/:id",
            get(prompt_templates::get_template)
                .put(prompt_templates::update_template)
                .delete(prompt_templates::delete_template),
        )
        .route(
            "/prompt-templates/:id/save-example",
            put(prompt_templates::save_example),
        )
        // Render assets
        .route(
            "/render-assets",
            get(render_assets::list_assets)
                .post(render_assets::create_asset)
                .put(render_assets::upsert_asset),
        )
        .route(
            "/render-assets/:key",
            get(render_assets::get_asset)
                .put(render_assets::update_asset)
                .delete(render_assets::delete_asset),
        )
        // Object storage & CDN
        .route("/upload", post(upload::upload_file))
        .route("/upload/presign", get(upload::presign_upload))
        .route("/files/upload", post(files::forward_upload))
        .route("/files/cache/invalidate", post(files::invalidate_cache))
        .route("/files/download-url", post(files::download_url))
}
