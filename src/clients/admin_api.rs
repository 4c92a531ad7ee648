//! HTTP client for the two upstream APIs: the Lambda-backed admin API
//! (authenticated with a static `x-api-key` header) and the public
//! collections API. One method per upstream operation; error signaling is
//! binary, any non-2xx status becomes an error.

use anyhow::{anyhow, bail, Context, Result};
use reqwest::multipart::Form;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde_json::{json, Value};

use crate::collections::PositionUpdate;
use crate::config::AppConfig;

const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone)]
pub struct AdminApiClient {
    http: reqwest::Client,
    admin_base_url: String,
    collections_base_url: String,
    api_key: String,
}

impl AdminApiClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            admin_base_url: config.admin_api_base_url.trim_end_matches('/').to_string(),
            collections_base_url: config
                .collections_api_base_url
                .trim_end_matches('/')
                .to_string(),
            api_key: config.admin_api_key.clone(),
        }
    }

    fn admin_url(&self, path: &str) -> String {
        format!("{}{path}", self.admin_base_url)
    }

    fn collections_url(&self, path: &str) -> String {
        format!("{}{path}", self.collections_base_url)
    }

    /// Admin URL ending in one escaped path segment. Render asset keys are
    /// PSD paths and contain slashes, so the segment must be percent-encoded
    /// as a whole.
    fn admin_url_with_segment(&self, path: &str, segment: &str) -> Result<String> {
        let mut url =
            Url::parse(&self.admin_url(path)).context("admin API base URL is not a valid URL")?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("admin API base URL cannot be a base"))?
            .push(segment);
        Ok(url.to_string())
    }

    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(API_KEY_HEADER, &self.api_key)
    }

    async fn expect_success(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.context("upstream request failed")?;
        let status = response.status();
        if !status.is_success() {
            bail!("upstream returned {status}");
        }
        Ok(response)
    }

    async fn json(&self, request: RequestBuilder) -> Result<Value> {
        self.expect_success(request)
            .await?
            .json()
            .await
            .context("invalid JSON from upstream")
    }

    /// Like [`Self::json`], but an upstream 404 maps to `Ok(None)`.
    async fn optional_json(&self, request: RequestBuilder) -> Result<Option<Value>> {
        let response = request.send().await.context("upstream request failed")?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            bail!("upstream returned {status}");
        }
        Ok(Some(
            response.json().await.context("invalid JSON from upstream")?,
        ))
    }

    async fn unit(&self, request: RequestBuilder) -> Result<()> {
        self.expect_success(request).await?;
        Ok(())
    }

    // ---- Designs ----

    pub async fn fetch_designs(&self) -> Result<Value> {
        self.json(self.with_key(self.http.get(self.admin_url("/admin/designs"))))
            .await
    }

    pub async fn fetch_design(&self, id: &str) -> Result<Option<Value>> {
        self.optional_json(self.with_key(self.http.get(self.admin_url(&format!("/admin/designs/{id}")))))
            .await
    }

    pub async fn create_design(&self, design: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/designs")))
                .json(design),
        )
        .await
    }

    pub async fn update_design(&self, id: &str, design: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.put(self.admin_url(&format!("/admin/designs/{id}"))))
                .json(design),
        )
        .await
    }

    pub async fn delete_design(&self, id: &str) -> Result<()> {
        self.unit(self.with_key(self.http.delete(self.admin_url(&format!("/admin/designs/{id}")))))
            .await
    }

    // ---- Collections ----

    /// The collections API is public; no key is attached.
    pub async fn fetch_collections(&self, include_inactive: bool) -> Result<Value> {
        let mut request = self.http.get(self.collections_url("/collections"));
        if include_inactive {
            request = request.query(&[("includeInactive", "true")]);
        }
        self.json(request).await
    }

    pub async fn fetch_collection(&self, slug: &str) -> Result<Option<Value>> {
        self.optional_json(self.http.get(self.collections_url(&format!("/collections/{slug}"))))
            .await
    }

    /// Persists a full reordering in one batch; there is no partial-failure
    /// reporting, the caller resynchronizes on error.
    pub async fn update_collection_positions(&self, updates: &[PositionUpdate]) -> Result<Value> {
        self.json(
            self.http
                .patch(self.collections_url("/collections/positions"))
                .json(&json!({ "positions": updates })),
        )
        .await
    }

    // ---- Orders ----

    pub async fn fetch_orders(&self, skip: u32, limit: u32) -> Result<Value> {
        self.json(
            self.with_key(self.http.get(self.admin_url("/admin/orders")))
                .query(&[("skip", skip), ("limit", limit)]),
        )
        .await
    }

    pub async fn fetch_order(&self, id: &str) -> Result<Option<Value>> {
        self.optional_json(self.with_key(self.http.get(self.admin_url(&format!("/admin/orders/{id}")))))
            .await
    }

    pub async fn complete_order(&self, id: &str) -> Result<Value> {
        self.json(
            self.with_key(
                self.http
                    .post(self.admin_url(&format!("/orders/admin/{id}/complete"))),
            ),
        )
        .await
    }

    // ---- Partners ----

    pub async fn fetch_partners(&self) -> Result<Value> {
        self.json(self.with_key(self.http.get(self.admin_url("/admin/partners"))))
            .await
    }

    pub async fn fetch_partner(&self, id: &str) -> Result<Option<Value>> {
        self.optional_json(self.with_key(self.http.get(self.admin_url(&format!("/admin/partners/{id}")))))
            .await
    }

    pub async fn create_partner(&self, partner: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/partners")))
                .json(partner),
        )
        .await
    }

    pub async fn update_partner(&self, id: &str, partner: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.put(self.admin_url(&format!("/admin/partners/{id}"))))
                .json(partner),
        )
        .await
    }

    pub async fn delete_partner(&self, id: &str) -> Result<()> {
        self.unit(self.with_key(self.http.delete(self.admin_url(&format!("/admin/partners/{id}")))))
            .await
    }

    // ---- Prompt templates ----

    pub async fn fetch_prompt_templates(&self) -> Result<Value> {
        self.json(self.with_key(self.http.get(self.admin_url("/admin/prompt-templates"))))
            .await
    }

    pub async fn fetch_prompt_template(&self, id: &str) -> Result<Option<Value>> {
        self.optional_json(
            self.with_key(
                self.http
                    .get(self.admin_url(&format!("/admin/prompt-templates/{id}"))),
            ),
        )
        .await
    }

    pub async fn create_prompt_template(&self, template: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/prompt-templates")))
                .json(template),
        )
        .await
    }

    pub async fn update_prompt_template(&self, id: &str, template: &Value) -> Result<Value> {
        self.json(
            self.with_key(
                self.http
                    .put(self.admin_url(&format!("/admin/prompt-templates/{id}"))),
            )
            .json(template),
        )
        .await
    }

    pub async fn delete_prompt_template(&self, id: &str) -> Result<()> {
        self.unit(
            self.with_key(
                self.http
                    .delete(self.admin_url(&format!("/admin/prompt-templates/{id}"))),
            ),
        )
        .await
    }

    /// The backend fetches the images from S3 itself; only keys travel here.
    pub async fn test_prompt(&self, payload: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/prompt-templates/test")))
                .json(payload),
        )
        .await
    }

    pub async fn save_prompt_example(&self, id: &str, form: Form) -> Result<Value> {
        self.json(
            self.with_key(
                self.http
                    .put(self.admin_url(&format!("/admin/prompt-templates/{id}/save-example"))),
            )
            .multipart(form),
        )
        .await
    }

    // ---- Render assets ----

    pub async fn fetch_render_assets(&self) -> Result<Value> {
        self.json(self.with_key(self.http.get(self.admin_url("/admin/render-assets"))))
            .await
    }

    pub async fn fetch_render_asset(&self, key: &str) -> Result<Option<Value>> {
        let url = self.admin_url_with_segment("/admin/render-assets", key)?;
        self.optional_json(self.with_key(self.http.get(url))).await
    }

    pub async fn create_render_asset(&self, asset: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/render-assets")))
                .json(asset),
        )
        .await
    }

    /// Created or updated by key, decided upstream.
    pub async fn upsert_render_asset(&self, asset: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.put(self.admin_url("/admin/render-assets")))
                .json(asset),
        )
        .await
    }

    pub async fn update_render_asset(&self, key: &str, asset: &Value) -> Result<Value> {
        let url = self.admin_url_with_segment("/admin/render-assets", key)?;
        self.json(self.with_key(self.http.put(url)).json(asset)).await
    }

    pub async fn delete_render_asset(&self, key: &str) -> Result<()> {
        let url = self.admin_url_with_segment("/admin/render-assets", key)?;
        self.unit(self.with_key(self.http.delete(url))).await
    }

    // ---- Files ----

    pub async fn forward_file_upload(&self, form: Form) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/files/upload")))
                .multipart(form),
        )
        .await
    }

    pub async fn forward_cache_invalidation(&self, payload: &Value) -> Result<Value> {
        self.json(
            self.with_key(self.http.post(self.admin_url("/admin/files/cache/invalidate")))
                .json(payload),
        )
        .await
    }
}
