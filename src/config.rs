use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use tracing::warn;

use crate::secrets::{self, SharedSecrets};

/// Bucket names for the four object-store areas the admin console touches.
#[derive(Debug, Clone)]
pub struct Buckets {
    pub designs: String,
    pub processing: String,
    pub previews: String,
    pub orders: String,
}

/// All configuration, resolved once at startup and carried in the router
/// state. There is no lazily-populated global; handlers read this by
/// reference.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub admin_api_base_url: String,
    pub collections_api_base_url: String,
    pub admin_api_key: String,
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub buckets: Buckets,
    pub output_directory: String,
    pub cloudfront_distribution_id: String,
    pub secrets_id: String,
    pub mongodb_uri: Option<String>,
    pub database_name: String,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            admin_api_base_url: "http://localhost:9100".to_string(),
            collections_api_base_url: "http://localhost:9101".to_string(),
            admin_api_key: String::new(),
            aws_region: "eu-north-1".to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            buckets: Buckets {
                designs: "coverartbucket".to_string(),
                processing: "cafprocessing".to_string(),
                previews: "cafpreviews".to_string(),
                orders: "caforders".to_string(),
            },
            output_directory: "output".to_string(),
            cloudfront_distribution_id: String::new(),
            secrets_id: "production/caf/shared".to_string(),
            mongodb_uri: None,
            database_name: "cafapp".to_string(),
        }
    }
}

impl AppConfig {
    /// Read configuration from the environment without touching the network.
    pub fn from_env_only() -> Result<Self> {
        let admin_api_base_url =
            env_opt("ADMIN_API_BASE_URL").context("ADMIN_API_BASE_URL is required")?;
        let collections_api_base_url =
            env_opt("COLLECTIONS_API_BASE_URL").context("COLLECTIONS_API_BASE_URL is required")?;

        Ok(Self {
            admin_api_base_url,
            collections_api_base_url,
            admin_api_key: env_or("ADMIN_API_KEY", ""),
            aws_region: env_or("APP_AWS_REGION", "eu-north-1"),
            aws_access_key_id: env_opt("APP_AWS_ACCESS_KEY_ID"),
            aws_secret_access_key: env_opt("APP_AWS_SECRET_ACCESS_KEY"),
            buckets: Buckets {
                designs: env_or("S3_DESIGNS_BUCKET", "coverartbucket"),
                processing: env_or("S3_PROCESSING_BUCKET", "cafprocessing"),
                previews: env_or("S3_PREVIEWS_BUCKET", "cafpreviews"),
                orders: env_or("S3_ORDERS_BUCKET", "caforders"),
            },
            output_directory: env_or("S3_OUTPUT_DIRECTORY", "output"),
            cloudfront_distribution_id: env_or("CLOUDFRONT_DISTRIBUTION_ID", ""),
            secrets_id: env_or("ADMIN_SECRETS_ID", "production/caf/shared"),
            mongodb_uri: env_opt("MONGODB_URI"),
            database_name: env_or("DATABASE_NAME", ""),
        })
    }

    /// Environment first, then a single Secrets Manager fetch for whatever is
    /// still blank. A failed fetch degrades to environment values with a
    /// warning; missing credentials then surface per-request as upstream
    /// errors.
    pub async fn load() -> Result<Self> {
        let mut config = Self::from_env_only()?;

        if config.admin_api_key.is_empty() || config.mongodb_uri.is_none() {
            match secrets::fetch_shared(&config.aws_region, &config.secrets_id).await {
                Ok(shared) => config.apply_secrets(shared),
                Err(err) => warn!(
                    error = %err,
                    "could not read shared secrets, using environment values only"
                ),
            }
        }

        if config.database_name.is_empty() {
            config.database_name = "cafapp".to_string();
        }
        Ok(config)
    }

    /// Fill blanks from the shared secret; explicit environment values win.
    pub fn apply_secrets(&mut self, shared: SharedSecrets) {
        if self.admin_api_key.is_empty() {
            if let Some(key) = shared.admin_api_key {
                self.admin_api_key = key;
            }
        }
        if self.mongodb_uri.is_none() {
            self.mongodb_uri = shared.mongodb_uri;
        }
        if self.database_name.is_empty() {
            if let Some(name) = shared.database_name {
                self.database_name = name;
            }
        }
    }

    /// SDK config for the AWS clients: explicit static credentials when
    /// configured, else the default provider chain (IAM role).
    pub async fn sdk_config(&self) -> aws_config::SdkConfig {
        let loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.aws_region.clone()));
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(id), Some(secret)) => {
                let credentials =
                    aws_sdk_s3::config::Credentials::new(id, secret, None, None, "caf-admin-env");
                loader.credentials_provider(credentials).load().await
            }
            _ => loader.load().await,
        }
    }
}
