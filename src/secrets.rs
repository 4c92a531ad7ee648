use anyhow::{anyhow, Context, Result};
use aws_config::{BehaviorVersion, Region};
use serde::Deserialize;
use tracing::debug;

/// JSON payload of the shared admin secret in AWS Secrets Manager.
/// Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SharedSecrets {
    #[serde(rename = "MONGODB_URI")]
    pub mongodb_uri: Option<String>,
    #[serde(rename = "DATABASE_NAME")]
    pub database_name: Option<String>,
    #[serde(rename = "ADMIN_API_KEY")]
    pub admin_api_key: Option<String>,
}

/// One-shot fetch of the shared secret. Called once at startup; a rotated
/// secret requires a process restart to take effect.
pub async fn fetch_shared(region: &str, secret_id: &str) -> Result<SharedSecrets> {
    let sdk = aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await;
    let client = aws_sdk_secretsmanager::Client::new(&sdk);

    debug!("Fetching shared secrets from {secret_id}");
    let response = client
        .get_secret_value()
        .secret_id(secret_id)
        .send()
        .await
        .with_context(|| format!("failed to fetch secret {secret_id}"))?;

    let raw = response
        .secret_string()
        .ok_or_else(|| anyhow!("secret {secret_id} has no string payload"))?;
    serde_json::from_str(raw).with_context(|| format!("secret {secret_id} is not valid JSON"))
}
