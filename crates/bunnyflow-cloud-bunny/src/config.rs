//! Client configuration

use bunnyflow_cloud::RetryConfig;
use std::time::Duration;

/// Management API base URL
pub const DEFAULT_API_URL: &str = "https://api.bunny.net/";

/// Storage endpoint of the default (Falkenstein) region
pub const DEFAULT_STORAGE_URL: &str = "https://storage.bunnycdn.com/";

/// Configuration shared by the management and storage clients
#[derive(Clone)]
pub struct ClientConfig {
    pub api_key: String,
    pub base_url: String,
    /// Overrides the storage endpoint derived from the zone's region
    pub storage_url: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Per-request timeout for file uploads
    pub upload_timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_API_URL.to_string(),
            storage_url: None,
            timeout: Duration::from_secs(30),
            upload_timeout: Duration::from_secs(300),
            retry: RetryConfig::default(),
        }
    }

    /// Storage endpoint for a zone in `region`
    pub fn storage_url_for(&self, region: &str) -> String {
        if let Some(url) = &self.storage_url {
            return url.clone();
        }
        let region = region.trim().to_lowercase();
        if region.is_empty() || region == "de" {
            DEFAULT_STORAGE_URL.to_string()
        } else {
            format!("https://{}.storage.bunnycdn.com/", region)
        }
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("storage_url", &self.storage_url)
            .field("timeout", &self.timeout)
            .field("upload_timeout", &self.upload_timeout)
            .field("retry", &self.retry)
            .finish()
    }
}
