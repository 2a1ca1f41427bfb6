//! bunny.net edge storage client
//!
//! Storage requests authenticate with the zone password rather than the
//! account key, against the endpoint of the zone's region.

use crate::config::ClientConfig;
use crate::error::{BunnyError, Result};
use crate::http::{parse_base, send};
use async_trait::async_trait;
use bytes::Bytes;
use bunnyflow_cloud::model::{StorageObject, StorageZone};
use bunnyflow_cloud::{CloudError, RetryConfig, StorageApi, with_retry};
use reqwest::{Method, Url};
use std::path::Path;
use std::time::Duration;

/// File operations in one storage zone
pub struct BunnyStorage {
    client: reqwest::Client,
    endpoint: Url,
    zone: String,
    password: String,
    retry: RetryConfig,
    upload_timeout: Duration,
}

impl BunnyStorage {
    pub fn new(client: reqwest::Client, config: &ClientConfig, zone: &StorageZone) -> Result<Self> {
        if zone.password.is_empty() {
            return Err(BunnyError::InvalidConfig(format!(
                "storage zone '{}' has no password",
                zone.name
            )));
        }
        let endpoint = parse_base(&config.storage_url_for(&zone.region))?;
        tracing::debug!("Storage endpoint for {}: {}", zone.name, endpoint);

        Ok(Self {
            client,
            endpoint,
            zone: zone.name.clone(),
            password: zone.password.clone(),
            retry: config.retry.clone(),
            upload_timeout: config.upload_timeout,
        })
    }

    /// Endpoint URL for a storage path, with each segment percent-encoded
    fn url(&self, remote_path: &str, directory: bool) -> Result<Url> {
        let mut url = self.endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                BunnyError::InvalidConfig(format!("storage endpoint {} has no path", self.endpoint))
            })?;
            segments.pop_if_empty();
            segments.extend(remote_path.split('/').filter(|s| !s.is_empty()));
            if directory {
                segments.push("");
            }
        }
        Ok(url)
    }

    async fn call(
        &self,
        method: Method,
        remote_path: &str,
        url: Url,
        body: Option<Bytes>,
    ) -> bunnyflow_cloud::Result<String> {
        let what = format!("{} {}", method, remote_path);

        with_retry(&self.retry, &what, || {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header("AccessKey", &self.password);
            if let Some(data) = &body {
                request = request
                    .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
                    .timeout(self.upload_timeout)
                    .body(data.clone());
            }
            let method = method.to_string();
            let path = remote_path.to_string();
            async move { send(request, &method, &path).await.map_err(CloudError::from) }
        })
        .await
    }
}

#[async_trait]
impl StorageApi for BunnyStorage {
    async fn list(&self, path: &str) -> bunnyflow_cloud::Result<Vec<StorageObject>> {
        let url = self.url(path, true)?;
        let body = self.call(Method::GET, path, url, None).await?;
        let objects: Vec<StorageObject> = serde_json::from_str(&body)?;
        tracing::debug!("{} entries in {} ({})", objects.len(), path, self.zone);
        Ok(objects)
    }

    async fn upload(&self, local_path: &Path, remote_path: &str) -> bunnyflow_cloud::Result<()> {
        // Retries share this buffer rather than copying it per attempt
        let data = Bytes::from(tokio::fs::read(local_path).await?);
        let url = self.url(remote_path, false)?;
        self.call(Method::PUT, remote_path, url, Some(data)).await?;
        Ok(())
    }

    async fn delete(&self, remote_path: &str) -> bunnyflow_cloud::Result<()> {
        let url = self.url(remote_path, false)?;
        self.call(Method::DELETE, remote_path, url, None).await?;
        Ok(())
    }
}
