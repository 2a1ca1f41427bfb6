//! bunny.net management API client
//!
//! Authenticates with the account `AccessKey` header. Reads, updates and
//! purges are retried on transient failures according to the configured
//! [`RetryConfig`]. Create calls get a single attempt: a create whose response
//! was lost may already have been applied, and sending it again leaves a
//! duplicate that later lookups reject as ambiguous.

use crate::config::ClientConfig;
use crate::error::{BunnyError, Result};
use crate::http::{USER_AGENT, parse_base, send};
use crate::storage::BunnyStorage;
use async_trait::async_trait;
use bunnyflow_cloud::model::{
    AddHostname, AddPullZone, AddStorageZone, DnsRecordRequest, DnsZone, PullZone, SetForceSsl,
    StorageZone, UpdateStorageZone,
};
use bunnyflow_cloud::{CdnApi, CloudError, RetryConfig, StorageApi, with_retry};
use reqwest::{Method, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

const PAGE_SIZE: usize = 1000;
const MAX_PAGES: usize = 100;

/// List endpoints answer either with a bare array or a paged envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Page<T> {
    items: Vec<T>,
    #[serde(default)]
    current_page: i64,
    #[serde(default)]
    total_items: i64,
    #[serde(default)]
    has_more_items: bool,
}

fn decode<T: DeserializeOwned>(body: &str) -> bunnyflow_cloud::Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// bunny.net account API
pub struct BunnyApi {
    client: reqwest::Client,
    base_url: Url,
    config: ClientConfig,
}

impl BunnyApi {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Self::with_client(config, client)
    }

    /// Use an already built HTTP client; its timeout and proxy settings apply
    pub fn with_client(config: ClientConfig, client: reqwest::Client) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(BunnyError::InvalidConfig("API key is empty".into()));
        }
        let base_url = parse_base(&config.base_url)?;

        Ok(Self {
            client,
            base_url,
            config,
        })
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BunnyError::InvalidConfig(format!("invalid API path '{}': {}", path, e)))
    }

    async fn call(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
        retry: &RetryConfig,
    ) -> bunnyflow_cloud::Result<String> {
        let url = self.url(path)?;
        let what = format!("{} {}", method, path);

        with_retry(retry, &what, || {
            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header("AccessKey", &self.config.api_key)
                .header(reqwest::header::ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = &body {
                request = request.json(body);
            }
            let method = method.to_string();
            let path = path.to_string();
            async move { send(request, &method, &path).await.map_err(CloudError::from) }
        })
        .await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> bunnyflow_cloud::Result<T> {
        let body = self
            .call(Method::GET, path, &[], None, &self.config.retry)
            .await?;
        decode(&body)
    }

    async fn send_json<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> bunnyflow_cloud::Result<String> {
        let value = serde_json::to_value(body)?;
        self.call(method, path, &[], Some(value), &self.config.retry)
            .await
    }

    /// Like [`send_json`](Self::send_json) but never retried
    async fn create_json<B: serde::Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> bunnyflow_cloud::Result<String> {
        let value = serde_json::to_value(body)?;
        self.call(method, path, &[], Some(value), &RetryConfig::none())
            .await
    }

    async fn list_paged<T: DeserializeOwned>(&self, path: &str) -> bunnyflow_cloud::Result<Vec<T>> {
        let mut items = Vec::new();

        for page in 1..=MAX_PAGES {
            let query = [("page", page.to_string()), ("perPage", PAGE_SIZE.to_string())];
            let body = self
                .call(Method::GET, path, &query, None, &self.config.retry)
                .await?;

            match decode::<Listing<T>>(&body)? {
                Listing::Plain(all) => {
                    items.extend(all);
                    return Ok(items);
                }
                Listing::Paged(listing) => {
                    tracing::debug!(
                        "{} page {}: {} items of {}",
                        path,
                        listing.current_page,
                        listing.items.len(),
                        listing.total_items
                    );
                    items.extend(listing.items);
                    if !listing.has_more_items {
                        return Ok(items);
                    }
                }
            }
        }

        Err(CloudError::InvariantViolation(format!(
            "{} returned more than {} pages",
            path, MAX_PAGES
        )))
    }
}

#[async_trait]
impl CdnApi for BunnyApi {
    async fn get_dns_zone(&self, zone_id: i64) -> bunnyflow_cloud::Result<DnsZone> {
        self.get(&format!("dnszone/{}", zone_id)).await
    }

    async fn list_storage_zones(&self) -> bunnyflow_cloud::Result<Vec<StorageZone>> {
        self.list_paged("storagezone").await
    }

    async fn get_storage_zone(&self, id: i64) -> bunnyflow_cloud::Result<StorageZone> {
        self.get(&format!("storagezone/{}", id)).await
    }

    async fn add_storage_zone(
        &self,
        request: &AddStorageZone,
    ) -> bunnyflow_cloud::Result<StorageZone> {
        let body = self.create_json(Method::POST, "storagezone", request).await?;
        decode(&body)
    }

    async fn update_storage_zone(
        &self,
        id: i64,
        request: &UpdateStorageZone,
    ) -> bunnyflow_cloud::Result<()> {
        self.send_json(Method::POST, &format!("storagezone/{}", id), request)
            .await?;
        Ok(())
    }

    async fn list_pull_zones(&self) -> bunnyflow_cloud::Result<Vec<PullZone>> {
        self.list_paged("pullzone").await
    }

    async fn add_pull_zone(&self, request: &AddPullZone) -> bunnyflow_cloud::Result<()> {
        self.create_json(Method::POST, "pullzone", request).await?;
        Ok(())
    }

    async fn add_dns_record(
        &self,
        zone_id: i64,
        record: &DnsRecordRequest,
    ) -> bunnyflow_cloud::Result<()> {
        self.create_json(Method::PUT, &format!("dnszone/{}/records", zone_id), record)
            .await?;
        Ok(())
    }

    async fn update_dns_record(
        &self,
        zone_id: i64,
        record_id: i64,
        record: &DnsRecordRequest,
    ) -> bunnyflow_cloud::Result<()> {
        self.send_json(
            Method::POST,
            &format!("dnszone/{}/records/{}", zone_id, record_id),
            record,
        )
        .await?;
        Ok(())
    }

    async fn add_hostname(&self, pull_zone_id: i64, hostname: &str) -> bunnyflow_cloud::Result<()> {
        let body = AddHostname {
            hostname: hostname.to_string(),
        };
        self.create_json(
            Method::POST,
            &format!("pullzone/{}/addHostname", pull_zone_id),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn load_free_certificate(&self, hostname: &str) -> bunnyflow_cloud::Result<()> {
        self.call(
            Method::GET,
            "pullzone/loadFreeCertificate",
            &[("hostname", hostname.to_string())],
            None,
            &self.config.retry,
        )
        .await?;
        Ok(())
    }

    async fn set_force_ssl(
        &self,
        pull_zone_id: i64,
        hostname: &str,
        force_ssl: bool,
    ) -> bunnyflow_cloud::Result<()> {
        let body = SetForceSsl {
            hostname: hostname.to_string(),
            force_ssl,
        };
        self.send_json(
            Method::POST,
            &format!("pullzone/{}/setForceSSL", pull_zone_id),
            &body,
        )
        .await?;
        Ok(())
    }

    async fn purge_cache(&self, pull_zone_id: i64) -> bunnyflow_cloud::Result<()> {
        self.call(
            Method::POST,
            &format!("pullzone/{}/purgeCache", pull_zone_id),
            &[],
            None,
            &self.config.retry,
        )
        .await?;
        Ok(())
    }

    fn storage(&self, zone: &StorageZone) -> bunnyflow_cloud::Result<Arc<dyn StorageApi>> {
        let storage = BunnyStorage::new(self.client.clone(), &self.config, zone)?;
        Ok(Arc::new(storage))
    }
}
