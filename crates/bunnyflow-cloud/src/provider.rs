//! CDN provider traits
//!
//! The orchestrator only talks to the provider through these traits. The
//! bunny.net implementation lives in `bunnyflow-cloud-bunny`; tests use an
//! in-memory fake.

use crate::error::{CloudError, Result};
use crate::model::{
    AddPullZone, AddStorageZone, DnsRecordRequest, DnsZone, PullZone, StorageObject, StorageZone,
    UpdateStorageZone,
};
use async_trait::async_trait;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Account-level CDN and DNS management API
#[async_trait]
pub trait CdnApi: Send + Sync {
    async fn get_dns_zone(&self, zone_id: i64) -> Result<DnsZone>;

    async fn list_storage_zones(&self) -> Result<Vec<StorageZone>>;

    async fn get_storage_zone(&self, id: i64) -> Result<StorageZone>;

    async fn add_storage_zone(&self, request: &AddStorageZone) -> Result<StorageZone>;

    async fn update_storage_zone(&self, id: i64, request: &UpdateStorageZone) -> Result<()>;

    async fn list_pull_zones(&self) -> Result<Vec<PullZone>>;

    /// Create a pull zone. The response is not relied upon; callers re-fetch
    /// the storage zone to see the result.
    async fn add_pull_zone(&self, request: &AddPullZone) -> Result<()>;

    async fn add_dns_record(&self, zone_id: i64, record: &DnsRecordRequest) -> Result<()>;

    async fn update_dns_record(
        &self,
        zone_id: i64,
        record_id: i64,
        record: &DnsRecordRequest,
    ) -> Result<()>;

    async fn add_hostname(&self, pull_zone_id: i64, hostname: &str) -> Result<()>;

    async fn load_free_certificate(&self, hostname: &str) -> Result<()>;

    async fn set_force_ssl(&self, pull_zone_id: i64, hostname: &str, force_ssl: bool)
    -> Result<()>;

    async fn purge_cache(&self, pull_zone_id: i64) -> Result<()>;

    /// File storage client authenticated for `zone`
    fn storage(&self, zone: &StorageZone) -> Result<Arc<dyn StorageApi>>;
}

/// File operations inside one storage zone
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Immediate children of the directory at `path` (`/zone/dir/`)
    async fn list(&self, path: &str) -> Result<Vec<StorageObject>>;

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()>;

    async fn delete(&self, remote_path: &str) -> Result<()>;
}

/// Retry configuration for provider operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first
    pub max_attempts: u32,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn next_delay(&self, delay: Duration) -> Duration {
        delay
            .mul_f64(self.backoff_multiplier.max(1.0))
            .min(self.max_delay)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// Only errors for which [`CloudError::is_transient`] holds are retried.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    let mut delay = config.initial_delay;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < max_attempts => {
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    what,
                    attempt,
                    max_attempts,
                    e,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                delay = config.next_delay(delay);
            }
            Err(e) => return Err(e),
        }
    }
}

/// Shorthand used by implementations for a failed status
pub fn remote_call_error(
    method: &str,
    path: &str,
    status: u16,
    body: impl Into<String>,
) -> CloudError {
    CloudError::RemoteCall {
        method: method.to_string(),
        path: path.to_string(),
        status,
        body: body.into(),
    }
}
