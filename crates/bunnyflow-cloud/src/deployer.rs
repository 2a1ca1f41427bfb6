//! Deployment orchestrator
//!
//! Runs the provisioning steps in a fixed order. Files are reconciled as soon
//! as the pull zone exists, before DNS and certificates, so content is
//! published even when a fresh hostname cannot be certified yet. Every step is
//! an idempotent ensure, so a failed run is recovered by running it again.

use crate::action::{ActionType, DeployReport, ProvisionStep, StepOutcome, SyncStage};
use crate::error::{CloudError, Result};
use crate::model::{
    AddPullZone, AddStorageZone, DnsRecordRequest, DnsZone, PullZone, REGION_GERMANY,
    StorageZone, UpdateStorageZone, ZONE_TIER_SSD,
};
use crate::provider::{CdnApi, StorageApi};
use crate::reporter::{DeployReporter, TracingReporter};
use crate::walker::walk_tree;
use bunnyflow_core::{
    DeploymentInputs, FileEntry, ResourceIdentity, SyncPlan, SyncSummary, find_single, names_match,
    scan_local_files,
};
use futures_util::{TryStreamExt, stream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Tunables for a deployment run
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// File operations in flight within one sync stage
    pub concurrency: usize,
    /// Directory listings in flight while walking remote storage
    pub walk_concurrency: usize,
    /// Region for newly created storage zones
    pub storage_region: String,
    pub zone_tier: i32,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            concurrency: 8,
            walk_concurrency: 4,
            storage_region: REGION_GERMANY.to_string(),
            zone_tier: ZONE_TIER_SSD,
        }
    }
}

/// Provisions CDN resources for a branch and syncs its content
pub struct Deployer {
    api: Arc<dyn CdnApi>,
    reporter: Arc<dyn DeployReporter>,
    config: DeployConfig,
    shutdown: Arc<AtomicBool>,
}

impl Deployer {
    pub fn new(api: Arc<dyn CdnApi>) -> Self {
        Self {
            api,
            reporter: Arc::new(TracingReporter),
            config: DeployConfig::default(),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn DeployReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_config(mut self, config: DeployConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a cancellation flag; setting it stops the run at the next checkpoint
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    pub fn shutdown_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    fn check_cancelled(&self) -> Result<()> {
        if self.shutdown.load(Ordering::SeqCst) {
            Err(CloudError::Cancelled)
        } else {
            Ok(())
        }
    }

    fn begin(&self, step: ProvisionStep) -> Result<()> {
        self.check_cancelled()?;
        self.reporter.step_started(step);
        Ok(())
    }

    fn finish(
        &self,
        steps: &mut Vec<StepOutcome>,
        step: ProvisionStep,
        action: ActionType,
        message: impl Into<String>,
    ) {
        let outcome = StepOutcome::new(step, action, message);
        self.reporter.step_finished(&outcome);
        steps.push(outcome);
    }

    /// Run every step for `inputs` and return what was done.
    ///
    /// The first failure aborts the run; resources created before it remain.
    pub async fn run(&self, inputs: &DeploymentInputs) -> Result<DeployReport> {
        let started = Instant::now();
        let mut steps = Vec::with_capacity(ProvisionStep::ALL.len());

        // DNS zone
        self.begin(ProvisionStep::DnsZone)?;
        let dns_zone = self.api.get_dns_zone(inputs.dns_zone_id()).await?;
        let identity = ResourceIdentity::from_inputs(inputs, &dns_zone.domain)?;
        self.reporter.identity_resolved(&identity);
        self.finish(
            &mut steps,
            ProvisionStep::DnsZone,
            ActionType::NoOp,
            format!("found {}", dns_zone.domain),
        );

        // Storage zone
        self.begin(ProvisionStep::StorageZone)?;
        let (storage_zone, action) = self.ensure_storage_zone(&identity.resource_name).await?;
        self.finish(
            &mut steps,
            ProvisionStep::StorageZone,
            action,
            format!("{} (id {})", storage_zone.name, storage_zone.id),
        );

        // 404 rewrite
        self.begin(ProvisionStep::Rewrite404)?;
        let (storage_zone, action) = self.ensure_rewrite_404(storage_zone).await?;
        self.finish(
            &mut steps,
            ProvisionStep::Rewrite404,
            action,
            "404 responses rewritten to 200",
        );

        // Pull zone
        self.begin(ProvisionStep::PullZone)?;
        let (pull_zone, action) = self
            .ensure_pull_zone(&identity.resource_name, &storage_zone)
            .await?;
        self.finish(
            &mut steps,
            ProvisionStep::PullZone,
            action,
            format!("{} (id {})", pull_zone.name, pull_zone.id),
        );

        let cname_target = pull_zone
            .system_hostname()
            .map(|h| h.value.clone())
            .ok_or_else(|| {
                CloudError::InvariantViolation(format!(
                    "pull zone '{}' must have exactly one system hostname",
                    pull_zone.name
                ))
            })?;

        // File sync
        self.begin(ProvisionStep::FileSync)?;
        let sync = self.sync_files(inputs, &storage_zone).await?;
        let action = if sync.total() == 0 {
            ActionType::NoOp
        } else {
            ActionType::Update
        };
        self.finish(&mut steps, ProvisionStep::FileSync, action, sync.to_string());

        // DNS record
        self.begin(ProvisionStep::DnsRecord)?;
        let action = self
            .ensure_dns_record(&dns_zone, &identity.subdomain, &cname_target)
            .await?;
        let record_label = if identity.is_apex() {
            "@"
        } else {
            identity.subdomain.as_str()
        };
        self.finish(
            &mut steps,
            ProvisionStep::DnsRecord,
            action,
            format!("{} CNAME {}", record_label, cname_target),
        );

        // Custom hostname
        self.begin(ProvisionStep::CustomHostname)?;
        let hostname = pull_zone.find_hostname(&identity.deployment_name);
        let action = if hostname.is_some() {
            tracing::debug!("Hostname {} already attached", identity.deployment_name);
            ActionType::NoOp
        } else {
            tracing::info!(
                "Adding hostname {} to pull zone {}",
                identity.deployment_name,
                pull_zone.id
            );
            self.api
                .add_hostname(pull_zone.id, &identity.deployment_name)
                .await?;
            ActionType::Create
        };
        self.finish(
            &mut steps,
            ProvisionStep::CustomHostname,
            action,
            identity.deployment_name.clone(),
        );

        // SSL
        self.begin(ProvisionStep::Ssl)?;
        let action = if hostname.is_some_and(|h| h.force_ssl) {
            ActionType::NoOp
        } else {
            tracing::info!("Requesting certificate for {}", identity.deployment_name);
            self.api
                .load_free_certificate(&identity.deployment_name)
                .await?;
            self.api
                .set_force_ssl(pull_zone.id, &identity.deployment_name, true)
                .await?;
            ActionType::Update
        };
        self.finish(&mut steps, ProvisionStep::Ssl, action, "HTTPS enforced");

        // Cache purge
        self.begin(ProvisionStep::CachePurge)?;
        self.api.purge_cache(pull_zone.id).await?;
        self.finish(
            &mut steps,
            ProvisionStep::CachePurge,
            ActionType::Update,
            format!("pull zone {}", pull_zone.id),
        );

        Ok(DeployReport {
            identity,
            storage_zone: storage_zone.name,
            pull_zone_id: pull_zone.id,
            cname_target,
            steps,
            sync,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn ensure_storage_zone(&self, name: &str) -> Result<(StorageZone, ActionType)> {
        let zones = self.api.list_storage_zones().await?;
        if let Some(existing) = find_single(&zones, name, |z| z.name.as_str())? {
            tracing::debug!("Reusing storage zone {} (id {})", existing.name, existing.id);
            return Ok((existing.clone(), ActionType::NoOp));
        }

        tracing::info!("Creating storage zone {}", name);
        let created = self
            .api
            .add_storage_zone(&AddStorageZone {
                name: name.to_string(),
                region: self.config.storage_region.clone(),
                zone_tier: self.config.zone_tier,
            })
            .await?;
        if created.id <= 0 || created.name.is_empty() {
            return Err(CloudError::InvariantViolation(format!(
                "storage zone '{}' was created without an id",
                name
            )));
        }
        Ok((created, ActionType::Create))
    }

    async fn ensure_rewrite_404(&self, zone: StorageZone) -> Result<(StorageZone, ActionType)> {
        if zone.rewrite_404_to_200 {
            return Ok((zone, ActionType::NoOp));
        }

        tracing::info!("Enabling 404 rewrite on storage zone {}", zone.name);
        self.api
            .update_storage_zone(
                zone.id,
                &UpdateStorageZone {
                    rewrite_404_to_200: Some(true),
                },
            )
            .await?;
        let refreshed = self.api.get_storage_zone(zone.id).await?;
        Ok((refreshed, ActionType::Update))
    }

    async fn ensure_pull_zone(
        &self,
        name: &str,
        storage_zone: &StorageZone,
    ) -> Result<(PullZone, ActionType)> {
        let zones = self.api.list_pull_zones().await?;
        if let Some(existing) = find_single(&zones, name, |z| z.name.as_str())? {
            tracing::debug!("Reusing pull zone {} (id {})", existing.name, existing.id);
            return Ok((existing.clone(), ActionType::NoOp));
        }

        tracing::info!(
            "Creating pull zone {} for storage zone {}",
            name,
            storage_zone.id
        );
        self.api
            .add_pull_zone(&AddPullZone::for_storage_zone(name, storage_zone.id))
            .await?;

        let refreshed = self.api.get_storage_zone(storage_zone.id).await?;
        let created = find_single(&refreshed.pull_zones, name, |z| z.name.as_str())?
            .cloned()
            .ok_or_else(|| {
                CloudError::InvariantViolation(format!(
                    "storage zone '{}' has no pull zone '{}' after creation",
                    refreshed.name, name
                ))
            })?;
        Ok((created, ActionType::Create))
    }

    async fn ensure_dns_record(
        &self,
        dns_zone: &DnsZone,
        subdomain: &str,
        target: &str,
    ) -> Result<ActionType> {
        let records = dns_zone.cname_records();
        let record = DnsRecordRequest::cname(subdomain, target);

        match find_single(&records, subdomain, |r| r.name.as_str())? {
            Some(existing) if names_match(&existing.value, target) => {
                tracing::debug!("CNAME '{}' already points at {}", subdomain, target);
                Ok(ActionType::NoOp)
            }
            Some(existing) => {
                tracing::info!(
                    "Updating CNAME '{}' from {} to {}",
                    subdomain,
                    existing.value,
                    target
                );
                self.api
                    .update_dns_record(dns_zone.id, existing.id, &record)
                    .await?;
                Ok(ActionType::Update)
            }
            None => {
                tracing::info!("Creating CNAME '{}' -> {}", subdomain, target);
                self.api.add_dns_record(dns_zone.id, &record).await?;
                Ok(ActionType::Create)
            }
        }
    }

    async fn sync_files(
        &self,
        inputs: &DeploymentInputs,
        storage_zone: &StorageZone,
    ) -> Result<SyncSummary> {
        let zone = storage_zone.name.clone();
        let content_root = inputs.content_root();
        let storage = self.api.storage(storage_zone)?;

        let local = {
            let root = content_root.clone();
            let zone = zone.clone();
            tokio::task::spawn_blocking(move || scan_local_files(&root, &zone))
                .await
                .map_err(|e| CloudError::Io(std::io::Error::other(e)))??
        };

        self.check_cancelled()?;
        let remote: Vec<FileEntry> = walk_tree(
            storage.as_ref(),
            &format!("/{}/", zone),
            self.config.walk_concurrency,
        )
        .await?
        .iter()
        .map(|object| FileEntry::from_remote(&object.full_path(), &content_root, &zone))
        .collect();

        tracing::debug!(
            "{} local files, {} remote files",
            local.len(),
            remote.len()
        );

        let plan = SyncPlan::compute(&local, &remote, inputs.debug_limit());
        let summary = plan.summary();
        self.reporter.sync_planned(&summary);

        self.run_stage(storage.as_ref(), SyncStage::Upload, &plan.to_upload)
            .await?;
        self.run_stage(storage.as_ref(), SyncStage::Update, &plan.to_update)
            .await?;
        self.run_stage(storage.as_ref(), SyncStage::Delete, &plan.to_delete)
            .await?;

        Ok(summary)
    }

    async fn run_stage(
        &self,
        storage: &dyn StorageApi,
        stage: SyncStage,
        files: &[FileEntry],
    ) -> Result<()> {
        if files.is_empty() {
            return Ok(());
        }
        self.reporter.stage_started(stage, files.len());

        stream::iter(files.iter().map(Ok::<_, CloudError>))
            .try_for_each_concurrent(self.config.concurrency.max(1), |file| async move {
                self.check_cancelled()?;
                let remote = file.remote_path();
                match stage {
                    SyncStage::Upload | SyncStage::Update => {
                        storage.upload(&file.local_path(), &remote).await?
                    }
                    SyncStage::Delete => storage.delete(&remote).await?,
                }
                self.reporter.file_done(stage, file.relative_path());
                Ok(())
            })
            .await?;

        self.reporter.stage_finished(stage);
        Ok(())
    }
}
