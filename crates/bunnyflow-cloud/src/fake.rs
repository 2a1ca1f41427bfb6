//! In-memory provider used by the orchestrator tests

use crate::error::{CloudError, Result};
use crate::model::{
    AddPullZone, AddStorageZone, DnsRecord, DnsRecordRequest, DnsZone, Hostname, PullZone,
    StorageObject, StorageZone, UpdateStorageZone,
};
use crate::provider::{CdnApi, StorageApi, remote_call_error};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct CdnState {
    dns_zone: Option<DnsZone>,
    storage_zones: Vec<StorageZone>,
    pull_zones: Vec<PullZone>,
    next_id: i64,
    calls: Vec<String>,
    failures: HashMap<String, (u16, String)>,
    omit_system_hostname: bool,
}

impl CdnState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        1000 + self.next_id
    }

    fn record(&mut self, op: &str) -> Result<()> {
        self.calls.push(op.to_string());
        match self.failures.get(op) {
            Some((status, body)) => Err(remote_call_error("FAKE", op, *status, body.clone())),
            None => Ok(()),
        }
    }

    fn with_pull_zones(&self, zone: &StorageZone) -> StorageZone {
        let mut zone = zone.clone();
        zone.pull_zones = self
            .pull_zones
            .iter()
            .filter(|p| p.storage_zone_id == zone.id)
            .cloned()
            .collect();
        zone
    }

    fn pull_zone_mut(&mut self, id: i64, op: &str) -> Result<&mut PullZone> {
        self.pull_zones
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| remote_call_error("FAKE", op, 404, "pull zone not found"))
    }
}

/// Fake account holding one DNS zone plus any zones the tests create
pub struct FakeCdn {
    state: Mutex<CdnState>,
    storage: Arc<FakeStorage>,
}

impl FakeCdn {
    pub fn new(dns_zone_id: i64, domain: &str) -> Self {
        let state = CdnState {
            dns_zone: Some(DnsZone {
                id: dns_zone_id,
                domain: domain.to_string(),
                records: Vec::new(),
            }),
            ..CdnState::default()
        };
        Self {
            state: Mutex::new(state),
            storage: Arc::new(FakeStorage::new("")),
        }
    }

    pub fn storage_handle(&self) -> Arc<FakeStorage> {
        Arc::clone(&self.storage)
    }

    /// Make every call of `op` fail with `status` and `body`
    pub fn fail_on(&self, op: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op.to_string(), (status, body.to_string()));
    }

    /// New pull zones come without a system hostname
    pub fn omit_system_hostname(&self) {
        self.state.lock().unwrap().omit_system_hostname = true;
    }

    pub fn insert_storage_zone(&self, name: &str, rewrite_404_to_200: bool) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        state.storage_zones.push(StorageZone {
            id,
            name: name.to_string(),
            password: "storage-password".into(),
            region: "DE".into(),
            rewrite_404_to_200,
            pull_zones: Vec::new(),
        });
        id
    }

    pub fn insert_dns_record(&self, name: &str, value: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        if let Some(zone) = state.dns_zone.as_mut() {
            zone.records.push(DnsRecord {
                id,
                record_type: crate::model::RECORD_TYPE_CNAME,
                name: name.to_string(),
                value: value.to_string(),
                ttl: 300,
            });
        }
        id
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls().iter().filter(|c| *c == op).count()
    }

    /// Number of calls that create a resource
    pub fn create_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("add_")).count()
    }

    pub fn storage_zones(&self) -> Vec<StorageZone> {
        let state = self.state.lock().unwrap();
        state
            .storage_zones
            .iter()
            .map(|z| state.with_pull_zones(z))
            .collect()
    }

    pub fn dns_records(&self) -> Vec<DnsRecord> {
        let state = self.state.lock().unwrap();
        state
            .dns_zone
            .as_ref()
            .map(|z| z.records.clone())
            .unwrap_or_default()
    }

    pub fn pull_zones(&self) -> Vec<PullZone> {
        self.state.lock().unwrap().pull_zones.clone()
    }
}

#[async_trait]
impl CdnApi for FakeCdn {
    async fn get_dns_zone(&self, zone_id: i64) -> Result<DnsZone> {
        let mut state = self.state.lock().unwrap();
        state.record("get_dns_zone")?;
        state
            .dns_zone
            .clone()
            .filter(|z| z.id == zone_id)
            .ok_or_else(|| remote_call_error("GET", "dnszone", 404, "dns zone not found"))
    }

    async fn list_storage_zones(&self) -> Result<Vec<StorageZone>> {
        let mut state = self.state.lock().unwrap();
        state.record("list_storage_zones")?;
        Ok(state
            .storage_zones
            .iter()
            .map(|z| state.with_pull_zones(z))
            .collect())
    }

    async fn get_storage_zone(&self, id: i64) -> Result<StorageZone> {
        let mut state = self.state.lock().unwrap();
        state.record("get_storage_zone")?;
        state
            .storage_zones
            .iter()
            .find(|z| z.id == id)
            .map(|z| state.with_pull_zones(z))
            .ok_or_else(|| remote_call_error("GET", "storagezone", 404, "storage zone not found"))
    }

    async fn add_storage_zone(&self, request: &AddStorageZone) -> Result<StorageZone> {
        let mut state = self.state.lock().unwrap();
        state.record("add_storage_zone")?;
        let zone = StorageZone {
            id: state.next_id(),
            name: request.name.clone(),
            password: "storage-password".into(),
            region: request.region.clone(),
            rewrite_404_to_200: false,
            pull_zones: Vec::new(),
        };
        state.storage_zones.push(zone.clone());
        Ok(zone)
    }

    async fn update_storage_zone(&self, id: i64, request: &UpdateStorageZone) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("update_storage_zone")?;
        let zone = state
            .storage_zones
            .iter_mut()
            .find(|z| z.id == id)
            .ok_or_else(|| remote_call_error("POST", "storagezone", 404, "storage zone not found"))?;
        if let Some(flag) = request.rewrite_404_to_200 {
            zone.rewrite_404_to_200 = flag;
        }
        Ok(())
    }

    async fn list_pull_zones(&self) -> Result<Vec<PullZone>> {
        let mut state = self.state.lock().unwrap();
        state.record("list_pull_zones")?;
        Ok(state.pull_zones.clone())
    }

    async fn add_pull_zone(&self, request: &AddPullZone) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("add_pull_zone")?;
        let id = state.next_id();
        let hostnames = if state.omit_system_hostname {
            Vec::new()
        } else {
            vec![Hostname {
                id: state.next_id(),
                value: format!("{}.b-cdn.net", request.name),
                is_system_hostname: true,
                force_ssl: false,
                has_certificate: true,
            }]
        };
        state.pull_zones.push(PullZone {
            id,
            name: request.name.clone(),
            hostnames,
            storage_zone_id: request.storage_zone_id,
        });
        Ok(())
    }

    async fn add_dns_record(&self, zone_id: i64, record: &DnsRecordRequest) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("add_dns_record")?;
        let id = state.next_id();
        let zone = state
            .dns_zone
            .as_mut()
            .filter(|z| z.id == zone_id)
            .ok_or_else(|| remote_call_error("PUT", "dnszone", 404, "dns zone not found"))?;
        zone.records.push(DnsRecord {
            id,
            record_type: record.record_type,
            name: record.name.clone(),
            value: record.value.clone(),
            ttl: record.ttl,
        });
        Ok(())
    }

    async fn update_dns_record(
        &self,
        zone_id: i64,
        record_id: i64,
        record: &DnsRecordRequest,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("update_dns_record")?;
        let existing = state
            .dns_zone
            .as_mut()
            .filter(|z| z.id == zone_id)
            .and_then(|z| z.records.iter_mut().find(|r| r.id == record_id))
            .ok_or_else(|| remote_call_error("POST", "dnszone", 404, "record not found"))?;
        existing.value = record.value.clone();
        existing.ttl = record.ttl;
        Ok(())
    }

    async fn add_hostname(&self, pull_zone_id: i64, hostname: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("add_hostname")?;
        let id = state.next_id();
        state
            .pull_zone_mut(pull_zone_id, "add_hostname")?
            .hostnames
            .push(Hostname {
                id,
                value: hostname.to_string(),
                is_system_hostname: false,
                force_ssl: false,
                has_certificate: false,
            });
        Ok(())
    }

    async fn load_free_certificate(&self, hostname: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("load_free_certificate")?;
        for zone in state.pull_zones.iter_mut() {
            for h in zone.hostnames.iter_mut() {
                if h.value.eq_ignore_ascii_case(hostname) {
                    h.has_certificate = true;
                }
            }
        }
        Ok(())
    }

    async fn set_force_ssl(
        &self,
        pull_zone_id: i64,
        hostname: &str,
        force_ssl: bool,
    ) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.record("set_force_ssl")?;
        let zone = state.pull_zone_mut(pull_zone_id, "set_force_ssl")?;
        let entry = zone
            .hostnames
            .iter_mut()
            .find(|h| h.value.eq_ignore_ascii_case(hostname))
            .ok_or_else(|| remote_call_error("POST", "setForceSSL", 400, "unknown hostname"))?;
        entry.force_ssl = force_ssl;
        Ok(())
    }

    async fn purge_cache(&self, _pull_zone_id: i64) -> Result<()> {
        self.state.lock().unwrap().record("purge_cache")
    }

    fn storage(&self, _zone: &StorageZone) -> Result<Arc<dyn StorageApi>> {
        let storage: Arc<dyn StorageApi> = self.storage.clone();
        Ok(storage)
    }
}

#[derive(Default)]
struct StorageState {
    files: BTreeSet<String>,
    ops: Vec<String>,
    failing_lists: BTreeSet<String>,
    failing_uploads: BTreeMap<String, (u16, String)>,
}

/// Flat in-memory file store keyed by full storage path
pub struct FakeStorage {
    zone: String,
    state: Mutex<StorageState>,
}

impl FakeStorage {
    pub fn new(zone: &str) -> Self {
        Self {
            zone: zone.to_string(),
            state: Mutex::new(StorageState::default()),
        }
    }

    pub fn insert(&self, full_path: &str) {
        self.state.lock().unwrap().files.insert(full_path.to_string());
    }

    pub fn fail_list(&self, path: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_lists
            .insert(path.to_string());
    }

    pub fn fail_upload(&self, remote_path: &str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failing_uploads
            .insert(remote_path.to_string(), (status, body.to_string()));
    }

    pub fn files(&self) -> Vec<String> {
        self.state.lock().unwrap().files.iter().cloned().collect()
    }

    /// `put <path>` / `delete <path>` in execution order
    pub fn ops(&self) -> Vec<String> {
        self.state.lock().unwrap().ops.clone()
    }
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn list(&self, path: &str) -> Result<Vec<StorageObject>> {
        let state = self.state.lock().unwrap();
        if state.failing_lists.contains(path) {
            return Err(remote_call_error("GET", path, 500, "listing failed"));
        }

        let mut dirs = BTreeSet::new();
        let mut objects = Vec::new();
        for file in state.files.iter() {
            let Some(rest) = file.strip_prefix(path) else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    dirs.insert(dir.to_string());
                }
                None => objects.push(StorageObject {
                    object_name: rest.to_string(),
                    path: path.to_string(),
                    is_directory: false,
                    storage_zone_name: self.zone.clone(),
                    length: 1,
                }),
            }
        }
        objects.extend(dirs.into_iter().map(|dir| StorageObject {
            object_name: dir,
            path: path.to_string(),
            is_directory: true,
            storage_zone_name: self.zone.clone(),
            length: 0,
        }));
        Ok(objects)
    }

    async fn upload(&self, local_path: &Path, remote_path: &str) -> Result<()> {
        if !local_path.is_file() {
            return Err(CloudError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", local_path.display()),
            )));
        }
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("put {}", remote_path));
        if let Some((status, body)) = state.failing_uploads.get(remote_path) {
            return Err(remote_call_error("PUT", remote_path, *status, body.clone()));
        }
        state.files.insert(remote_path.to_string());
        Ok(())
    }

    async fn delete(&self, remote_path: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.ops.push(format!("delete {}", remote_path));
        state.files.remove(remote_path);
        Ok(())
    }
}
