//! Remote entities and request bodies
//!
//! Field names follow the provider's PascalCase JSON.

use serde::{Deserialize, Deserializer, Serialize};

/// Storage region used when creating a storage zone
pub const REGION_GERMANY: &str = "DE";

/// Standard (SSD) storage tier
pub const ZONE_TIER_SSD: i32 = 1;

/// Pull zone origin backed by a storage zone
pub const ORIGIN_TYPE_STORAGE_ZONE: i32 = 2;

/// Standard pull zone tier
pub const PULL_ZONE_TYPE_STANDARD: i32 = 0;

/// DNS record type id for CNAME
pub const RECORD_TYPE_CNAME: i32 = 2;

/// TTL of the deployment CNAME in seconds
pub const CNAME_TTL: i64 = 300;

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageZone {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(default)]
    pub rewrite_404_to_200: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pull_zones: Vec<PullZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PullZone {
    pub id: i64,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub hostnames: Vec<Hostname>,
    #[serde(default)]
    pub storage_zone_id: i64,
}

impl PullZone {
    /// The provider-assigned hostname, used as CNAME target.
    ///
    /// Returns `None` unless exactly one system hostname exists.
    pub fn system_hostname(&self) -> Option<&Hostname> {
        let mut system = self.hostnames.iter().filter(|h| h.is_system_hostname);
        match (system.next(), system.next()) {
            (Some(hostname), None) => Some(hostname),
            _ => None,
        }
    }

    pub fn find_hostname(&self, value: &str) -> Option<&Hostname> {
        self.hostnames
            .iter()
            .find(|h| bunnyflow_core::names_match(&h.value, value))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Hostname {
    #[serde(default)]
    pub id: i64,
    pub value: String,
    #[serde(default)]
    pub is_system_hostname: bool,
    #[serde(rename = "ForceSSL", default)]
    pub force_ssl: bool,
    #[serde(default)]
    pub has_certificate: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsZone {
    pub id: i64,
    pub domain: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub records: Vec<DnsRecord>,
}

impl DnsZone {
    pub fn cname_records(&self) -> Vec<&DnsRecord> {
        self.records
            .iter()
            .filter(|r| r.record_type == RECORD_TYPE_CNAME)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsRecord {
    pub id: i64,
    #[serde(rename = "Type")]
    pub record_type: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
    #[serde(default)]
    pub ttl: i64,
}

/// One entry of a storage directory listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StorageObject {
    pub object_name: String,
    /// Parent directory, e.g. `/zone/assets/`
    pub path: String,
    #[serde(default)]
    pub is_directory: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub storage_zone_name: String,
    #[serde(default)]
    pub length: u64,
}

impl StorageObject {
    /// `/zone/dir/name`, with a trailing slash for directories
    pub fn full_path(&self) -> String {
        let parent = if self.path.ends_with('/') {
            self.path.clone()
        } else {
            format!("{}/", self.path)
        };
        if self.is_directory {
            format!("{}{}/", parent, self.object_name)
        } else {
            format!("{}{}", parent, self.object_name)
        }
    }
}

// ============ Request bodies ============

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddStorageZone {
    pub name: String,
    pub region: String,
    pub zone_tier: i32,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateStorageZone {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rewrite_404_to_200: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddPullZone {
    pub name: String,
    pub origin_type: i32,
    pub storage_zone_id: i64,
    #[serde(rename = "Type")]
    pub zone_type: i32,
    #[serde(rename = "EnableGeoZoneUS")]
    pub enable_geo_zone_us: bool,
    #[serde(rename = "EnableGeoZoneEU")]
    pub enable_geo_zone_eu: bool,
    #[serde(rename = "EnableGeoZoneASIA")]
    pub enable_geo_zone_asia: bool,
    #[serde(rename = "EnableGeoZoneSA")]
    pub enable_geo_zone_sa: bool,
    #[serde(rename = "EnableGeoZoneAF")]
    pub enable_geo_zone_af: bool,
}

impl AddPullZone {
    /// Pull zone served from `storage_zone_id` in every geo zone
    pub fn for_storage_zone(name: impl Into<String>, storage_zone_id: i64) -> Self {
        Self {
            name: name.into(),
            origin_type: ORIGIN_TYPE_STORAGE_ZONE,
            storage_zone_id,
            zone_type: PULL_ZONE_TYPE_STANDARD,
            enable_geo_zone_us: true,
            enable_geo_zone_eu: true,
            enable_geo_zone_asia: true,
            enable_geo_zone_sa: true,
            enable_geo_zone_af: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DnsRecordRequest {
    #[serde(rename = "Type")]
    pub record_type: i32,
    pub name: String,
    pub value: String,
    pub ttl: i64,
}

impl DnsRecordRequest {
    pub fn cname(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            record_type: RECORD_TYPE_CNAME,
            name: name.into(),
            value: target.into(),
            ttl: CNAME_TTL,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddHostname {
    pub hostname: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SetForceSsl {
    pub hostname: String,
    #[serde(rename = "ForceSSL")]
    pub force_ssl: bool,
}
