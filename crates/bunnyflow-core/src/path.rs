//! Local and storage path normalization
//!
//! Both sides of a sync are reduced to one relative path using `/`
//! separators, without leading or trailing slashes and with case preserved.

use crate::policy::names_match;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

/// Normalize separators and trim surrounding slashes
pub fn clean(path: &str) -> String {
    path.replace('\\', "/").trim_matches('/').to_string()
}

/// Storage path of `relative` inside `zone`: `/{zone}/{relative}`
pub fn make_remote_path(relative: &str, zone: &str) -> String {
    format!("/{}/{}", zone, relative)
}

/// Remove the `/{zone}/` prefix from a storage path.
///
/// Exactly `zone.len() + 2` characters are removed. The zone segment is
/// matched like any resource name, so a listing that reports the zone in a
/// different case still resolves to the same relative path.
pub fn strip_zone_prefix(full: &str, zone: &str) -> String {
    let full = full.replace('\\', "/");
    let prefix = format!("/{}/", zone);
    let inside_zone = full
        .get(..prefix.len())
        .is_some_and(|head| names_match(head, &prefix));
    if !inside_zone {
        tracing::warn!("Storage path '{}' is not inside zone '{}'", full, zone);
    }
    clean(full.get(prefix.len()..).unwrap_or_default())
}

/// A file addressed by its path relative to the content root.
///
/// Equality and hashing only look at the relative path.
#[derive(Debug, Clone)]
pub struct FileEntry {
    relative: String,
    root: String,
    zone: String,
}

impl FileEntry {
    pub fn new(relative: &str, root: &Path, zone: &str) -> Self {
        Self {
            relative: clean(relative),
            root: root_string(root),
            zone: zone.to_string(),
        }
    }

    /// Entry for a file found on disk under `root`
    pub fn from_local(file: &Path, root: &Path, zone: &str) -> Self {
        debug_assert!(
            file.starts_with(root),
            "{} is not under {}",
            file.display(),
            root.display()
        );
        let relative = file
            .strip_prefix(root)
            .unwrap_or(file)
            .to_string_lossy()
            .into_owned();
        Self::new(&relative, root, zone)
    }

    /// Entry for a storage object whose full path starts with `/{zone}/`
    pub fn from_remote(full_path: &str, root: &Path, zone: &str) -> Self {
        Self {
            relative: strip_zone_prefix(full_path, zone),
            root: root_string(root),
            zone: zone.to_string(),
        }
    }

    pub fn relative_path(&self) -> &str {
        &self.relative
    }

    /// `{root}/{relative}`
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(format!("{}/{}", self.root, self.relative))
    }

    /// `/{zone}/{relative}`
    pub fn remote_path(&self) -> String {
        make_remote_path(&self.relative, &self.zone)
    }
}

impl PartialEq for FileEntry {
    fn eq(&self, other: &Self) -> bool {
        crate::policy::paths_match(&self.relative, &other.relative)
    }
}

impl Eq for FileEntry {}

impl Hash for FileEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.relative.hash(state);
    }
}

fn root_string(root: &Path) -> String {
    root.to_string_lossy()
        .replace('\\', "/")
        .trim_end_matches('/')
        .to_string()
}
