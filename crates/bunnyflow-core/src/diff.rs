//! Local vs. remote file diff
//!
//! Files are matched by relative path only. A file present on both sides is
//! always re-uploaded because contents are never compared.

use crate::path::FileEntry;
use std::collections::HashSet;

/// Work lists for one sync
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Local files missing remotely
    pub to_upload: Vec<FileEntry>,
    /// Local files already present remotely
    pub to_update: Vec<FileEntry>,
    /// Remote files with no local counterpart
    pub to_delete: Vec<FileEntry>,
}

impl SyncPlan {
    /// Compute the diff between `local` and `remote`.
    ///
    /// With a `debug_limit`, each list is truncated independently to that many
    /// entries, keeping input order.
    pub fn compute(local: &[FileEntry], remote: &[FileEntry], debug_limit: Option<usize>) -> Self {
        let remote_paths: HashSet<&str> = remote.iter().map(FileEntry::relative_path).collect();
        let local_paths: HashSet<&str> = local.iter().map(FileEntry::relative_path).collect();

        let (to_update, to_upload): (Vec<FileEntry>, Vec<FileEntry>) = local
            .iter()
            .cloned()
            .partition(|entry| remote_paths.contains(entry.relative_path()));

        let to_delete: Vec<FileEntry> = remote
            .iter()
            .filter(|entry| !local_paths.contains(entry.relative_path()))
            .cloned()
            .collect();

        let mut plan = Self {
            to_upload,
            to_update,
            to_delete,
        };

        if let Some(limit) = debug_limit.filter(|limit| *limit > 0) {
            tracing::debug!("Applying debug limit of {} per list", limit);
            plan.to_upload.truncate(limit);
            plan.to_update.truncate(limit);
            plan.to_delete.truncate(limit);
        }

        plan
    }

    pub fn summary(&self) -> SyncSummary {
        SyncSummary {
            upload: self.to_upload.len(),
            update: self.to_update.len(),
            delete: self.to_delete.len(),
        }
    }
}

/// Counts of planned file operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub upload: usize,
    pub update: usize,
    pub delete: usize,
}

impl SyncSummary {
    pub fn total(&self) -> usize {
        self.upload + self.update + self.delete
    }
}

impl std::fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to upload, {} to update, {} to delete",
            self.upload, self.update, self.delete
        )
    }
}
