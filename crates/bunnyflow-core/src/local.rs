//! Local file discovery

use crate::error::{CoreError, Result};
use crate::path::FileEntry;
use std::path::Path;
use walkdir::WalkDir;

/// List every regular file below `root`, sorted by path.
///
/// Symlinks are followed. Any unreadable entry fails the scan.
pub fn scan_local_files(root: &Path, zone: &str) -> Result<Vec<FileEntry>> {
    if !root.is_dir() {
        return Err(CoreError::DirectoryNotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| CoreError::Scan {
            path: e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf()),
            message: e.to_string(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        files.push(FileEntry::from_local(entry.path(), root, zone));
    }

    tracing::debug!("Found {} local files under {}", files.len(), root.display());
    Ok(files)
}
