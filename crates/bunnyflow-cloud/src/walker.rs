//! Remote storage tree listing

use crate::error::Result;
use crate::model::StorageObject;
use crate::provider::StorageApi;
use futures_util::{StreamExt, TryStreamExt, stream};

/// List every file below `root` (a directory path such as `/zone/`).
///
/// Directories are expanded one level at a time; the listings of a level run
/// with up to `concurrency` requests in flight. The result is sorted by full
/// path.
pub async fn walk_tree(
    storage: &dyn StorageApi,
    root: &str,
    concurrency: usize,
) -> Result<Vec<StorageObject>> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_string()];
    let mut depth = 0usize;

    while !pending.is_empty() {
        tracing::debug!("Listing {} directories at depth {}", pending.len(), depth);

        let level: Vec<Vec<StorageObject>> = stream::iter(std::mem::take(&mut pending))
            .map(|dir| async move { storage.list(&dir).await })
            .buffer_unordered(concurrency.max(1))
            .try_collect()
            .await?;

        for object in level.into_iter().flatten() {
            if object.is_directory {
                pending.push(object.full_path());
            } else {
                files.push(object);
            }
        }
        depth += 1;
    }

    files.sort_by_key(StorageObject::full_path);
    tracing::debug!("Found {} remote files under {}", files.len(), root);
    Ok(files)
}
