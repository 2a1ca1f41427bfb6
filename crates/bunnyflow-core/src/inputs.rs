//! Deployment inputs
//!
//! Raw values come from the CLI (flags or environment). They are validated
//! and normalized once here and never change for the rest of the run.

use crate::error::{CoreError, Result};
use crate::naming::sanitize_branch;
use std::path::{Component, PathBuf};

/// Unvalidated values as supplied by the input source
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub workspace: PathBuf,
    pub directory: PathBuf,
    pub branch_current: String,
    pub branch_main: String,
    pub api_key: String,
    pub dns_zone_id: i64,
    pub dns_subdomain: Option<String>,
    pub debug_limit: Option<usize>,
}

/// Validated deployment inputs
#[derive(Clone)]
pub struct DeploymentInputs {
    workspace: PathBuf,
    directory: PathBuf,
    branch_current: String,
    branch_main: String,
    api_key: String,
    dns_zone_id: i64,
    dns_subdomain: String,
    debug_limit: Option<usize>,
}

impl std::fmt::Debug for DeploymentInputs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeploymentInputs")
            .field("workspace", &self.workspace)
            .field("directory", &self.directory)
            .field("branch_current", &self.branch_current)
            .field("branch_main", &self.branch_main)
            .field("api_key", &"***")
            .field("dns_zone_id", &self.dns_zone_id)
            .field("dns_subdomain", &self.dns_subdomain)
            .field("debug_limit", &self.debug_limit)
            .finish()
    }
}

impl DeploymentInputs {
    pub fn new(raw: RawInputs) -> Result<Self> {
        if raw.workspace.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput("workspace is required".into()));
        }
        if !raw.workspace.is_dir() {
            return Err(CoreError::DirectoryNotFound(raw.workspace));
        }

        if raw.directory.is_absolute()
            || raw
                .directory
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(CoreError::InvalidInput(format!(
                "directory must be relative to the workspace: {}",
                raw.directory.display()
            )));
        }
        let content_root = raw.workspace.join(&raw.directory);
        if !content_root.is_dir() {
            return Err(CoreError::DirectoryNotFound(content_root));
        }

        let branch_current = normalize_branch(&raw.branch_current);
        let branch_main = normalize_branch(&raw.branch_main);
        if branch_current.is_empty() {
            return Err(CoreError::InvalidInput("current branch is required".into()));
        }
        if branch_main.is_empty() {
            return Err(CoreError::InvalidInput("main branch is required".into()));
        }
        if branch_current != branch_main && sanitize_branch(&branch_current).is_empty() {
            return Err(CoreError::InvalidInput(format!(
                "branch '{}' has no characters usable in a subdomain",
                branch_current
            )));
        }

        let api_key = raw.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(CoreError::InvalidInput("api key is required".into()));
        }

        if raw.dns_zone_id <= 0 {
            return Err(CoreError::InvalidInput(format!(
                "dns zone id must be positive: {}",
                raw.dns_zone_id
            )));
        }

        let dns_subdomain = raw
            .dns_subdomain
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        if let Some(c) = dns_subdomain
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '.'))
        {
            return Err(CoreError::InvalidInput(format!(
                "subdomain '{}' contains invalid character '{}'",
                dns_subdomain, c
            )));
        }

        Ok(Self {
            workspace: raw.workspace,
            directory: raw.directory,
            branch_current,
            branch_main,
            api_key,
            dns_zone_id: raw.dns_zone_id,
            dns_subdomain,
            debug_limit: raw.debug_limit.filter(|limit| *limit > 0),
        })
    }

    /// Directory whose files are deployed
    pub fn content_root(&self) -> PathBuf {
        self.workspace.join(&self.directory)
    }

    pub fn branch_current(&self) -> &str {
        &self.branch_current
    }

    pub fn branch_main(&self) -> &str {
        &self.branch_main
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn dns_zone_id(&self) -> i64 {
        self.dns_zone_id
    }

    pub fn dns_subdomain(&self) -> &str {
        &self.dns_subdomain
    }

    /// Cap on each sync work list; `None` means unlimited
    pub fn debug_limit(&self) -> Option<usize> {
        self.debug_limit
    }
}

/// Reduce a git ref to its last segment, lower-cased.
///
/// `refs/heads/Feature/X` becomes `x`.
pub fn normalize_branch(branch: &str) -> String {
    branch
        .trim()
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
