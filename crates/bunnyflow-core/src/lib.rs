//! bunnyflow core
//!
//! Pure deployment logic with no network access: input validation, the
//! naming scheme for remote resources, path normalization between the local
//! tree and CDN storage, and the upload/update/delete diff.
//!
//! ```ignore
//! use bunnyflow_core::{ResourceIdentity, SyncPlan, scan_local_files};
//!
//! let identity = ResourceIdentity::resolve("feature-1", "main", "docs", "example.com")?;
//! assert_eq!(identity.deployment_name, "feature-1.docs.example.com");
//!
//! let local = scan_local_files(&root, &identity.resource_name)?;
//! let plan = SyncPlan::compute(&local, &remote, None);
//! println!("{}", plan.summary());
//! ```

pub mod diff;
pub mod error;
pub mod inputs;
pub mod local;
pub mod naming;
pub mod path;
pub mod policy;

pub use diff::{SyncPlan, SyncSummary};
pub use error::{CoreError, Result};
pub use inputs::{DeploymentInputs, RawInputs, normalize_branch};
pub use local::scan_local_files;
pub use naming::{ResourceIdentity, sanitize_branch};
pub use path::{FileEntry, clean, make_remote_path, strip_zone_prefix};
pub use policy::{AmbiguousMatch, find_single, names_match, paths_match};
