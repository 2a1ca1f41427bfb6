//! bunnyflow cloud layer
//!
//! Provider abstraction and the deployment orchestrator. A deployment
//! provisions CDN resources for a branch, then reconciles the remote storage
//! zone with the local content directory.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 bunnyflow CLI                    │
//! │                (bunnyflow deploy)                │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                bunnyflow-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │  Deployer: ProvisionStep sequence        │   │
//! │  │  + file sync + cache purge               │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ trait CdnApi │  │ trait        │            │
//! │  │              │  │ StorageApi   │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼───────────────┐
//! │ bunnyflow-cloud-bunny │
//! │  (bunny.net REST)     │
//! └───────────────────────┘
//! ```

pub mod action;
pub mod deployer;
pub mod error;
pub mod model;
pub mod provider;
pub mod reporter;
pub mod walker;

#[cfg(test)]
mod fake;

pub use action::{ActionType, DeployReport, ProvisionStep, StepOutcome, SyncStage};
pub use deployer::{DeployConfig, Deployer};
pub use error::{CloudError, Result};
pub use provider::{CdnApi, RetryConfig, StorageApi, remote_call_error, with_retry};
pub use reporter::{DeployReporter, TracingReporter};
pub use walker::walk_tree;
