//! bunny.net provider for bunnyflow
//!
//! Implements [`CdnApi`](bunnyflow_cloud::CdnApi) over the bunny.net REST API
//! and [`StorageApi`](bunnyflow_cloud::StorageApi) over edge storage.
//!
//! # Example
//!
//! ```ignore
//! use bunnyflow_cloud::Deployer;
//! use bunnyflow_cloud_bunny::{BunnyApi, ClientConfig};
//! use std::sync::Arc;
//!
//! let api = BunnyApi::new(ClientConfig::new(api_key))?;
//! let report = Deployer::new(Arc::new(api)).run(&inputs).await?;
//! println!("{}", report.sync);
//! ```

pub mod api;
pub mod config;
pub mod error;
mod http;
pub mod storage;
#[cfg(test)]
mod test_server;

pub use api::BunnyApi;
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_STORAGE_URL};
pub use error::{BunnyError, Result};
pub use storage::BunnyStorage;
