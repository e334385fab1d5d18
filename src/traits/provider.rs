// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ProviderError;
use crate::host::Host;
use crate::traits::Driver;

/// Data every driver is seeded with before its create flags are applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseDriverOptions {
    pub machine_name: String,
    pub store_path: PathBuf,
}

/// The external collaborator that provisions, controls and persists hosts.
///
/// Configuration resolution only needs `cert_dir` and `store_path`; host
/// construction and the commands use the rest.
#[async_trait]
pub trait HostProvider: Send + Sync {
    /// Root of the machine store.
    fn store_path(&self) -> &Path;

    /// Directory holding the CA and client certificates.
    fn cert_dir(&self) -> PathBuf {
        self.store_path().join("certs")
    }

    /// Load a driver plugin by name, seeded with JSON-encoded
    /// [`BaseDriverOptions`].
    fn load_plugin(&self, name: &str, bare_driver_data: &[u8])
        -> Result<Box<dyn Driver>, ProviderError>;

    /// Allocate a host bound to `driver`, named after the driver's machine.
    fn new_host(&self, driver: Box<dyn Driver>) -> Result<Host, ProviderError> {
        Ok(Host::new(driver))
    }

    fn exists(&self, name: &str) -> Result<bool, ProviderError>;

    /// Load a persisted host; [`ProviderError::HostDoesNotExist`] when absent.
    fn load(&self, name: &str) -> Result<Host, ProviderError>;

    fn save(&self, host: &Host) -> Result<(), ProviderError>;

    fn remove(&self, name: &str) -> Result<(), ProviderError>;

    /// Provision the remote machine behind `host`.
    async fn create(&self, host: &mut Host) -> Result<(), ProviderError> {
        host.driver.create().await
    }
}
