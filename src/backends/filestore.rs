// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::backends::none::NoneDriver;
use crate::errors::ProviderError;
use crate::host::{Host, HostRecord};
use crate::observability::messages::host::StoreOpened;
use crate::observability::messages::StructuredLog;
use crate::traits::{BaseDriverOptions, Driver, HostProvider};

const MACHINES_DIR: &str = "machines";
const RECORD_FILE: &str = "config.json";

/// Process-wide provider settings, collected from the command line and the
/// environment and passed to the provider explicitly.
///
/// The GitHub token and the SSH mode are carried for drivers that reach
/// hosts over SSH or download engines; the `none` driver uses neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSettings {
    /// Root of the machine store, e.g. `~/.docker/machine`.
    pub storage_path: PathBuf,
    /// Token for GitHub API requests made while upgrading engines.
    pub github_api_token: Option<String>,
    /// Use the built-in SSH client instead of the system one.
    pub native_ssh: bool,
}

impl ProviderSettings {
    pub fn new(storage_path: impl Into<PathBuf>) -> Self {
        Self {
            storage_path: storage_path.into(),
            ..Self::default()
        }
    }
}

/// Keeps host records as JSON files under the storage path:
/// `<storage>/machines/<name>/config.json`.
#[derive(Debug)]
pub struct LocalProvider {
    settings: ProviderSettings,
}

impl LocalProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        StoreOpened {
            storage_path: &settings.storage_path,
            native_ssh: settings.native_ssh,
            github_api_token: settings.github_api_token.is_some(),
        }
        .log();
        Self { settings }
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    fn machine_dir(&self, name: &str) -> PathBuf {
        self.settings.storage_path.join(MACHINES_DIR).join(name)
    }

    fn record_path(&self, name: &str) -> PathBuf {
        self.machine_dir(name).join(RECORD_FILE)
    }

    fn store_error(path: PathBuf, source: io::Error) -> ProviderError {
        ProviderError::Store { path, source }
    }
}

#[async_trait]
impl HostProvider for LocalProvider {
    fn store_path(&self) -> &Path {
        &self.settings.storage_path
    }

    fn load_plugin(
        &self,
        name: &str,
        bare_driver_data: &[u8],
    ) -> Result<Box<dyn Driver>, ProviderError> {
        let base: BaseDriverOptions = serde_json::from_slice(bare_driver_data)?;
        match name {
            "none" => Ok(Box::new(NoneDriver::new(base.machine_name))),
            _ => Err(ProviderError::NotLoadable(name.to_string())),
        }
    }

    fn exists(&self, name: &str) -> Result<bool, ProviderError> {
        Ok(self.record_path(name).is_file())
    }

    fn load(&self, name: &str) -> Result<Host, ProviderError> {
        let path = self.record_path(name);
        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ProviderError::HostDoesNotExist(name.to_string()))
            }
            Err(e) => return Err(Self::store_error(path, e)),
        };

        let record: HostRecord = serde_json::from_slice(&data)?;
        record.into_host(self)
    }

    fn save(&self, host: &Host) -> Result<(), ProviderError> {
        let dir = self.machine_dir(&host.name);
        fs::create_dir_all(&dir).map_err(|e| Self::store_error(dir.clone(), e))?;

        let path = dir.join(RECORD_FILE);
        let data = serde_json::to_vec_pretty(&host.to_record())?;
        fs::write(&path, data).map_err(|e| Self::store_error(path.clone(), e))?;
        debug!(host = %host.name, path = %path.display(), "Saved host record");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), ProviderError> {
        let dir = self.machine_dir(name);
        if !self.exists(name)? {
            return Err(ProviderError::HostDoesNotExist(name.to_string()));
        }
        fs::remove_dir_all(&dir).map_err(|e| Self::store_error(dir, e))
    }
}
